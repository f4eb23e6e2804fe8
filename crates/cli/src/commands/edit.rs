use anyhow::Result;
use folio_core::ItemPatch;
use folio_sync::FolioContext;

async fn apply(ctx: &FolioContext, patch: ItemPatch) -> Result<()> {
    let ack = ctx.store().update_item(patch).await?;
    tracing::info!(id = %ack.id, "item updated");
    println!("{}", serde_json::to_string_pretty(&ack)?);
    Ok(())
}

pub(crate) async fn run_star(ctx: &FolioContext, id: String, stars: u8) -> Result<()> {
    apply(ctx, ItemPatch::new(id).star(stars)).await
}

pub(crate) async fn run_tag(ctx: &FolioContext, id: String, tags: Vec<String>) -> Result<()> {
    apply(ctx, ItemPatch::new(id).tags(tags)).await
}

pub(crate) async fn run_annotate(ctx: &FolioContext, id: String, text: String) -> Result<()> {
    apply(ctx, ItemPatch::new(id).annotation(text)).await
}

pub(crate) async fn run_link(ctx: &FolioContext, id: String, url: String) -> Result<()> {
    apply(ctx, ItemPatch::new(id).url(url)).await
}
