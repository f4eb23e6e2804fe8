use anyhow::Result;
use folio_client::CatalogClient;
use folio_core::{Filter, ImageItem, latest_modified};
use folio_sync::{FolioContext, PageLoad};
use serde_json::Value;

pub(crate) fn build_filter(
    exts: Vec<String>,
    keyword: Option<String>,
    tags: Vec<String>,
    stars: Vec<u8>,
) -> Filter {
    Filter {
        stars: stars.into_iter().collect(),
        exts: exts.into_iter().map(|e| e.trim_start_matches('.').to_lowercase()).collect(),
        keyword,
        tags: tags.into_iter().collect(),
    }
}

/// One image as printed: the item itself plus its thumbnail URL.
pub(crate) fn image_entry(client: &CatalogClient, item: &ImageItem) -> Result<Value> {
    let mut entry = serde_json::to_value(item)?;
    entry["thumbnailUrl"] = Value::String(client.thumbnail_url(&item.id)?);
    Ok(entry)
}

pub(crate) async fn run_folders(ctx: &FolioContext) -> Result<()> {
    let folders = ctx.store().load_folders().await?;
    println!("{}", serde_json::to_string_pretty(&*folders)?);
    Ok(())
}

pub(crate) async fn run_images(
    ctx: &FolioContext,
    folder: Option<String>,
    filter: Filter,
    pages: usize,
) -> Result<()> {
    let store = ctx.store();
    store.browse(folder.as_deref(), filter).await?;

    for _ in 1..pages {
        match store.load_next_page().await? {
            PageLoad::Appended { added, total } => {
                tracing::debug!(added, total, "page loaded");
            },
            PageLoad::Exhausted | PageLoad::Skipped(_) | PageLoad::Discarded => break,
        }
    }

    let snapshot = store.snapshot();
    let images = snapshot
        .visible_images()
        .into_iter()
        .map(|item| image_entry(ctx.client(), item))
        .collect::<Result<Vec<_>>>()?;
    let output = serde_json::json!({
        "folder": snapshot.current_folder_id,
        "images": images,
        "extensions": *snapshot.extensions,
        "loaded": snapshot.images.len(),
        "pageSize": ctx.config().page_size,
        "latestModified": latest_modified(&snapshot.images),
        "exhausted": snapshot.is_exhausted(),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

pub(crate) async fn run_recent(
    ctx: &FolioContext,
    limit: Option<usize>,
    folder: Option<String>,
) -> Result<()> {
    let items = ctx.store().load_recent_for(folder.as_deref(), limit).await?;
    println!("{}", serde_json::to_string_pretty(&*items)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_image_entry_carries_thumbnail_url() {
        let client =
            CatalogClient::with_timeout("http://localhost:8000/api/eagle/", Duration::from_secs(1))
                .unwrap();
        let mut item = ImageItem::new("a1", "png");
        item.star = Some(4);

        let entry = image_entry(&client, &item).unwrap();
        assert_eq!(entry["id"], "a1");
        assert_eq!(entry["star"], 4);
        assert_eq!(
            entry["thumbnailUrl"],
            "http://localhost:8000/api/eagle/get_thumbnail_image?id=a1"
        );
    }

    #[test]
    fn test_build_filter_normalizes_extensions() {
        let filter = build_filter(
            vec![".PNG".to_owned(), "jpg".to_owned()],
            Some("sunset".to_owned()),
            vec!["trip".to_owned()],
            vec![5, 4, 5],
        );
        assert_eq!(filter.exts.iter().collect::<Vec<_>>(), vec!["jpg", "png"]);
        assert_eq!(filter.stars.len(), 2);
        assert_eq!(filter.keyword(), Some("sunset"));
        assert!(filter.tags.contains("trip"));
    }
}
