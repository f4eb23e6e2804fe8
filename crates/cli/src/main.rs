use anyhow::Result;
use clap::{Parser, Subcommand};
use folio_core::ClientConfig;
use folio_sync::FolioContext;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Browse and tag a media library from the terminal", long_about = None)]
struct Cli {
    /// Backend base URL (overrides FOLIO_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,
    /// Items per page (overrides FOLIO_PAGE_SIZE)
    #[arg(long, global = true)]
    page_size: Option<usize>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the aggregated folder tree
    Folders,
    /// Page through the images of a folder
    Images {
        #[arg(short, long)]
        folder: Option<String>,
        /// Number of pages to load; stops early once the folder is exhausted
        #[arg(short, long, default_value = "1")]
        pages: usize,
        #[arg(long)]
        ext: Vec<String>,
        #[arg(short, long)]
        keyword: Option<String>,
        #[arg(short, long)]
        tag: Vec<String>,
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(0..=5))]
        star: Vec<u8>,
    },
    /// Print the most recently added images
    Recent {
        #[arg(short, long)]
        limit: Option<usize>,
        #[arg(short, long)]
        folder: Option<String>,
    },
    /// Set the star rating of an image
    Star {
        id: String,
        #[arg(value_parser = clap::value_parser!(u8).range(0..=5))]
        stars: u8,
    },
    /// Replace the tags of an image
    Tag {
        id: String,
        tags: Vec<String>,
    },
    /// Replace the annotation of an image
    Annotate {
        id: String,
        text: String,
    },
    /// Set the source URL of an image
    Link {
        id: String,
        url: String,
    },
}

fn load_config(cli: &Cli) -> Result<ClientConfig> {
    let mut config = ClientConfig::from_env()?;
    if let Some(base_url) = &cli.base_url {
        config.base_url.clone_from(base_url);
    }
    if let Some(page_size) = cli.page_size {
        config.page_size = page_size;
    }
    Ok(config.validated()?)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let ctx = FolioContext::new(load_config(&cli)?)?;

    match cli.command {
        Commands::Folders => commands::browse::run_folders(&ctx).await?,
        Commands::Images { folder, pages, ext, keyword, tag, star } => {
            let filter = commands::browse::build_filter(ext, keyword, tag, star);
            commands::browse::run_images(&ctx, folder, filter, pages).await?;
        },
        Commands::Recent { limit, folder } => {
            commands::browse::run_recent(&ctx, limit, folder).await?;
        },
        Commands::Star { id, stars } => commands::edit::run_star(&ctx, id, stars).await?,
        Commands::Tag { id, tags } => commands::edit::run_tag(&ctx, id, tags).await?,
        Commands::Annotate { id, text } => commands::edit::run_annotate(&ctx, id, text).await?,
        Commands::Link { id, url } => commands::edit::run_link(&ctx, id, url).await?,
    }

    Ok(())
}
