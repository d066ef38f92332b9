//! CLI entry point: traverse the catalog, then persist the dataset.

use anyhow::Result;
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use stokscrape::{CrawlConfig, ProductStore};

#[derive(Debug, Parser)]
#[command(name = "stokscrape", about = "Scrape the Stok Center online catalog")]
struct Cli {
    /// Seed URL; repeatable. Defaults to the catalog landing page.
    #[arg(long = "start-url")]
    start_urls: Vec<String>,

    /// Maximum number of pages to dispatch.
    #[arg(long)]
    max_requests: Option<usize>,

    /// Simultaneously rendered pages.
    #[arg(long, default_value_t = 5)]
    concurrency: usize,

    /// Run the browser with a visible window.
    #[arg(long)]
    headful: bool,

    /// Store connection string, e.g. sqlite://products.db
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        error!("run failed: {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut builder = CrawlConfig::builder()
        .max_requests(cli.max_requests)
        .max_concurrent_pages(cli.concurrency)
        .headless(!cli.headful);
    if !cli.start_urls.is_empty() {
        builder = builder.start_urls(cli.start_urls);
    }
    let config = builder.build()?;

    let summary = stokscrape::crawl(config).await?;
    info!(
        "scraped {} records across {} pages",
        summary.records.len(),
        summary.pages_visited
    );

    let placeholders = summary
        .records
        .iter()
        .filter(|r| r.has_placeholder_image())
        .count();
    if placeholders > 0 {
        warn!("{placeholders} records carry a placeholder image URL");
    }

    // The store connection is acquired only now, after traversal.
    let store = ProductStore::connect(&cli.database_url).await?;
    let inserted = store.insert_batch(&summary.records).await;
    store.close().await;

    info!(
        "data saved: {inserted}/{} records persisted",
        summary.records.len()
    );
    Ok(())
}
