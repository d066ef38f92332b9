//! Product catalog scraper for the Stok Center online store.
//!
//! Traverses the client-rendered catalog (entry page, department sections,
//! category result pages), forces lazily loaded results to materialize,
//! extracts product cards, normalizes free-text fields into typed attributes
//! and persists the records to a relational store.

pub mod browser;
pub mod config;
pub mod crawl;
pub mod dataset;
pub mod extract;
pub mod normalize;
pub mod page_view;
pub mod store;

pub use config::CrawlConfig;
pub use crawl::{CrawlSummary, DiscoveredLink, PageLabel, PageTask, ScrapeError};
pub use dataset::Dataset;
pub use extract::{CategoryContext, RawProductRecord};
pub use normalize::NormalizedProductRecord;
pub use page_view::{PageView, SelectorState};
pub use store::ProductStore;

/// Run a full traversal with `config` and return the normalized records.
pub async fn crawl(config: CrawlConfig) -> Result<CrawlSummary, ScrapeError> {
    crawl::run_crawl(config).await.map_err(ScrapeError::from)
}
