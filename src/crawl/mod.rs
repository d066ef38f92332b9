//! Page-traversal state machine.
//!
//! The catalog is a strict depth-3 tree: the entry page fans out to section
//! (department) pages, sections fan out to category result pages, and
//! categories are walked through their pagination. [`frontier`] owns task
//! lifecycle and concurrency; [`router`] dispatches on page type.

pub mod frontier;
pub mod pagination;
pub mod readiness;
pub mod router;
pub mod scroll;
pub mod selectors;
pub mod types;

pub use frontier::{CrawlSummary, run_crawl};
pub use router::route;
pub use types::{DiscoveredLink, PageLabel, PageTask, ScrapeError};
