//! Crawl configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::crawl::ScrapeError;

/// Landing page of the catalog.
pub const DEFAULT_ENTRY_URL: &str = "https://www.stokonline.com.br";

/// Department-listing URL prefix discovered from the entry page.
pub const DEFAULT_DEPARTMENT_URL_PREFIX: &str =
    "https://www.stokonline.com.br/produtos/departamento/";

/// Settings for one crawl run. Build via [`CrawlConfig::builder`]; fields are
/// read through getters so the struct stays free to evolve.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlConfig {
    start_urls: Vec<String>,
    max_requests: Option<usize>,
    max_concurrent_pages: usize,
    headless: bool,
    department_url_prefix: String,
    ready_timeout_secs: u64,
    selector_timeout_secs: u64,
    scroll_settle_ms: u64,
    max_pagination_pages: usize,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            start_urls: vec![DEFAULT_ENTRY_URL.to_string()],
            max_requests: None,
            max_concurrent_pages: 5,
            headless: true,
            department_url_prefix: DEFAULT_DEPARTMENT_URL_PREFIX.to_string(),
            ready_timeout_secs: 5,
            selector_timeout_secs: 10,
            scroll_settle_ms: 1000,
            max_pagination_pages: 200,
        }
    }
}

impl CrawlConfig {
    #[must_use]
    pub fn builder() -> CrawlConfigBuilder {
        CrawlConfigBuilder::default()
    }

    #[must_use]
    pub fn start_urls(&self) -> &[String] {
        &self.start_urls
    }

    /// Ceiling on dispatched page tasks; `None` means unbounded.
    #[must_use]
    pub fn max_requests(&self) -> Option<usize> {
        self.max_requests
    }

    #[must_use]
    pub fn max_concurrent_pages(&self) -> usize {
        self.max_concurrent_pages
    }

    #[must_use]
    pub fn headless(&self) -> bool {
        self.headless
    }

    #[must_use]
    pub fn department_url_prefix(&self) -> &str {
        &self.department_url_prefix
    }

    /// How long to wait for the loading overlay to detach.
    #[must_use]
    pub fn ready_timeout(&self) -> Duration {
        Duration::from_secs(self.ready_timeout_secs)
    }

    /// How long bounded element waits may take before proceeding degraded.
    #[must_use]
    pub fn selector_timeout(&self) -> Duration {
        Duration::from_secs(self.selector_timeout_secs)
    }

    /// Pause after each scroll pass so lazy content can render.
    #[must_use]
    pub fn scroll_settle(&self) -> Duration {
        Duration::from_millis(self.scroll_settle_ms)
    }

    /// Ceiling on results pages walked within a single category.
    #[must_use]
    pub fn max_pagination_pages(&self) -> usize {
        self.max_pagination_pages
    }
}

#[derive(Debug, Default)]
pub struct CrawlConfigBuilder {
    start_urls: Vec<String>,
    max_requests: Option<usize>,
    max_concurrent_pages: Option<usize>,
    headless: Option<bool>,
    department_url_prefix: Option<String>,
    ready_timeout_secs: Option<u64>,
    selector_timeout_secs: Option<u64>,
    scroll_settle_ms: Option<u64>,
    max_pagination_pages: Option<usize>,
}

impl CrawlConfigBuilder {
    #[must_use]
    pub fn start_url(mut self, url: impl Into<String>) -> Self {
        self.start_urls.push(url.into());
        self
    }

    #[must_use]
    pub fn start_urls(mut self, urls: Vec<String>) -> Self {
        self.start_urls = urls;
        self
    }

    #[must_use]
    pub fn max_requests(mut self, limit: Option<usize>) -> Self {
        self.max_requests = limit;
        self
    }

    #[must_use]
    pub fn max_concurrent_pages(mut self, pages: usize) -> Self {
        self.max_concurrent_pages = Some(pages);
        self
    }

    #[must_use]
    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = Some(headless);
        self
    }

    #[must_use]
    pub fn department_url_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.department_url_prefix = Some(prefix.into());
        self
    }

    #[must_use]
    pub fn ready_timeout_secs(mut self, secs: u64) -> Self {
        self.ready_timeout_secs = Some(secs);
        self
    }

    #[must_use]
    pub fn selector_timeout_secs(mut self, secs: u64) -> Self {
        self.selector_timeout_secs = Some(secs);
        self
    }

    #[must_use]
    pub fn scroll_settle_ms(mut self, ms: u64) -> Self {
        self.scroll_settle_ms = Some(ms);
        self
    }

    #[must_use]
    pub fn max_pagination_pages(mut self, pages: usize) -> Self {
        self.max_pagination_pages = Some(pages);
        self
    }

    pub fn build(self) -> Result<CrawlConfig, ScrapeError> {
        let defaults = CrawlConfig::default();

        let start_urls = if self.start_urls.is_empty() {
            defaults.start_urls
        } else {
            self.start_urls
        };
        for url in &start_urls {
            Url::parse(url)
                .map_err(|e| ScrapeError::Config(format!("invalid start URL '{url}': {e}")))?;
        }

        let max_concurrent_pages = self
            .max_concurrent_pages
            .unwrap_or(defaults.max_concurrent_pages);
        if !(1..=100).contains(&max_concurrent_pages) {
            return Err(ScrapeError::Config(format!(
                "max_concurrent_pages must be between 1 and 100, got {max_concurrent_pages}"
            )));
        }

        let max_pagination_pages = self
            .max_pagination_pages
            .unwrap_or(defaults.max_pagination_pages);
        if max_pagination_pages == 0 {
            return Err(ScrapeError::Config(
                "max_pagination_pages must be at least 1".to_string(),
            ));
        }

        Ok(CrawlConfig {
            start_urls,
            max_requests: self.max_requests,
            max_concurrent_pages,
            headless: self.headless.unwrap_or(defaults.headless),
            department_url_prefix: self
                .department_url_prefix
                .unwrap_or(defaults.department_url_prefix),
            ready_timeout_secs: self.ready_timeout_secs.unwrap_or(defaults.ready_timeout_secs),
            selector_timeout_secs: self
                .selector_timeout_secs
                .unwrap_or(defaults.selector_timeout_secs),
            scroll_settle_ms: self.scroll_settle_ms.unwrap_or(defaults.scroll_settle_ms),
            max_pagination_pages,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults_match_default_config() {
        let built = CrawlConfig::builder().build().unwrap();
        assert_eq!(built.start_urls(), [DEFAULT_ENTRY_URL.to_string()]);
        assert_eq!(built.max_concurrent_pages(), 5);
        assert_eq!(built.max_pagination_pages(), 200);
        assert!(built.headless());
        assert_eq!(built.max_requests(), None);
    }

    #[test]
    fn rejects_zero_concurrency() {
        let err = CrawlConfig::builder()
            .max_concurrent_pages(0)
            .build()
            .unwrap_err();
        assert!(matches!(err, ScrapeError::Config(_)));
    }

    #[test]
    fn rejects_invalid_start_url() {
        let err = CrawlConfig::builder()
            .start_url("not a url")
            .build()
            .unwrap_err();
        assert!(matches!(err, ScrapeError::Config(_)));
    }

    #[test]
    fn timeouts_convert_to_durations() {
        let config = CrawlConfig::builder()
            .ready_timeout_secs(7)
            .scroll_settle_ms(250)
            .build()
            .unwrap();
        assert_eq!(config.ready_timeout(), Duration::from_secs(7));
        assert_eq!(config.scroll_settle(), Duration::from_millis(250));
    }
}
