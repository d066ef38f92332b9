//! Scripted page view for traversal tests.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde_json::{Value, json};

use stokscrape::crawl::selectors::NEXT_PAGE_SELECTOR;
use stokscrape::extract::js_scripts::{
    BREADCRUMBS_SCRIPT, LINKS_SCRIPT, NEXT_PAGE_STATE_SCRIPT, PRODUCT_CARDS_SCRIPT,
    SCROLL_HEIGHT_SCRIPT, SCROLL_TO_BOTTOM_SCRIPT,
};
use stokscrape::{CrawlConfig, PageView, SelectorState};

/// State of the next-page control on a scripted results page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextControl {
    Absent,
    Disabled,
    Enabled,
}

/// One scripted page. Clicking the next-page control advances the view to
/// the next page in the script; when none is left the same page is served
/// again, which is how a misbehaving site looks to the walker.
#[derive(Debug, Clone)]
pub struct MockPage {
    pub url: String,
    pub title: String,
    /// Successive scroll-height measurements; the last value repeats.
    pub heights: Vec<u64>,
    pub breadcrumbs: Vec<String>,
    /// Card objects in the shape the extraction script returns.
    pub cards: Value,
    pub links: Vec<String>,
    pub next: NextControl,
}

impl Default for MockPage {
    fn default() -> Self {
        Self {
            url: "https://shop.example/d/bebidas/cervejas".to_string(),
            title: "Cervejas".to_string(),
            heights: vec![1000],
            breadcrumbs: vec!["Bebidas".to_string(), "Cervejas".to_string()],
            cards: json!([]),
            links: Vec::new(),
            next: NextControl::Absent,
        }
    }
}

/// A card object in the wire shape of the extraction script.
pub fn card(title: &str, prices: &[&str]) -> Value {
    json!({
        "title": title,
        "image_url": "https://cdn.example/img.jpg",
        "prices": prices,
    })
}

struct MockState {
    pages: VecDeque<MockPage>,
    height_cursor: usize,
    height_reads: usize,
    clicks: usize,
}

pub struct MockPageView {
    state: Mutex<MockState>,
}

impl MockPageView {
    pub fn new(pages: Vec<MockPage>) -> Self {
        assert!(!pages.is_empty(), "mock needs at least one page");
        Self {
            state: Mutex::new(MockState {
                pages: pages.into(),
                height_cursor: 0,
                height_reads: 0,
                clicks: 0,
            }),
        }
    }

    pub fn single(page: MockPage) -> Self {
        Self::new(vec![page])
    }

    pub fn clicks(&self) -> usize {
        self.state.lock().unwrap().clicks
    }

    /// Total number of height measurements taken across all pages.
    pub fn height_reads(&self) -> usize {
        self.state.lock().unwrap().height_reads
    }
}

#[async_trait]
impl PageView for MockPageView {
    async fn current_url(&self) -> Result<String> {
        Ok(self.state.lock().unwrap().pages[0].url.clone())
    }

    async fn title(&self) -> Result<String> {
        Ok(self.state.lock().unwrap().pages[0].title.clone())
    }

    async fn wait_for_selector(
        &self,
        _selector: &str,
        _state: SelectorState,
        _timeout: Duration,
    ) -> Result<()> {
        Ok(())
    }

    async fn evaluate(&self, script: &str) -> Result<Value> {
        let mut state = self.state.lock().unwrap();
        if script == SCROLL_HEIGHT_SCRIPT {
            let cursor = state.height_cursor;
            let heights = &state.pages[0].heights;
            let height = heights[cursor.min(heights.len() - 1)];
            state.height_cursor = cursor + 1;
            state.height_reads += 1;
            return Ok(json!(height));
        }
        let page = &state.pages[0];
        if script == SCROLL_TO_BOTTOM_SCRIPT {
            let last = page.heights[page.heights.len() - 1];
            return Ok(json!(last));
        }
        if script == BREADCRUMBS_SCRIPT {
            return Ok(json!(page.breadcrumbs));
        }
        if script == PRODUCT_CARDS_SCRIPT {
            return Ok(page.cards.clone());
        }
        if script == LINKS_SCRIPT {
            return Ok(json!(page.links));
        }
        if script == NEXT_PAGE_STATE_SCRIPT {
            return Ok(match page.next {
                NextControl::Absent => json!({ "present": false, "disabled": false }),
                NextControl::Disabled => json!({ "present": true, "disabled": true }),
                NextControl::Enabled => json!({ "present": true, "disabled": false }),
            });
        }
        Err(anyhow!("unscripted evaluation: {script}"))
    }

    async fn click(&self, selector: &str) -> Result<()> {
        if selector != NEXT_PAGE_SELECTOR {
            return Err(anyhow!("unexpected click target: {selector}"));
        }
        let mut state = self.state.lock().unwrap();
        state.clicks += 1;
        if state.pages.len() > 1 {
            state.pages.pop_front();
            state.height_cursor = 0;
        }
        Ok(())
    }
}

/// Config with zero settle time so scripted traversals run instantly.
pub fn test_config() -> CrawlConfig {
    CrawlConfig::builder()
        .scroll_settle_ms(0)
        .ready_timeout_secs(1)
        .selector_timeout_secs(1)
        .build()
        .unwrap()
}
