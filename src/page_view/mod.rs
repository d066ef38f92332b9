//! Narrow capability interface over the browser driver.
//!
//! The traversal core depends only on this trait. [`chromium`] adapts it
//! over a live chromiumoxide page; tests substitute a scripted view.

pub mod chromium;

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

/// Condition a selector must reach before a wait resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorState {
    /// Present in the document.
    Attached,
    /// Present and taking up layout space.
    Visible,
    /// No longer present in the document.
    Detached,
}

#[async_trait]
pub trait PageView: Send + Sync {
    /// URL the view is currently displaying.
    async fn current_url(&self) -> Result<String>;

    /// Document title.
    async fn title(&self) -> Result<String>;

    /// Wait until `selector` reaches `state`, erroring after `timeout`.
    async fn wait_for_selector(
        &self,
        selector: &str,
        state: SelectorState,
        timeout: Duration,
    ) -> Result<()>;

    /// Evaluate a script against the rendered document and return its value.
    async fn evaluate(&self, script: &str) -> Result<serde_json::Value>;

    /// Click the first element matching `selector`.
    async fn click(&self, selector: &str) -> Result<()>;
}
