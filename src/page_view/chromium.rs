//! chromiumoxide adapter for [`PageView`].

use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chromiumoxide::page::Page;
use tracing::trace;

use super::{PageView, SelectorState};

/// How often selector waits re-check the document.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// A live Chromium tab.
pub struct ChromiumPageView {
    page: Page,
}

impl ChromiumPageView {
    #[must_use]
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    /// The wrapped page, for driver-level operations such as closing the tab.
    #[must_use]
    pub fn page(&self) -> &Page {
        &self.page
    }

    fn selector_check_script(selector: &str, state: SelectorState) -> Result<String> {
        // The selector is injected as a JSON string literal so quotes and
        // backslashes survive.
        let selector_json =
            serde_json::to_string(selector).context("failed to encode selector")?;
        let condition = match state {
            SelectorState::Attached => "el !== null",
            SelectorState::Visible => "el !== null && el.getClientRects().length > 0",
            SelectorState::Detached => "el === null",
        };
        Ok(format!(
            "(() => {{ const el = document.querySelector({selector_json}); return {condition}; }})()"
        ))
    }
}

#[async_trait]
impl PageView for ChromiumPageView {
    async fn current_url(&self) -> Result<String> {
        match self.page.url().await {
            Ok(Some(url)) => Ok(url),
            Ok(None) => {
                trace!("page has no URL yet");
                Ok("about:blank".to_string())
            }
            Err(e) => Err(anyhow!("failed to read page URL: {e}")),
        }
    }

    async fn title(&self) -> Result<String> {
        let value = self.evaluate("document.title").await?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    async fn wait_for_selector(
        &self,
        selector: &str,
        state: SelectorState,
        timeout: Duration,
    ) -> Result<()> {
        let script = Self::selector_check_script(selector, state)?;
        let start = Instant::now();
        loop {
            // Evaluation errors during load are treated as "not yet".
            let reached = match self.evaluate(&script).await {
                Ok(value) => value.as_bool().unwrap_or(false),
                Err(e) => {
                    trace!("selector check failed, retrying: {e}");
                    false
                }
            };
            if reached {
                return Ok(());
            }
            if start.elapsed() >= timeout {
                return Err(anyhow!(
                    "timed out after {timeout:?} waiting for '{selector}' to become {state:?}"
                ));
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn evaluate(&self, script: &str) -> Result<serde_json::Value> {
        let result = self
            .page
            .evaluate(script)
            .await
            .map_err(|e| anyhow!("script evaluation failed: {e}"))?;
        result
            .into_value::<serde_json::Value>()
            .map_err(|e| anyhow!("failed to read evaluation result: {e}"))
    }

    async fn click(&self, selector: &str) -> Result<()> {
        let element = self
            .page
            .find_element(selector)
            .await
            .map_err(|e| anyhow!("no element matching '{selector}': {e}"))?;
        element
            .click()
            .await
            .map_err(|e| anyhow!("failed to click '{selector}': {e}"))?;
        Ok(())
    }
}
