//! Pagination walker for category result pages.

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::readiness::await_ready;
use super::scroll::scroll_to_bottom;
use super::selectors::{NEXT_PAGE_SELECTOR, PRODUCT_CARD_SELECTOR, PRODUCT_IMAGE_SELECTOR};
use crate::config::CrawlConfig;
use crate::dataset::Dataset;
use crate::extract::{self, CategoryContext, RawProductRecord, js_scripts::NEXT_PAGE_STATE_SCRIPT};
use crate::normalize::{NormalizedProductRecord, normalize};
use crate::page_view::{PageView, SelectorState};

/// Wire form of the next-page control inspection.
#[derive(Debug, Clone, Copy, Deserialize)]
struct NextPageState {
    present: bool,
    disabled: bool,
}

async fn next_page_state(view: &dyn PageView) -> Result<NextPageState> {
    let value = view
        .evaluate(NEXT_PAGE_STATE_SCRIPT)
        .await
        .context("failed to inspect next-page control")?;
    serde_json::from_value(value).context("failed to parse next-page control state")
}

/// Totals for one category traversal.
#[derive(Debug, Clone, Copy, Default)]
pub struct CategorySummary {
    pub pages: usize,
    pub records: usize,
}

/// Walk every results page of a category, extracting and normalizing each
/// page's product cards and pushing one batch per page to `dataset`.
///
/// The loop is driven purely by the next-page control: absent or disabled
/// means pagination is exhausted. A configurable page ceiling guards against
/// a site that re-serves pages without ever disabling the control; hitting it
/// logs a warning and returns the partial results.
pub async fn walk_category(
    view: &dyn PageView,
    dataset: &Dataset,
    config: &CrawlConfig,
) -> Result<CategorySummary> {
    await_ready(view, config.ready_timeout()).await;
    scroll_to_bottom(view, config.scroll_settle()).await?;

    let mut summary = CategorySummary::default();
    let mut last_context = CategoryContext::default();

    loop {
        if summary.pages > 0 {
            await_ready(view, config.ready_timeout()).await;
            scroll_to_bottom(view, config.scroll_settle()).await?;
        }

        if let Err(e) = view
            .wait_for_selector(
                PRODUCT_CARD_SELECTOR,
                SelectorState::Visible,
                config.selector_timeout(),
            )
            .await
        {
            warn!("product cards not visible in time: {e}");
        }
        if let Err(e) = view
            .wait_for_selector(
                PRODUCT_IMAGE_SELECTOR,
                SelectorState::Attached,
                config.selector_timeout(),
            )
            .await
        {
            warn!("product images not attached in time: {e}");
        }

        // The tab bar sometimes re-renders empty on later pages; fall back
        // to the most recent non-empty observation of this traversal.
        let context = extract::extract_category_context(view)
            .await?
            .or_fallback(&last_context);

        let batch: Vec<NormalizedProductRecord> = extract::extract_products(view)
            .await?
            .into_iter()
            .filter(RawProductRecord::is_valid)
            .map(|record| normalize(record, &context))
            .collect();

        let url = view.current_url().await.unwrap_or_default();
        info!("scraped {} products from {url}", batch.len());
        summary.records += batch.len();
        summary.pages += 1;
        last_context = context;
        dataset.push_batch(batch).await;

        let next = next_page_state(view).await?;
        if !next.present {
            debug!("no next-page control, pagination exhausted");
            break;
        }
        if next.disabled {
            debug!("next-page control disabled, pagination exhausted");
            break;
        }
        // Only warn when pages were actually left behind.
        if summary.pages >= config.max_pagination_pages() {
            warn!(
                "reached pagination ceiling of {} pages with more pages available, returning partial results",
                config.max_pagination_pages()
            );
            break;
        }
        view.click(NEXT_PAGE_SELECTOR)
            .await
            .context("failed to click next-page control")?;
    }

    Ok(summary)
}
