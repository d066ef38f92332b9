//! Page classification and dispatch.

use anyhow::{Context, Result};
use tracing::{info, warn};

use super::pagination::walk_category;
use super::readiness::await_ready;
use super::selectors::{FEATURED_SELECTOR, THUMBNAIL_SELECTOR};
use super::types::{DiscoveredLink, PageLabel, PageTask};
use crate::config::CrawlConfig;
use crate::dataset::Dataset;
use crate::extract::js_scripts::LINKS_SCRIPT;
use crate::page_view::{PageView, SelectorState};

/// Dispatch a task to its page-type handler.
///
/// Entry and Section pages return the links they discovered for the frontier
/// to enqueue. Category pages push their record batches to `dataset` and
/// return no links; they are the leaves of the fan-out tree.
pub async fn route(
    task: &PageTask,
    view: &dyn PageView,
    dataset: &Dataset,
    config: &CrawlConfig,
) -> Result<Vec<DiscoveredLink>> {
    match task.label {
        PageLabel::Entry => handle_entry(view, config).await,
        PageLabel::Section => handle_section(view, config).await,
        PageLabel::Category => {
            walk_category(view, dataset, config).await?;
            Ok(Vec::new())
        }
    }
}

async fn page_links(view: &dyn PageView) -> Result<Vec<String>> {
    let value = view
        .evaluate(LINKS_SCRIPT)
        .await
        .context("failed to evaluate link script")?;
    serde_json::from_value(value).context("failed to parse page links")
}

/// Entry page: discover department-listing links and hand them back as
/// Section tasks.
async fn handle_entry(view: &dyn PageView, config: &CrawlConfig) -> Result<Vec<DiscoveredLink>> {
    await_ready(view, config.ready_timeout()).await;
    if let Err(e) = view
        .wait_for_selector(
            FEATURED_SELECTOR,
            SelectorState::Visible,
            config.selector_timeout(),
        )
        .await
    {
        warn!("featured content not visible in time: {e}");
    }
    info!("enqueueing section URLs");
    let links = page_links(view).await?;
    Ok(discover_section_links(
        &links,
        config.department_url_prefix(),
    ))
}

/// Section page: discover links nested under the current URL and hand them
/// back as Category tasks.
async fn handle_section(view: &dyn PageView, config: &CrawlConfig) -> Result<Vec<DiscoveredLink>> {
    await_ready(view, config.ready_timeout()).await;
    let title = view.title().await.unwrap_or_default();
    let url = view.current_url().await.unwrap_or_default();
    info!(%url, "section page: {title}");
    if let Err(e) = view
        .wait_for_selector(
            THUMBNAIL_SELECTOR,
            SelectorState::Visible,
            config.selector_timeout(),
        )
        .await
    {
        warn!("category thumbnails not visible in time: {e}");
    }
    let links = page_links(view).await?;
    Ok(discover_category_links(&links, &url))
}

/// Links matching the department-listing URL prefix, labeled Section.
#[must_use]
pub fn discover_section_links(links: &[String], department_prefix: &str) -> Vec<DiscoveredLink> {
    links
        .iter()
        .filter(|url| url.starts_with(department_prefix))
        .map(|url| DiscoveredLink {
            url: url.clone(),
            label: PageLabel::Section,
        })
        .collect()
}

/// Links that are strict subpaths of `base_url`, labeled Category.
#[must_use]
pub fn discover_category_links(links: &[String], base_url: &str) -> Vec<DiscoveredLink> {
    let prefix = format!("{}/", base_url.trim_end_matches('/'));
    links
        .iter()
        .filter(|url| url.starts_with(&prefix) && url.len() > prefix.len())
        .map(|url| DiscoveredLink {
            url: url.clone(),
            label: PageLabel::Category,
        })
        .collect()
}
