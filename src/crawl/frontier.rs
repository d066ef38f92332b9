//! Frontier: queue, dedup and bounded-concurrency dispatch.
//!
//! Owns task lifecycle around the router: seeds the queue with entry tasks,
//! deduplicates discovered URLs, enforces the crawl-size cap and drives up to
//! `max_concurrent_pages` page tasks at once.

use std::collections::VecDeque;
use std::sync::Arc;

use anyhow::{Context, Result};
use chromiumoxide::browser::Browser;
use dashmap::DashSet;
use futures::StreamExt;
use futures::stream::FuturesUnordered;
use tokio::sync::{Mutex, Semaphore};
use tracing::{debug, info, warn};

use super::router::route;
use super::types::{PageLabel, PageTask};
use crate::browser::launch_browser;
use crate::config::CrawlConfig;
use crate::dataset::Dataset;
use crate::normalize::NormalizedProductRecord;
use crate::page_view::chromium::ChromiumPageView;

/// Outcome of a full traversal.
#[derive(Debug, Clone, Default)]
pub struct CrawlSummary {
    /// Pages whose handler completed without error.
    pub pages_visited: usize,
    /// Every normalized record the category handlers produced.
    pub records: Vec<NormalizedProductRecord>,
}

type TaskQueue = Mutex<VecDeque<PageTask>>;

/// Run the full traversal over the configured seed URLs.
pub async fn run_crawl(config: CrawlConfig) -> Result<CrawlSummary> {
    let (browser, handler_task, user_data_dir) = launch_browser(config.headless())
        .await
        .context("failed to launch browser")?;
    let browser = Arc::new(browser);

    let dataset = Arc::new(Dataset::new());
    let queue: Arc<TaskQueue> = Arc::new(Mutex::new(
        config
            .start_urls()
            .iter()
            .map(|url| PageTask::new(url.clone(), PageLabel::Entry))
            .collect(),
    ));
    let visited: Arc<DashSet<String>> = Arc::new(DashSet::new());
    let semaphore = Arc::new(Semaphore::new(config.max_concurrent_pages()));

    let mut dispatched = 0usize;
    let mut completed = 0usize;
    let mut active_tasks = FuturesUnordered::new();

    loop {
        // Refill up to the concurrency ceiling.
        while active_tasks.len() < config.max_concurrent_pages() {
            if let Some(limit) = config.max_requests()
                && dispatched >= limit
            {
                debug!("crawl size cap of {limit} reached, draining active tasks");
                break;
            }
            let task = {
                let mut q = queue.lock().await;
                match q.pop_front() {
                    Some(task) => task,
                    None => break,
                }
            };
            if !visited.insert(task.url.clone()) {
                continue;
            }
            let permit = semaphore
                .clone()
                .acquire_owned()
                .await
                .context("semaphore closed")?;
            dispatched += 1;

            let browser = Arc::clone(&browser);
            let dataset = Arc::clone(&dataset);
            let queue = Arc::clone(&queue);
            let config = config.clone();

            active_tasks.push(tokio::spawn(async move {
                let _permit = permit;
                let url = task.url.clone();
                match process_page_task(&browser, &task, &dataset, &queue, &config).await {
                    Ok(()) => Ok(url),
                    Err(e) => Err((url, e)),
                }
            }));
        }

        match active_tasks.next().await {
            Some(Ok(Ok(url))) => {
                completed += 1;
                debug!("completed {url}");
            }
            Some(Ok(Err((url, e)))) => {
                warn!("page task failed for {url}: {e:#}");
            }
            Some(Err(e)) => {
                warn!("page task panicked: {e}");
            }
            // Nothing active and nothing left to dispatch.
            None => break,
        }
    }

    shutdown_browser(browser, handler_task, &user_data_dir).await;

    let records = dataset.take_all().await;
    info!(
        "traversal complete: {completed} pages, {} records",
        records.len()
    );
    Ok(CrawlSummary {
        pages_visited: completed,
        records,
    })
}

/// Open the task's URL in a fresh tab, dispatch it to the router and enqueue
/// whatever links the handler discovered. The tab is closed on every path.
async fn process_page_task(
    browser: &Browser,
    task: &PageTask,
    dataset: &Dataset,
    queue: &TaskQueue,
    config: &CrawlConfig,
) -> Result<()> {
    info!("crawling [{}]: {}", task.label, task.url);
    let page = browser
        .new_page(task.url.as_str())
        .await
        .context("failed to open page")?;
    if let Err(e) = page.wait_for_navigation().await {
        debug!("navigation wait ended early for {}: {e}", task.url);
    }

    let view = ChromiumPageView::new(page);
    let result = route(task, &view, dataset, config).await;

    if let Err(e) = view.page().clone().close().await {
        debug!("failed to close page for {}: {e}", task.url);
    }

    let links = result?;
    if !links.is_empty() {
        let mut q = queue.lock().await;
        for link in &links {
            q.push_back(PageTask::new(link.url.clone(), link.label));
        }
        debug!("enqueued {} links from {}", links.len(), task.url);
    }
    Ok(())
}

/// Close the browser, reap the process, remove its profile directory and
/// abort the CDP handler task, in that order.
async fn shutdown_browser(
    browser: Arc<Browser>,
    handler_task: tokio::task::JoinHandle<()>,
    user_data_dir: &std::path::Path,
) {
    match Arc::try_unwrap(browser) {
        Ok(mut browser) => {
            if let Err(e) = browser.close().await {
                warn!("failed to close browser: {e}");
            }
            if let Err(e) = browser.wait().await {
                warn!("failed to reap browser process: {e}");
            }
        }
        Err(arc) => {
            warn!(
                "browser still has {} references, skipping graceful close",
                Arc::strong_count(&arc)
            );
        }
    }

    if let Err(e) = std::fs::remove_dir_all(user_data_dir) {
        debug!("failed to remove user data dir: {e}");
    }

    handler_task.abort();
    if let Err(e) = handler_task.await
        && !e.is_cancelled()
    {
        warn!("handler task failed during shutdown: {e}");
    }
}
