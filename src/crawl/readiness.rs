//! Readiness detection for asynchronously rendered pages.

use std::time::Duration;

use tracing::warn;

use super::selectors::LOADER_SELECTOR;
use crate::page_view::{PageView, SelectorState};

/// Wait for the loading overlay to detach from the document.
///
/// Best effort: if the overlay is still attached when the timeout elapses, a
/// warning is logged and the caller proceeds with whatever the page shows.
/// Validity filtering downstream drops records scraped from a stale render.
pub async fn await_ready(view: &dyn PageView, timeout: Duration) {
    if let Err(e) = view
        .wait_for_selector(LOADER_SELECTOR, SelectorState::Detached, timeout)
        .await
    {
        warn!("loading screen did not disappear in time, proceeding anyway: {e}");
    }
}
