//! Exhaustive scroll driver for lazily loaded content.

use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::extract::js_scripts::{SCROLL_HEIGHT_SCRIPT, SCROLL_TO_BOTTOM_SCRIPT};
use crate::page_view::PageView;

/// Ceiling on scroll passes so a page whose height keeps changing cannot
/// stall the traversal forever.
pub const MAX_SCROLL_PASSES: usize = 100;

async fn content_height(view: &dyn PageView) -> Result<u64> {
    let value = view
        .evaluate(SCROLL_HEIGHT_SCRIPT)
        .await
        .context("failed to measure content height")?;
    Ok(value.as_u64().unwrap_or(0))
}

/// Repeatedly scroll to the bottom until the content height stabilizes.
///
/// Terminates when two consecutive height measurements are equal or after
/// [`MAX_SCROLL_PASSES`]. `settle` is the pause after each scroll that gives
/// lazy content time to render (about a second in production, zero in tests).
pub async fn scroll_to_bottom(view: &dyn PageView, settle: Duration) -> Result<()> {
    let mut previous = content_height(view).await?;
    for pass in 1..=MAX_SCROLL_PASSES {
        view.evaluate(SCROLL_TO_BOTTOM_SCRIPT)
            .await
            .context("failed to scroll to bottom")?;
        tokio::time::sleep(settle).await;
        let current = content_height(view).await?;
        if current == previous {
            debug!("content height stable at {current} after {pass} scroll passes");
            return Ok(());
        }
        previous = current;
    }
    warn!("content height never stabilized after {MAX_SCROLL_PASSES} passes, continuing with partial content");
    Ok(())
}
