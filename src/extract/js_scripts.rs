//! In-page evaluation scripts.
//!
//! Every script is an IIFE returning a JSON-serializable value so
//! `PageView::evaluate` can hand the result straight to serde.

/// Collect every product card on the current results page.
///
/// Price displays carry a trailing "un." suffix in a separate child node, so
/// only the primary text node of each price element is read. Empty texts are
/// dropped; the remaining prices arrive trimmed, in DOM order.
pub const PRODUCT_CARDS_SCRIPT: &str = r#"
    (() => {
        return Array.from(document.querySelectorAll('.border-promotion')).map((card) => {
            const titleElement = card.querySelector('.caption a');
            const imageElement = card.querySelector('.img-container--product');
            const prices = Array.from(card.querySelectorAll('.info-price'))
                .map((price) => price.childNodes[0]?.textContent?.trim() || '')
                .filter((text) => text.length > 0);
            return {
                title: titleElement ? titleElement.innerText.trim() : null,
                image_url: imageElement ? imageElement.src : null,
                prices,
            };
        });
    })()
"#;

/// Breadcrumb tab texts naming the current department and category.
pub const BREADCRUMBS_SCRIPT: &str = r#"
    (() => {
        return Array.from(document.querySelectorAll('.vip-tabs-bar__item .ng-star-inserted'))
            .map((el) => (el.textContent || '').trim())
            .filter((text) => text.length > 0);
    })()
"#;

/// Absolute http(s) link targets on the page, duplicates removed.
pub const LINKS_SCRIPT: &str = r#"
    (() => {
        const seen = new Set();
        const links = [];
        for (const anchor of document.querySelectorAll('a[href]')) {
            try {
                const url = new URL(anchor.getAttribute('href'), window.location.href);
                if (url.protocol !== 'http:' && url.protocol !== 'https:') continue;
                if (seen.has(url.href)) continue;
                seen.add(url.href);
                links.push(url.href);
            } catch (e) {
                // unparseable href, skip
            }
        }
        return links;
    })()
"#;

/// Current scrollable content height.
pub const SCROLL_HEIGHT_SCRIPT: &str = r"
    (() => document.body.scrollHeight)()
";

/// Scroll the viewport to the bottom of the document. Returns the height
/// scrolled to so the evaluation always yields a value.
pub const SCROLL_TO_BOTTOM_SCRIPT: &str = r"
    (() => {
        window.scrollTo(0, document.body.scrollHeight);
        return document.body.scrollHeight;
    })()
";

/// Presence and enabled state of the next-page control. The disabled marker
/// sits on the control's enclosing list item, not on the anchor itself.
pub const NEXT_PAGE_STATE_SCRIPT: &str = r#"
    (() => {
        const control = document.querySelector('.pagination-next a');
        if (!control) {
            return { present: false, disabled: false };
        }
        const wrapper = control.closest('li') || control.parentElement;
        const disabled = wrapper !== null && wrapper.classList.contains('disabled');
        return { present: true, disabled };
    })()
"#;
