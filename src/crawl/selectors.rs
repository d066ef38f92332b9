//! CSS selectors for the catalog's markup.

/// Async loading overlay; readiness means this has detached.
pub const LOADER_SELECTOR: &str = ".loader";

/// Featured-content block on the entry page.
pub const FEATURED_SELECTOR: &str = ".featured";

/// Category thumbnail on a section page.
pub const THUMBNAIL_SELECTOR: &str = ".thumbnail";

/// One product card on a category results page.
pub const PRODUCT_CARD_SELECTOR: &str = ".border-promotion";

/// Product image inside a card.
pub const PRODUCT_IMAGE_SELECTOR: &str = ".image-product";

/// Control that advances to the next results page.
pub const NEXT_PAGE_SELECTOR: &str = ".pagination-next a";
