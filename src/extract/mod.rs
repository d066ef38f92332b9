//! Record extraction from rendered product cards.
//!
//! A single in-page evaluation returns every card on the page; the Rust side
//! splits prices, applies the validity predicate and reads the breadcrumb
//! context. Splitting and validity are pure so they can be tested without a
//! browser.

pub mod js_scripts;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::normalize::clean_price;
use crate::page_view::PageView;

/// Wire form of one product card as returned by the in-page script.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCard {
    pub title: Option<String>,
    pub image_url: Option<String>,
    #[serde(default)]
    pub prices: Vec<String>,
}

/// One product card with prices split into original and discounted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawProductRecord {
    pub title: Option<String>,
    pub image_url: Option<String>,
    /// First price display on the card; empty when none was readable.
    pub original_price: String,
    /// Second price display; empty means no discount is in effect.
    pub discounted_price: String,
}

impl RawProductRecord {
    /// Split the card's price texts by DOM order: the first is the original
    /// price, the second (when present) the discounted one.
    #[must_use]
    pub fn from_card(card: ProductCard) -> Self {
        let mut prices = card
            .prices
            .iter()
            .map(|p| clean_price(p))
            .filter(|p| !p.is_empty());
        let original_price = prices.next().unwrap_or_default();
        let discounted_price = prices.next().unwrap_or_default();
        Self {
            title: card.title.filter(|t| !t.is_empty()),
            image_url: card.image_url,
            original_price,
            discounted_price,
        }
    }

    /// A record is persistable only with a title and an original price.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.title.is_some() && !self.original_price.is_empty()
    }
}

/// Department and category read from the breadcrumb tab bar. The UI exposes
/// these once per page render, not per card.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryContext {
    pub department: String,
    pub category: String,
}

impl CategoryContext {
    /// Fill empty fields from an earlier observation of the same traversal.
    /// Later pages sometimes re-render the tab bar empty.
    #[must_use]
    pub fn or_fallback(mut self, earlier: &CategoryContext) -> Self {
        if self.department.is_empty() {
            self.department = earlier.department.clone();
        }
        if self.category.is_empty() {
            self.category = earlier.category.clone();
        }
        self
    }
}

/// Scrape every product card on the current results page.
pub async fn extract_products(view: &dyn PageView) -> Result<Vec<RawProductRecord>> {
    let value = view
        .evaluate(js_scripts::PRODUCT_CARDS_SCRIPT)
        .await
        .context("failed to evaluate product card script")?;
    let cards: Vec<ProductCard> =
        serde_json::from_value(value).context("failed to parse product cards")?;
    Ok(cards.into_iter().map(RawProductRecord::from_card).collect())
}

/// Read the breadcrumb texts and take the first two as department and
/// category. Fewer than two texts leaves the remaining fields empty.
pub async fn extract_category_context(view: &dyn PageView) -> Result<CategoryContext> {
    let value = view
        .evaluate(js_scripts::BREADCRUMBS_SCRIPT)
        .await
        .context("failed to evaluate breadcrumb script")?;
    let texts: Vec<String> =
        serde_json::from_value(value).context("failed to parse breadcrumb texts")?;
    let mut texts = texts.into_iter();
    Ok(CategoryContext {
        department: texts.next().unwrap_or_default(),
        category: texts.next().unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(title: Option<&str>, prices: &[&str]) -> ProductCard {
        ProductCard {
            title: title.map(str::to_string),
            image_url: Some("https://cdn.example/img.jpg".to_string()),
            prices: prices.iter().map(|p| (*p).to_string()).collect(),
        }
    }

    #[test]
    fn splits_prices_by_dom_order() {
        let record = RawProductRecord::from_card(card(Some("Arroz"), &["R$ 20,00", "R$ 15,00"]));
        assert_eq!(record.original_price, "R$ 20,00");
        assert_eq!(record.discounted_price, "R$ 15,00");
    }

    #[test]
    fn single_price_means_no_discount() {
        let record = RawProductRecord::from_card(card(Some("Arroz"), &["R$ 20,00"]));
        assert_eq!(record.original_price, "R$ 20,00");
        assert_eq!(record.discounted_price, "");
        assert!(record.is_valid());
    }

    #[test]
    fn unit_suffix_is_stripped_from_prices() {
        let record = RawProductRecord::from_card(card(Some("Arroz"), &["R$ 12,90 un."]));
        assert_eq!(record.original_price, "R$ 12,90");
    }

    #[test]
    fn cards_without_title_or_price_are_invalid() {
        assert!(!RawProductRecord::from_card(card(None, &["R$ 1,00"])).is_valid());
        assert!(!RawProductRecord::from_card(card(Some("Arroz"), &[])).is_valid());
        assert!(!RawProductRecord::from_card(card(Some(""), &["R$ 1,00"])).is_valid());
    }

    #[test]
    fn category_context_falls_back_per_field() {
        let earlier = CategoryContext {
            department: "Bebidas".to_string(),
            category: "Cervejas".to_string(),
        };
        let current = CategoryContext {
            department: String::new(),
            category: "Vinhos".to_string(),
        };
        let merged = current.or_fallback(&earlier);
        assert_eq!(merged.department, "Bebidas");
        assert_eq!(merged.category, "Vinhos");
    }
}
