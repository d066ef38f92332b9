//! Free-text field normalization.
//!
//! Product titles in the catalog carry pack attributes inline ("Arroz Tipo 1
//! 1kg Pack 6 unid"). The normalizer pulls weight, unit count and volume out
//! of the title into their own fields and cleans raw price display texts.
//! Everything here is pure and runs after extraction.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::extract::{CategoryContext, RawProductRecord};

/// Number (integer or decimal, comma or dot separated) followed by `kg` or
/// `g` as a whole word: "1kg", "1,5 kg", "500g".
static WEIGHT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b\d+(?:[.,]\d+)?\s?(?:kg|g)\b").expect("weight pattern is valid")
});

/// Integer followed by a unit-count token as a whole word: "6 unid",
/// "12 unid.", "2 unidade".
static UNIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b\d+\s?unid(?:ade)?\b\.?").expect("unit pattern is valid"));

/// Number followed by `ml` or `l` as a whole word: "500ml", "1,5 L".
static VOLUME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b\d+(?:[.,]\d+)?\s?(?:ml|l)\b").expect("volume pattern is valid")
});

/// Trailing per-unit suffix on price display texts ("R$ 12,90 un.").
static PRICE_UNIT_SUFFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*un\.\s*$").expect("price suffix pattern is valid"));

/// A fully normalized product record, ready for persistence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedProductRecord {
    pub title: String,
    pub image_url: String,
    pub original_price: String,
    /// Empty when no discount is in effect.
    pub discounted_price: String,
    pub department: String,
    pub category: String,
    pub weight: String,
    pub unit: String,
    pub volume: String,
}

impl NormalizedProductRecord {
    /// The catalog serves a stock placeholder image when a product photo is
    /// missing. Such records are persisted anyway but counted in the run
    /// summary.
    #[must_use]
    pub fn has_placeholder_image(&self) -> bool {
        self.image_url.contains("placeholders")
    }
}

fn first_match(re: &Regex, text: &str) -> String {
    re.find(text)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// Strip the trailing "un." suffix from a raw price display text.
#[must_use]
pub fn clean_price(raw: &str) -> String {
    PRICE_UNIT_SUFFIX_RE.replace(raw.trim(), "").to_string()
}

/// Parse pack attributes out of the title and attach the page's breadcrumb
/// context. Each attribute is extracted independently; a missing attribute
/// yields an empty string, never an error.
#[must_use]
pub fn normalize(record: RawProductRecord, context: &CategoryContext) -> NormalizedProductRecord {
    let title = record.title.unwrap_or_default();
    NormalizedProductRecord {
        weight: first_match(&WEIGHT_RE, &title),
        unit: first_match(&UNIT_RE, &title),
        volume: first_match(&VOLUME_RE, &title),
        image_url: record.image_url.unwrap_or_default(),
        original_price: record.original_price,
        discounted_price: record.discounted_price,
        department: context.department.clone(),
        category: context.category.clone(),
        title,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(title: &str) -> RawProductRecord {
        RawProductRecord {
            title: Some(title.to_string()),
            image_url: Some("https://cdn.example/img.jpg".to_string()),
            original_price: "R$ 10,00".to_string(),
            discounted_price: String::new(),
        }
    }

    fn context() -> CategoryContext {
        CategoryContext {
            department: "Mercearia".to_string(),
            category: "Arroz".to_string(),
        }
    }

    #[test]
    fn extracts_all_three_attributes_independently() {
        let record = normalize(raw("Arroz 1kg Pack 6 unid 500ml"), &context());
        assert_eq!(record.weight, "1kg");
        assert_eq!(record.unit, "6 unid");
        assert_eq!(record.volume, "500ml");
    }

    #[test]
    fn missing_attributes_yield_empty_strings() {
        let record = normalize(raw("Sabonete Premium"), &context());
        assert_eq!(record.weight, "");
        assert_eq!(record.unit, "");
        assert_eq!(record.volume, "");
        assert_eq!(record.title, "Sabonete Premium");
    }

    #[test]
    fn keeps_matched_substring_verbatim() {
        let record = normalize(raw("Queijo Minas 1,5 Kg"), &context());
        assert_eq!(record.weight, "1,5 Kg");

        let record = normalize(raw("LEITE INTEGRAL 1L"), &context());
        assert_eq!(record.volume, "1L");
    }

    #[test]
    fn unit_token_variants() {
        assert_eq!(normalize(raw("Cerveja Lata 12 unid."), &context()).unit, "12 unid.");
        assert_eq!(normalize(raw("Ovos 30 unidade"), &context()).unit, "30 unidade");
    }

    #[test]
    fn whole_word_boundaries_are_respected() {
        // "gr" is not the gram token.
        let record = normalize(raw("Tempero 500gr"), &context());
        assert_eq!(record.weight, "");
    }

    #[test]
    fn unit_token_must_be_a_whole_word() {
        assert_eq!(normalize(raw("Ovos 30 unidades"), &context()).unit, "");
        assert_eq!(normalize(raw("Fio 10 unido azul"), &context()).unit, "");
    }

    #[test]
    fn first_match_wins_per_attribute() {
        let record = normalize(raw("Kit 2kg + 1kg"), &context());
        assert_eq!(record.weight, "2kg");
    }

    #[test]
    fn normalization_is_idempotent() {
        let a = normalize(raw("Suco de Uva 1,5l 6 unid"), &context());
        let b = normalize(raw("Suco de Uva 1,5l 6 unid"), &context());
        assert_eq!(a, b);
    }

    #[test]
    fn attaches_category_context() {
        let record = normalize(raw("Arroz 1kg"), &context());
        assert_eq!(record.department, "Mercearia");
        assert_eq!(record.category, "Arroz");
    }

    #[test]
    fn clean_price_strips_unit_suffix() {
        assert_eq!(clean_price("R$ 12,90 un."), "R$ 12,90");
        assert_eq!(clean_price("R$ 12,90"), "R$ 12,90");
        assert_eq!(clean_price("  R$ 5,49 "), "R$ 5,49");
        assert_eq!(clean_price("un."), "");
    }

    #[test]
    fn placeholder_images_are_detected() {
        let mut record = normalize(raw("Arroz 1kg"), &context());
        assert!(!record.has_placeholder_image());
        record.image_url = "https://cdn.example/placeholders/product.png".to_string();
        assert!(record.has_placeholder_image());
    }
}
