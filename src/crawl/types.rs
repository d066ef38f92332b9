//! Task, label and error types for the traversal core.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Page-type label of a frontier task.
///
/// Entry is the initial state; the three labels form a strict fan-out tree
/// with no back-transitions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageLabel {
    #[default]
    Entry,
    Section,
    Category,
}

impl fmt::Display for PageLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Entry => write!(f, "entry"),
            Self::Section => write!(f, "section"),
            Self::Category => write!(f, "category"),
        }
    }
}

impl FromStr for PageLabel {
    type Err = ScrapeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "entry" => Ok(Self::Entry),
            "section" => Ok(Self::Section),
            "category" => Ok(Self::Category),
            other => Err(ScrapeError::UnknownLabel(other.to_string())),
        }
    }
}

/// A unit of traversal work. Consumed exactly once; the frontier owns
/// lifecycle and dedup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageTask {
    pub url: String,
    pub label: PageLabel,
}

impl PageTask {
    #[must_use]
    pub fn new(url: impl Into<String>, label: PageLabel) -> Self {
        Self {
            url: url.into(),
            label,
        }
    }
}

/// A link discovered on a page, tagged with the label its handler will use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredLink {
    pub url: String,
    pub label: PageLabel,
}

/// Crate-boundary error type.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("browser error: {0}")]
    Browser(String),

    #[error("unknown page label: {0}")]
    UnknownLabel(String),

    #[error("store error: {0}")]
    Store(String),

    #[error("scrape error: {0}")]
    Other(String),
}

impl From<anyhow::Error> for ScrapeError {
    fn from(err: anyhow::Error) -> Self {
        // {:#} keeps the whole context chain in the message.
        Self::Other(format!("{err:#}"))
    }
}

impl From<sqlx::Error> for ScrapeError {
    fn from(err: sqlx::Error) -> Self {
        Self::Store(err.to_string())
    }
}
