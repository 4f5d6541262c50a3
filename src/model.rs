// Core structs: Product, Listing, ConditionedKey, MatchResult and the error enums
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// A canonical catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "product_name")]
    pub product_id: String,
    pub manufacturer: String,
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Product {
    pub fn new(product_id: &str, manufacturer: &str, model: &str, family: Option<&str>) -> Self {
        Self {
            product_id: product_id.to_string(),
            manufacturer: manufacturer.to_string(),
            model: model.to_string(),
            family: family.map(str::to_string),
            extra: Map::new(),
        }
    }
}

/// A retailer offer. Everything besides `title` and `manufacturer` is carried
/// through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub title: String,
    pub manufacturer: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Listing {
    pub fn new(title: &str, manufacturer: &str) -> Self {
        Self {
            title: title.to_string(),
            manufacturer: manufacturer.to_string(),
            extra: Map::new(),
        }
    }
}

/// Exact listing title -> the other listings sharing that title.
pub type DuplicateTable = HashMap<String, Vec<Listing>>;

/// Join key between the catalog indices and the pattern table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConditionedKey {
    pub manufacturer: String,
    /// Empty when the product has no family.
    pub family: String,
    pub model: String,
}

impl ConditionedKey {
    pub fn new(manufacturer: &str, family: Option<&str>, model: &str) -> Self {
        Self {
            manufacturer: manufacturer.to_string(),
            family: family.unwrap_or_default().to_string(),
            model: model.to_string(),
        }
    }
}

impl fmt::Display for ConditionedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}@{}", self.manufacturer, self.family, self.model)
    }
}

/// Outcome of one matching run.
#[derive(Debug, Clone, Default)]
pub struct MatchResult {
    /// product_id -> listings in discovery order.
    pub groups: BTreeMap<String, Vec<Listing>>,
    pub unmatched: Vec<Listing>,
    pub direct_matches: usize,
    pub duplicate_matches: usize,
    /// Number of exact-title duplicates handed to the engine.
    pub duplicate_listings: usize,
    /// Catalog entries dropped while indexing.
    pub invalid_products: usize,
}

impl MatchResult {
    pub fn total_matches(&self) -> usize {
        self.direct_matches + self.duplicate_matches
    }

    /// Unmatched representatives plus every duplicate that never got merged.
    pub fn total_misses(&self) -> usize {
        (self.unmatched.len() + self.duplicate_listings).saturating_sub(self.duplicate_matches)
    }

    pub fn listings_for(&self, product_id: &str) -> &[Listing] {
        self.groups.get(product_id).map(Vec::as_slice).unwrap_or_default()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed JSON on line {line}: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("line {line} is not a JSON object")]
    NotAnObject { line: usize },
}

#[derive(Debug, Error)]
pub enum MatchError {
    #[error("recognition pattern for {key} failed to compile: {source}")]
    Pattern {
        key: String,
        #[source]
        source: regex::Error,
    },
    #[error("index invariant violated: {0}")]
    Invariant(String),
}

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to write results to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write results: {0}")]
    Write(#[from] std::io::Error),
    #[error("failed to encode results: {0}")]
    Json(#[from] serde_json::Error),
}
