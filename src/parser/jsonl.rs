// Line-delimited JSON parsing for products and listings
use crate::model::{DuplicateTable, IngestError, Listing, Product};
use serde_json::{Map, Value};
use std::collections::HashSet;
use tracing::warn;

pub const PRODUCT_ID_KEY: &str = "product_name";
pub const MANUFACTURER_KEY: &str = "manufacturer";
pub const MODEL_KEY: &str = "model";
pub const FAMILY_KEY: &str = "family";
pub const TITLE_KEY: &str = "title";

pub trait Parser {
    type Output;

    fn parse(&self, input: &str) -> Result<Self::Output, IngestError>;
}

/// Validated catalog plus input accounting.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub products: Vec<Product>,
    /// Records read, valid or not.
    pub total: usize,
    /// Records missing a required field or repeating a product id.
    pub invalid: usize,
}

/// Listings with one representative per exact title.
#[derive(Debug, Clone, Default)]
pub struct ListingBatch {
    pub listings: Vec<Listing>,
    pub duplicates: DuplicateTable,
    pub total: usize,
    pub invalid: usize,
}

impl ListingBatch {
    pub fn duplicate_count(&self) -> usize {
        self.duplicates.values().map(Vec::len).sum()
    }
}

pub struct ProductParser;

impl ProductParser {
    pub fn new() -> Self {
        Self
    }
}

impl Parser for ProductParser {
    type Output = Catalog;

    fn parse(&self, input: &str) -> Result<Catalog, IngestError> {
        let mut catalog = Catalog::default();
        let mut seen_ids = HashSet::new();

        for (line, mut record) in records(input)? {
            catalog.total += 1;
            let product_id = take_string(&mut record, PRODUCT_ID_KEY);
            let manufacturer = take_string(&mut record, MANUFACTURER_KEY);
            let model = take_string(&mut record, MODEL_KEY);
            let family = take_string(&mut record, FAMILY_KEY);

            let (Some(product_id), Some(manufacturer), Some(model)) = (product_id, manufacturer, model) else {
                warn!(line, "Product is missing a required field, ignoring entry");
                catalog.invalid += 1;
                continue;
            };
            if !seen_ids.insert(product_id.clone()) {
                warn!(line, product = %product_id, "Product id is not unique, ignoring entry");
                catalog.invalid += 1;
                continue;
            }

            catalog.products.push(Product {
                product_id,
                manufacturer,
                model,
                family,
                extra: record,
            });
        }
        Ok(catalog)
    }
}

pub struct ListingParser;

impl ListingParser {
    pub fn new() -> Self {
        Self
    }
}

impl Parser for ListingParser {
    type Output = ListingBatch;

    fn parse(&self, input: &str) -> Result<ListingBatch, IngestError> {
        let mut batch = ListingBatch::default();
        let mut seen_titles = HashSet::new();

        for (line, mut record) in records(input)? {
            batch.total += 1;
            let title = take_string(&mut record, TITLE_KEY);
            let manufacturer = take_string(&mut record, MANUFACTURER_KEY);

            let (Some(title), Some(manufacturer)) = (title, manufacturer) else {
                warn!(line, "Listing is missing a title or manufacturer, ignoring entry");
                batch.invalid += 1;
                continue;
            };

            let listing = Listing {
                title,
                manufacturer,
                extra: record,
            };
            // Only the first listing per exact title gets matched; the rest ride along.
            if seen_titles.insert(listing.title.clone()) {
                batch.listings.push(listing);
            } else {
                batch.duplicates.entry(listing.title.clone()).or_default().push(listing);
            }
        }
        Ok(batch)
    }
}

/// One JSON object per non-blank line, tagged with its 1-based line number.
fn records(input: &str) -> Result<Vec<(usize, Map<String, Value>)>, IngestError> {
    let mut out = Vec::new();
    for (idx, raw) in input.lines().enumerate() {
        let line = idx + 1;
        if raw.trim().is_empty() {
            continue;
        }
        let value: Value = serde_json::from_str(raw).map_err(|source| IngestError::Json { line, source })?;
        match value {
            Value::Object(map) => out.push((line, map)),
            _ => return Err(IngestError::NotAnObject { line }),
        }
    }
    Ok(out)
}

/// Removes `key` and returns it when it holds a string.
fn take_string(record: &mut Map<String, Value>, key: &str) -> Option<String> {
    match record.remove(key) {
        Some(Value::String(s)) => Some(s),
        Some(Value::Null) | None => None,
        Some(other) => {
            record.insert(key.to_string(), other);
            None
        }
    }
}
