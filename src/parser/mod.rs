// Ingestion: read product and listing files into validated records
pub mod jsonl;

pub use jsonl::{Catalog, ListingBatch, ListingParser, Parser, ProductParser};

use crate::model::IngestError;
use std::fs;
use std::path::Path;
use tracing::info;

fn read_input(path: &Path) -> Result<String, IngestError> {
    fs::read_to_string(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads and validates the product catalog at `path`.
pub fn load_catalog(path: &Path) -> Result<Catalog, IngestError> {
    let catalog = ProductParser::new().parse(&read_input(path)?)?;
    info!(
        path = %path.display(),
        products = catalog.products.len(),
        invalid = catalog.invalid,
        "Catalog loaded"
    );
    Ok(catalog)
}

/// Loads listings at `path`, setting exact-title duplicates aside.
pub fn load_listings(path: &Path) -> Result<ListingBatch, IngestError> {
    let batch = ListingParser::new().parse(&read_input(path)?)?;
    info!(
        path = %path.display(),
        listings = batch.listings.len(),
        duplicates = batch.duplicate_count(),
        invalid = batch.invalid,
        "Listings loaded"
    );
    Ok(batch)
}
