use listing_matcher::engine::AliasTable;
use listing_matcher::output::save_results;
use listing_matcher::parser::{load_catalog, load_listings};
use listing_matcher::report::RunReport;
use listing_matcher::{ScopedSearchEngine, SearchEngine};
use serde_json::Value;
use std::fs;
use std::path::Path;

const PRODUCTS: &str = r#"{"product_name":"Sony_Cyber-shot_DSC-W310","manufacturer":"Sony","model":"DSC-W310","family":"Cyber-shot","announced-date":"2010-01-06T19:00:00.000-05:00"}
{"product_name":"Canon_EOS5D","manufacturer":"Canon","model":"EOS5D"}
{"product_name":"Nikon_D90","manufacturer":"Nikon","model":"D90"}
{"product_name":"Broken","manufacturer":"Nikon"}
"#;

const LISTINGS: &str = r#"{"title":"Sony Cyber-shot DSC-W310 12.1MP","manufacturer":"Sony","currency":"CAD","price":"100.00"}
{"title":"Canon EOS5D body only","manufacturer":"Canon","currency":"CAD","price":"1299.99"}
{"title":"Sony Cyber-shot DSC-W310 12.1MP","manufacturer":"Sony","currency":"USD","price":"90.00"}

{"title":"Tripod stand","manufacturer":"Manfrotto","currency":"EUR","price":"49.00"}
{"title":"Nikon D90 kit","manufacturer":"Nikon","currency":"GBP","price":"599.00"}
{"title":"Tripod stand","manufacturer":"Manfrotto","currency":"EUR","price":"45.00"}
"#;

fn write(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn files_in_results_out() {
    let dir = tempfile::tempdir().unwrap();
    let products_path = write(dir.path(), "products.txt", PRODUCTS);
    let listings_path = write(dir.path(), "listings.txt", LISTINGS);
    let output_path = dir.path().join("results.txt");

    let catalog = load_catalog(&products_path).unwrap();
    let batch = load_listings(&listings_path).unwrap();
    assert_eq!(catalog.total, 4);
    assert_eq!(catalog.invalid, 1);
    assert_eq!(batch.total, 6);
    assert_eq!(batch.listings.len(), 4);
    assert_eq!(batch.duplicate_count(), 2);

    let engine = ScopedSearchEngine::default();
    let result = engine.process(&catalog.products, &batch.listings, &batch.duplicates).unwrap();
    assert_eq!(result.direct_matches, 3);
    assert_eq!(result.duplicate_matches, 1);
    assert_eq!(result.unmatched.len(), 1);
    assert_eq!(result.total_matches(), 4);
    // The unmatched tripod and its unmerged copy.
    assert_eq!(result.total_misses(), 2);

    let written = save_results(&output_path, &result).unwrap();
    assert_eq!(written, 3);

    let content = fs::read_to_string(&output_path).unwrap();
    let lines: Vec<Value> = content.lines().map(|l| serde_json::from_str(l).unwrap()).collect();
    let names: Vec<&str> = lines.iter().map(|l| l["product_name"].as_str().unwrap()).collect();
    assert_eq!(names, ["Canon_EOS5D", "Nikon_D90", "Sony_Cyber-shot_DSC-W310"]);

    let sony = lines[2]["listings"].as_array().unwrap();
    assert_eq!(sony.len(), 2);
    assert_eq!(sony[0]["price"], "100.00");
    assert_eq!(sony[1]["price"], "90.00");
    assert_eq!(sony[1]["currency"], "USD");
}

#[test]
fn report_reflects_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = load_catalog(&write(dir.path(), "products.txt", PRODUCTS)).unwrap();
    let batch = load_listings(&write(dir.path(), "listings.txt", LISTINGS)).unwrap();

    let engine = ScopedSearchEngine::default();
    let started_at = chrono::Utc::now();
    let result = engine.process(&catalog.products, &batch.listings, &batch.duplicates).unwrap();
    let report = RunReport::new(
        engine.name(),
        engine.description(),
        &catalog,
        &batch,
        &result,
        started_at,
        chrono::Utc::now(),
        dir.path().join("results.txt"),
    );

    assert_eq!(report.product_definitions, 4);
    assert_eq!(report.invalid_definitions, 1);
    assert_eq!(report.total_listings, 6);
    assert_eq!(report.hits, 4);
    assert_eq!(report.misses, 2);
    assert!(report.to_string().contains("Total hits                 : 4"));
}

#[test]
fn configured_alias_reaches_catalog_manufacturer() {
    let products = vec![listing_matcher::Product::new("Acme_PP-1", "Acme", "PP-1", None)];
    let listings = vec![listing_matcher::Listing::new("PP-1 compact camera", "PhotoPro Store")];
    let duplicates = listing_matcher::DuplicateTable::new();

    let plain = ScopedSearchEngine::default().process(&products, &listings, &duplicates).unwrap();
    assert_eq!(plain.unmatched.len(), 1);

    let aliased = ScopedSearchEngine::new(AliasTable::with_extra([("Photo Pro", "Acme")]))
        .process(&products, &listings, &duplicates)
        .unwrap();
    assert_eq!(aliased.listings_for("Acme_PP-1").len(), 1);
    assert!(aliased.unmatched.is_empty());
}

#[test]
fn malformed_listing_line_is_reported_with_its_number() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        dir.path(),
        "listings.txt",
        "{\"title\":\"ok\",\"manufacturer\":\"Canon\"}\n{ not json\n",
    );
    let err = load_listings(&path).unwrap_err();
    assert!(err.to_string().contains("line 2"), "{err}");
}

#[test]
fn missing_input_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_catalog(&dir.path().join("nope.txt")).unwrap_err();
    assert!(matches!(err, listing_matcher::model::IngestError::Io { .. }));
}
