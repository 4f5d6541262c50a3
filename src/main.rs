use clap::Parser;
use listing_matcher::config::{AppConfig, Cli};
use listing_matcher::engine::AliasTable;
use listing_matcher::output::save_results;
use listing_matcher::parser::{load_catalog, load_listings};
use listing_matcher::report::RunReport;
use listing_matcher::{ScopedSearchEngine, SearchEngine};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Load configuration before logging so the filter can come from it
    let config = match cli.resolve() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Config load error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Initialize logging, RUST_LOG wins over the config file
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .init();

    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("😱 Panic occurred: {:?}", panic_info);
    }));

    match run(&config) {
        Ok(report) => {
            println!("{}", report);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("❌ {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(config: &AppConfig) -> Result<RunReport, Box<dyn std::error::Error>> {
    info!("🚀 Listing matcher starting");

    let catalog = load_catalog(&config.products_path)?;
    let batch = load_listings(&config.listings_path)?;

    let engine = ScopedSearchEngine::new(AliasTable::with_extra(&config.aliases));

    let started_at = chrono::Utc::now();
    let result = engine.process(&catalog.products, &batch.listings, &batch.duplicates)?;
    let finished_at = chrono::Utc::now();

    save_results(&config.output_path, &result)?;
    info!("✅ Done");

    Ok(RunReport::new(
        engine.name(),
        engine.description(),
        &catalog,
        &batch,
        &result,
        started_at,
        finished_at,
        config.output_path.clone(),
    ))
}
