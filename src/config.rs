use crate::model::ConfigError;
use clap::Parser;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "config.json";

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub products_path: PathBuf,
    pub listings_path: PathBuf,
    pub output_path: PathBuf,
    /// Extra manufacturer aliases, alias -> canonical manufacturer.
    pub aliases: BTreeMap<String, String>,
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            products_path: PathBuf::from("products.txt"),
            listings_path: PathBuf::from("listings.txt"),
            output_path: PathBuf::from("results.txt"),
            aliases: BTreeMap::new(),
            log_filter: "listing_matcher=info".to_string(),
        }
    }
}

/// Command line arguments; anything given here wins over the config file.
#[derive(Debug, Parser)]
#[command(name = "listing-matcher", version, about = "Match retailer listings to a product catalog")]
pub struct Cli {
    /// JSON config file. A missing default `config.json` falls back to built-in defaults.
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Line-delimited JSON product catalog.
    #[arg(long)]
    pub products: Option<PathBuf>,
    /// Line-delimited JSON listings.
    #[arg(long)]
    pub listings: Option<PathBuf>,
    /// Where the matched results are written.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config: AppConfig = serde_json::from_str(&content).map_err(|source| ConfigError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(config)
}

impl Cli {
    /// Config file (explicit or default) with command line overrides applied.
    pub fn resolve(&self) -> Result<AppConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => load_config(Path::new(DEFAULT_CONFIG_PATH))?,
            None => AppConfig::default(),
        };
        if let Some(path) = &self.products {
            config.products_path = path.clone();
        }
        if let Some(path) = &self.listings {
            config.listings_path = path.clone();
        }
        if let Some(path) = &self.output {
            config.output_path = path.clone();
        }
        Ok(config)
    }
}
