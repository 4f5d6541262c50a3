pub mod config;
pub mod engine;
pub mod model;
pub mod normalizer;
pub mod output;
pub mod parser;
pub mod report;
pub mod utils;

pub use engine::{ScopedSearchEngine, SearchEngine};
pub use model::{ConditionedKey, DuplicateTable, Listing, MatchResult, Product};
