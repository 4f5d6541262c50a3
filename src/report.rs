// Run statistics printed by the driver
use crate::model::MatchResult;
use crate::parser::{Catalog, ListingBatch};
use chrono::{DateTime, Duration, Utc};
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct RunReport {
    pub engine_name: String,
    pub engine_description: String,
    pub product_definitions: usize,
    /// Rejected at ingestion plus dropped while indexing.
    pub invalid_definitions: usize,
    pub total_listings: usize,
    pub hits: usize,
    pub misses: usize,
    pub started_at: DateTime<Utc>,
    pub elapsed: Duration,
    pub output_path: PathBuf,
}

impl RunReport {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        engine_name: &str,
        engine_description: &str,
        catalog: &Catalog,
        listings: &ListingBatch,
        result: &MatchResult,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
        output_path: PathBuf,
    ) -> Self {
        Self {
            engine_name: engine_name.to_string(),
            engine_description: engine_description.to_string(),
            product_definitions: catalog.total,
            invalid_definitions: catalog.invalid + result.invalid_products,
            total_listings: listings.total,
            hits: result.total_matches(),
            misses: result.total_misses(),
            started_at,
            elapsed: finished_at - started_at,
            output_path,
        }
    }

    /// Share of valid listings that found a product, in percent.
    pub fn hit_rate(&self) -> f64 {
        let classified = self.hits + self.misses;
        if classified == 0 {
            return 0.0;
        }
        (self.hits as f64 / classified as f64 * 10000.0).round() / 100.0
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "*************** SEARCH ENGINE ***************")?;
        writeln!(f, "Search implementation      : {}", self.engine_name)?;
        writeln!(f, "Description                : {}", self.engine_description)?;
        writeln!(f)?;
        writeln!(f, "************** INPUT STATISTICS *************")?;
        writeln!(f, "Total product definitions  : {}", self.product_definitions)?;
        writeln!(f, "Total invalid definitions  : {}", self.invalid_definitions)?;
        writeln!(f, "Total listings             : {}", self.total_listings)?;
        writeln!(f)?;
        writeln!(f, "****************** RESULTS ******************")?;
        writeln!(f, "Total hits                 : {}", self.hits)?;
        writeln!(f, "Total misses               : {}", self.misses)?;
        writeln!(f, "Hit rate (%)               : {:.2}", self.hit_rate())?;
        writeln!(f, "Started at                 : {}", self.started_at.to_rfc3339())?;
        writeln!(f, "Elapsed process time (ms)  : {}", self.elapsed.num_milliseconds())?;
        writeln!(f)?;
        write!(f, "Save file name             : {}", self.output_path.display())
    }
}
