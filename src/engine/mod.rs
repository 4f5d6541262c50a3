// Engine module: catalog indexing, modifier discovery, matching and duplicate merging.

pub mod aliases;
pub mod duplicates;
pub mod index;
pub mod matcher;
pub mod modifiers;
pub mod patterns;

pub use aliases::AliasTable;
pub use index::CatalogIndex;
pub use matcher::Matcher;

use crate::model::{DuplicateTable, Listing, MatchError, MatchResult, Product};
use duplicates::merge_duplicates;
use modifiers::GenericModifiers;
use patterns::PatternTable;
use tracing::{debug, info};

/// Trait defining the interface for a listing-to-product matching strategy.
pub trait SearchEngine {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    /// Classifies every listing against the catalog, then reattaches the
    /// exact-title duplicates of matched listings.
    fn process(
        &self,
        products: &[Product],
        listings: &[Listing],
        duplicates: &DuplicateTable,
    ) -> Result<MatchResult, MatchError>;
}

/// Scopes each listing by manufacturer or family before testing the
/// generated model patterns of that scope only.
pub struct ScopedSearchEngine {
    aliases: AliasTable,
}

impl Default for ScopedSearchEngine {
    fn default() -> Self {
        Self::new(AliasTable::default())
    }
}

impl ScopedSearchEngine {
    pub fn new(aliases: AliasTable) -> Self {
        Self { aliases }
    }

    /// Seed patterns from the index plus whatever the generic modifiers add.
    pub fn build_patterns(index: &CatalogIndex) -> Result<PatternTable, MatchError> {
        let mut sets = index.patterns().clone();
        let modifiers = GenericModifiers::discover(index);
        for (key, extra) in modifiers.patterns() {
            sets.entry(key).or_default().extend(&extra);
        }
        PatternTable::compile(&sets)
    }
}

impl SearchEngine for ScopedSearchEngine {
    fn name(&self) -> &'static str {
        "Scoped pattern search engine"
    }

    fn description(&self) -> &'static str {
        "Resolves manufacturer or family first, then tests generated whole-word model patterns within that scope"
    }

    fn process(
        &self,
        products: &[Product],
        listings: &[Listing],
        duplicates: &DuplicateTable,
    ) -> Result<MatchResult, MatchError> {
        let index = CatalogIndex::build(products);
        let patterns = Self::build_patterns(&index)?;
        info!(
            products = index.len(),
            invalid = index.invalid(),
            pattern_sets = patterns.len(),
            "Catalog ready"
        );

        let matcher = Matcher::new(&index, &patterns, &self.aliases);
        let mut result = MatchResult {
            duplicate_listings: duplicates.values().map(Vec::len).sum(),
            invalid_products: index.invalid(),
            ..Default::default()
        };

        for listing in listings {
            match matcher.match_listing(listing)? {
                Some(product_id) => {
                    debug!(title = %listing.title, product = product_id, "Listing matched");
                    result
                        .groups
                        .entry(product_id.to_string())
                        .or_default()
                        .push(listing.clone());
                    result.direct_matches += 1;
                }
                None => result.unmatched.push(listing.clone()),
            }
        }

        result.duplicate_matches = merge_duplicates(&mut result.groups, duplicates);
        info!(
            direct = result.direct_matches,
            duplicates = result.duplicate_matches,
            unmatched = result.unmatched.len(),
            "Matching finished"
        );
        Ok(result)
    }
}
