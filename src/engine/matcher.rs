// Per-listing matching: manufacturer/family scope first, then model patterns
use crate::engine::aliases::AliasTable;
use crate::engine::index::{CatalogIndex, ModelMap};
use crate::engine::patterns::PatternTable;
use crate::model::{Listing, MatchError};
use crate::normalizer::{ConditionedTitle, condition};
use crate::utils::{longest_first, strip_digits};
use tracing::debug;

/// The set of models a listing may match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    Family { family: String, manufacturer: String },
    Manufacturer(String),
}

impl Scope {
    /// Conditioned manufacturer the scope belongs to.
    pub fn manufacturer(&self) -> &str {
        match self {
            Scope::Family { manufacturer, .. } => manufacturer,
            Scope::Manufacturer(manufacturer) => manufacturer,
        }
    }
}

pub struct Matcher<'a> {
    index: &'a CatalogIndex,
    patterns: &'a PatternTable,
    aliases: &'a AliasTable,
    manufacturers: Vec<String>,
    families: Vec<String>,
}

impl<'a> Matcher<'a> {
    pub fn new(index: &'a CatalogIndex, patterns: &'a PatternTable, aliases: &'a AliasTable) -> Self {
        Self {
            index,
            patterns,
            aliases,
            manufacturers: longest_first(index.manufacturers()),
            families: longest_first(index.families()),
        }
    }

    /// Product id the listing refers to, or `None` when it stays unmatched.
    pub fn match_listing(&self, listing: &Listing) -> Result<Option<&'a str>, MatchError> {
        let manufacturer = condition(&listing.manufacturer);
        let title = ConditionedTitle::new(&listing.title);

        let Some(scope) = self.resolve_scope(&manufacturer, &title.compact) else {
            debug!(title = %listing.title, "No manufacturer or family found");
            return Ok(None);
        };
        debug!(title = %listing.title, manufacturer = scope.manufacturer(), "Listing scoped");
        self.match_model(&scope, &title.upper)
    }

    /// Manufacturer from the listing's fields or an alias; a family found in
    /// the title narrows the scope and names the manufacturer on its own.
    pub fn resolve_scope(&self, manufacturer_c: &str, title_c: &str) -> Option<Scope> {
        if let Some(family) = self.families.iter().find(|f| title_c.contains(f.as_str())) {
            if let Some(owner) = self.index.manufacturer_of_family(family) {
                return Some(Scope::Family {
                    family: family.clone(),
                    manufacturer: owner.to_string(),
                });
            }
        }

        self.manufacturers
            .iter()
            .find(|m| manufacturer_c.contains(m.as_str()) || title_c.contains(m.as_str()))
            .map(String::as_str)
            .or_else(|| self.aliases.resolve(manufacturer_c, title_c))
            .map(|m| Scope::Manufacturer(m.to_string()))
    }

    fn scope_models(&self, scope: &Scope) -> Result<Option<&'a ModelMap>, MatchError> {
        match scope {
            Scope::Family { family, .. } => self
                .index
                .models_by_family(family)
                .map(Some)
                .ok_or_else(|| MatchError::Invariant(format!("family {family} has no model map"))),
            // An alias may name a manufacturer the catalog never mentions.
            Scope::Manufacturer(manufacturer) => Ok(self.index.models_by_manufacturer(manufacturer)),
        }
    }

    fn match_model(&self, scope: &Scope, title_upper: &str) -> Result<Option<&'a str>, MatchError> {
        let Some(models) = self.scope_models(scope)? else {
            return Ok(None);
        };

        let mut best: Option<&'a str> = None;
        for (model, product_id) in models {
            let entry = self
                .index
                .entry(product_id)
                .ok_or_else(|| MatchError::Invariant(format!("product {product_id} is scoped but not indexed")))?;
            let hit = self
                .patterns
                .matches(&entry.key, title_upper)
                .ok_or_else(|| MatchError::Invariant(format!("no pattern set for {}", entry.key)))?;
            if !hit {
                continue;
            }
            best = match best {
                None => Some(model.as_str()),
                Some(previous) => match resolve_ambiguity(previous, model) {
                    Some(winner) => Some(winner),
                    None => {
                        debug!(title = title_upper, first = previous, next = %model, "Ambiguous model match discarded");
                        return Ok(None);
                    }
                },
            };
        }

        Ok(best.and_then(|model| models.get(model)).map(String::as_str))
    }
}

/// Picks between two models that both matched the same title: the containing
/// model wins, then the one with letters left once digits are removed.
/// `None` means neither can be trusted.
pub fn resolve_ambiguity<'m>(first: &'m str, next: &'m str) -> Option<&'m str> {
    if first.contains(next) {
        return Some(first);
    }
    if next.contains(first) {
        return Some(next);
    }
    let first_alpha = !strip_digits(first).is_empty();
    let next_alpha = !strip_digits(next).is_empty();
    match (first_alpha, next_alpha) {
        (true, false) => Some(first),
        (false, true) => Some(next),
        _ => None,
    }
}
