// Generic model modifiers: prefix/suffix tokens shared by several models of one manufacturer
use crate::engine::index::CatalogIndex;
use crate::engine::patterns::PatternSet;
use crate::model::ConditionedKey;
use crate::normalizer::condition;
use crate::utils::{alpha_residue, has_non_digit};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

const MODEL_SEPARATORS: [char; 3] = ['-', '_', ' '];

/// Conditioned token -> models carrying it.
pub type TokenBuckets = BTreeMap<String, BTreeSet<ConditionedKey>>;

/// Tokens promoted to generic modifiers, across every manufacturer.
#[derive(Debug, Default)]
pub struct GenericModifiers {
    pub prefixes: BTreeMap<String, TokenBuckets>,
    pub suffixes: BTreeMap<String, TokenBuckets>,
}

impl GenericModifiers {
    /// Scans each manufacturer's models for shared prefixes and suffixes.
    #[tracing::instrument(name = "discover_modifiers", skip(index))]
    pub fn discover(index: &CatalogIndex) -> Self {
        let mut found = Self::default();
        for manufacturer in index.manufacturers() {
            let Some(models) = index.models_by_manufacturer(manufacturer) else {
                continue;
            };
            let mut prefixes = TokenBuckets::new();
            let mut suffixes = TokenBuckets::new();

            for product_id in models.values() {
                let Some(entry) = index.entry(product_id) else {
                    continue;
                };
                let tokens: Vec<&str> = entry
                    .raw_model
                    .split(MODEL_SEPARATORS)
                    .filter(|t| !t.is_empty())
                    .collect();

                match tokens.as_slice() {
                    [_] => bucket_unseparated(&entry.key, &mut prefixes, &mut suffixes),
                    [first, .., last] if tokens.len() <= 4 => {
                        add_to_bucket(&mut prefixes, &condition(first), &entry.key);
                        add_to_bucket(&mut suffixes, &condition(last), &entry.key);
                    }
                    _ => {}
                }
            }

            prefixes.retain(|token, keys| is_generic(token, keys));
            suffixes.retain(|token, keys| is_generic(token, keys));
            for token in prefixes.keys() {
                debug!(manufacturer = %manufacturer, token = %token, "Generic prefix modifier");
            }
            for token in suffixes.keys() {
                debug!(manufacturer = %manufacturer, token = %token, "Generic suffix modifier");
            }
            if !prefixes.is_empty() {
                found.prefixes.insert(manufacturer.clone(), prefixes);
            }
            if !suffixes.is_empty() {
                found.suffixes.insert(manufacturer.clone(), suffixes);
            }
        }
        found
    }

    /// Separator-tolerant patterns each generic modifier contributes, keyed
    /// by the model they recognize.
    pub fn patterns(&self) -> BTreeMap<ConditionedKey, PatternSet> {
        let mut out: BTreeMap<ConditionedKey, PatternSet> = BTreeMap::new();
        for buckets in self.prefixes.values() {
            for (token, keys) in buckets {
                for key in keys {
                    if let Some(rest) = key.model.strip_prefix(token.as_str()).filter(|r| !r.is_empty()) {
                        out.entry(key.clone()).or_default().add_split(token, rest);
                    }
                }
            }
        }
        for buckets in self.suffixes.values() {
            for (token, keys) in buckets {
                for key in keys {
                    if let Some(rest) = key.model.strip_suffix(token.as_str()).filter(|r| !r.is_empty()) {
                        out.entry(key.clone()).or_default().add_split(rest, token);
                    }
                }
            }
        }
        out
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty() && self.suffixes.is_empty()
    }
}

/// Unseparated models expose their alphabetic head or tail as a candidate.
fn bucket_unseparated(key: &ConditionedKey, prefixes: &mut TokenBuckets, suffixes: &mut TokenBuckets) {
    let alpha = alpha_residue(&key.model);
    let begins = key.model.starts_with(alpha.as_str());
    let ends = key.model.ends_with(alpha.as_str());
    if begins && !ends {
        add_to_bucket(prefixes, &alpha, key);
    }
    if ends && !begins {
        add_to_bucket(suffixes, &alpha, key);
    }
}

fn add_to_bucket(buckets: &mut TokenBuckets, token: &str, key: &ConditionedKey) {
    if token.is_empty() {
        return;
    }
    buckets.entry(token.to_string()).or_default().insert(key.clone());
}

/// Shared by two or more models and not purely numeric.
fn is_generic(token: &str, keys: &BTreeSet<ConditionedKey>) -> bool {
    keys.len() >= 2 && has_non_digit(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Product;

    fn discover(products: &[Product]) -> (CatalogIndex, GenericModifiers) {
        let index = CatalogIndex::build(products);
        let modifiers = GenericModifiers::discover(&index);
        (index, modifiers)
    }

    fn patterns_of(modifiers: &GenericModifiers, index: &CatalogIndex, product_id: &str) -> Vec<String> {
        let key = &index.entry(product_id).unwrap().key;
        modifiers
            .patterns()
            .get(key)
            .map(|set| set.iter().map(str::to_string).collect())
            .unwrap_or_default()
    }

    #[test]
    fn unseparated_alpha_prefix_shared_by_two_models() {
        let (index, modifiers) = discover(&[
            Product::new("p1", "Acme", "DSLR100", None),
            Product::new("p2", "Acme", "DSLR200", None),
        ]);
        assert!(modifiers.prefixes["ACME"].contains_key("DSLR"));
        assert_eq!(patterns_of(&modifiers, &index, "p1"), vec![r"\bDSLR-100\b", r"\bDSLR\s+100\b"]);
    }

    #[test]
    fn unseparated_alpha_suffix_shared_by_two_models() {
        let (index, modifiers) = discover(&[
            Product::new("p1", "Acme", "100D", None),
            Product::new("p2", "Acme", "200D", None),
        ]);
        assert!(modifiers.suffixes["ACME"].contains_key("D"));
        assert!(!modifiers.prefixes.contains_key("ACME"));
        assert_eq!(patterns_of(&modifiers, &index, "p1"), vec![r"\b100-D\b", r"\b100\s+D\b"]);
    }

    #[test]
    fn residue_at_both_ends_or_empty_is_not_a_candidate() {
        // All letters: the residue is the whole model.
        let (_, letters) = discover(&[
            Product::new("p1", "Acme", "ABC", None),
            Product::new("p2", "Acme", "ABD", None),
        ]);
        assert!(letters.is_empty());

        let (_, digits) = discover(&[
            Product::new("p1", "Acme", "100", None),
            Product::new("p2", "Acme", "200", None),
        ]);
        assert!(digits.is_empty());
    }

    #[test]
    fn single_model_token_is_not_generic() {
        let (_, modifiers) = discover(&[
            Product::new("p1", "Acme", "DSLR100", None),
            Product::new("p2", "Acme", "SLR200", None),
        ]);
        assert!(modifiers.is_empty());
    }

    #[test]
    fn separated_suffix_is_stripped_from_conditioned_model() {
        let (index, modifiers) = discover(&[
            Product::new("p1", "Panasonic", "FZ35 K", None),
            Product::new("p2", "Panasonic", "TZ7-K", None),
        ]);
        assert!(modifiers.suffixes["PANASONIC"].contains_key("K"));
        assert_eq!(patterns_of(&modifiers, &index, "p1"), vec![r"\bFZ35-K\b", r"\bFZ35\s+K\b"]);
        assert_eq!(patterns_of(&modifiers, &index, "p2"), vec![r"\bTZ7-K\b", r"\bTZ7\s+K\b"]);
    }

    #[test]
    fn separated_and_unseparated_models_share_buckets() {
        let (index, modifiers) = discover(&[
            Product::new("p1", "Olympus", "SP-565", None),
            Product::new("p2", "Olympus", "SP570", None),
        ]);
        assert_eq!(modifiers.prefixes["OLYMPUS"]["SP"].len(), 2);
        assert_eq!(patterns_of(&modifiers, &index, "p2"), vec![r"\bSP-570\b", r"\bSP\s+570\b"]);
    }

    #[test]
    fn numeric_tokens_are_ignored() {
        let (_, modifiers) = discover(&[
            Product::new("p1", "Acme", "100-A", None),
            Product::new("p2", "Acme", "100-B", None),
        ]);
        assert!(!modifiers.prefixes.get("ACME").is_some_and(|b| b.contains_key("100")));
    }

    #[test]
    fn long_splits_are_skipped() {
        let (_, modifiers) = discover(&[
            Product::new("p1", "Acme", "X 1 2 3 4", None),
            Product::new("p2", "Acme", "X 5 6 7 8", None),
        ]);
        assert!(modifiers.is_empty());
    }

    #[test]
    fn manufacturers_do_not_mix() {
        let (_, modifiers) = discover(&[
            Product::new("p1", "Acme", "DSLR100", None),
            Product::new("p2", "Other", "DSLR200", None),
        ]);
        assert!(modifiers.is_empty());
    }
}
