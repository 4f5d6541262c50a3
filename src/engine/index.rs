// Catalog indices: model lookups by manufacturer and family, plus seed patterns
use crate::engine::patterns::PatternSet;
use crate::model::{ConditionedKey, Product};
use crate::normalizer::{condition, condition_opt};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, error, warn};

/// model_c -> product_id
pub type ModelMap = BTreeMap<String, String>;

/// What the index remembers about one accepted product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub key: ConditionedKey,
    /// Model exactly as the catalog spells it.
    pub raw_model: String,
}

/// Immutable lookup structures built in one pass over the catalog.
#[derive(Debug, Default)]
pub struct CatalogIndex {
    entries: HashMap<String, CatalogEntry>,
    models_by_manufacturer: BTreeMap<String, ModelMap>,
    models_by_family: BTreeMap<String, ModelMap>,
    manufacturer_by_family: BTreeMap<String, String>,
    patterns: BTreeMap<ConditionedKey, PatternSet>,
    invalid: usize,
}

impl CatalogIndex {
    /// Indexes `products` in order. Inconsistent products are logged, counted
    /// in [`CatalogIndex::invalid`] and left out; building never fails.
    #[tracing::instrument(name = "build_catalog_index", skip(products), fields(products = products.len()))]
    pub fn build(products: &[Product]) -> Self {
        let mut index = Self::default();
        let mut duplicates: Vec<&Product> = Vec::new();

        for product in products {
            let manufacturer = condition(&product.manufacturer);
            let model = condition(&product.model);
            let family = condition_opt(product.family.as_deref()).filter(|f| !f.is_empty());

            if manufacturer.is_empty() || model.is_empty() {
                warn!(product = %product.product_id, "Manufacturer or model conditions to nothing, ignoring product");
                index.invalid += 1;
                continue;
            }

            let key = ConditionedKey::new(&manufacturer, family.as_deref(), &model);
            if index.patterns.contains_key(&key) {
                warn!(product = %product.product_id, key = %key, "Duplicate conditioned key, ignoring product");
                index.invalid += 1;
                continue;
            }

            let mut seed = PatternSet::default();
            seed.add_word(&product.model.to_uppercase());
            seed.add_word(&model);
            index.patterns.insert(key.clone(), seed);
            index.entries.insert(
                product.product_id.clone(),
                CatalogEntry {
                    key,
                    raw_model: product.model.clone(),
                },
            );

            let models = index.models_by_manufacturer.entry(manufacturer.clone()).or_default();
            if let Some(existing) = models.get(&model) {
                warn!(
                    product = %product.product_id,
                    existing = %existing,
                    model = %model,
                    "Model already listed for this manufacturer, it needs a family to stay matchable"
                );
                duplicates.push(product);
            } else {
                models.insert(model.clone(), product.product_id.clone());
            }

            if let Some(family) = family {
                index.add_to_family(&family, &manufacturer, &model, &product.product_id);
            }
        }

        for product in duplicates {
            index.reconcile_duplicate(product);
        }

        debug!(
            accepted = index.entries.len(),
            invalid = index.invalid,
            manufacturers = index.models_by_manufacturer.len(),
            families = index.models_by_family.len(),
            "Catalog indexed"
        );
        index
    }

    fn add_to_family(&mut self, family: &str, manufacturer: &str, model: &str, product_id: &str) {
        self.models_by_family
            .entry(family.to_string())
            .or_default()
            .insert(model.to_string(), product_id.to_string());
        let owner = self
            .manufacturer_by_family
            .entry(family.to_string())
            .or_insert_with(|| manufacturer.to_string());
        if owner.as_str() != manufacturer {
            warn!(family, owner = %owner, other = manufacturer, "Family shared by two manufacturers, keeping the first");
        }
    }

    /// A second product with an already-indexed (manufacturer, model) pair is
    /// only reachable through its family.
    fn reconcile_duplicate(&mut self, product: &Product) {
        let Some(entry) = self.entries.get(&product.product_id).cloned() else {
            return;
        };
        if entry.key.family.is_empty() {
            error!(product = %product.product_id, key = %entry.key, "Duplicate model key unreconcilable, ignoring product");
            self.entries.remove(&product.product_id);
            self.patterns.remove(&entry.key);
            self.invalid += 1;
            return;
        }
        self.add_to_family(
            &entry.key.family,
            &entry.key.manufacturer,
            &entry.key.model,
            &product.product_id,
        );
    }

    pub fn entry(&self, product_id: &str) -> Option<&CatalogEntry> {
        self.entries.get(product_id)
    }

    pub fn manufacturers(&self) -> impl Iterator<Item = &String> {
        self.models_by_manufacturer.keys()
    }

    pub fn families(&self) -> impl Iterator<Item = &String> {
        self.models_by_family.keys()
    }

    pub fn models_by_manufacturer(&self, manufacturer: &str) -> Option<&ModelMap> {
        self.models_by_manufacturer.get(manufacturer)
    }

    pub fn models_by_family(&self, family: &str) -> Option<&ModelMap> {
        self.models_by_family.get(family)
    }

    pub fn manufacturer_of_family(&self, family: &str) -> Option<&str> {
        self.manufacturer_by_family.get(family).map(String::as_str)
    }

    /// Seed pattern sets, one per accepted product.
    pub fn patterns(&self) -> &BTreeMap<ConditionedKey, PatternSet> {
        &self.patterns
    }

    /// Products dropped while indexing.
    pub fn invalid(&self) -> usize {
        self.invalid
    }

    /// Products that made it into the index.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
