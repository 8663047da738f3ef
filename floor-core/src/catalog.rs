use std::collections::BTreeMap;

use crate::models::{Product, State};

/// Immutable product and tax-rate lookup tables.
///
/// Built once at startup (see the `floor-data` loaders) and then only read.
/// Keys are matched exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceCatalog {
    products: BTreeMap<String, Product>,
    states: BTreeMap<String, State>,
}

impl ReferenceCatalog {
    /// Later entries replace earlier ones with the same key; loaders reject
    /// duplicates before getting here.
    pub fn new(
        products: impl IntoIterator<Item = Product>,
        states: impl IntoIterator<Item = State>,
    ) -> Self {
        Self {
            products: products
                .into_iter()
                .map(|p| (p.product_type.clone(), p))
                .collect(),
            states: states
                .into_iter()
                .map(|s| (s.abbreviation.clone(), s))
                .collect(),
        }
    }

    pub fn product(
        &self,
        product_type: &str,
    ) -> Option<&Product> {
        self.products.get(product_type)
    }

    pub fn state(
        &self,
        abbreviation: &str,
    ) -> Option<&State> {
        self.states.get(abbreviation)
    }

    /// Products sorted by product type.
    pub fn products(&self) -> Vec<&Product> {
        self.products.values().collect()
    }

    pub fn states(&self) -> Vec<&State> {
        self.states.values().collect()
    }

    /// State abbreviations, sorted.
    pub fn state_codes(&self) -> Vec<&str> {
        self.states.keys().map(String::as_str).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty() && self.states.is_empty()
    }
}
