//! Seams to the host data store.
//!
//! The synthesizer only needs two questions answered by a reference source:
//! "what is the configured choice list for field Y" and "what values does
//! attribute X currently hold across the live records". Both may change
//! between calls, so nothing here is cached.

use ahash::AHashMap;
use serde_json::Value;

/// A live source of reference data, typically one table of the host store.
pub trait ReferenceSource: Send + Sync {
    /// The configured choice list of a categorical field, in configured order.
    /// Returns `None` when the field does not exist or is not categorical.
    fn choice_list(&self, field: &str) -> Option<Vec<String>>;

    /// The raw cell values of `attribute` across the current records.
    /// Returns `None` when the attribute is not a known field of the source.
    fn distinct_values(&self, attribute: &str) -> Option<Vec<Value>>;
}

/// Named reference sources available to schema synthesis.
#[derive(Default)]
pub struct ReferenceCatalog<'a> {
    sources: AHashMap<String, &'a dyn ReferenceSource>,
}

impl<'a> ReferenceCatalog<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, name: &str, source: &'a dyn ReferenceSource) -> Self {
        self.sources.insert(name.to_string(), source);
        self
    }

    pub fn insert(&mut self, name: &str, source: &'a dyn ReferenceSource) {
        self.sources.insert(name.to_string(), source);
    }

    pub fn get(&self, name: &str) -> Option<&'a dyn ReferenceSource> {
        self.sources.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

/// Supplies the record ids the operator currently has selected.
pub trait SelectionSource {
    fn selected_record_ids(&self) -> Vec<String>;
}

impl SelectionSource for Vec<String> {
    fn selected_record_ids(&self) -> Vec<String> {
        self.clone()
    }
}

impl SelectionSource for [String] {
    fn selected_record_ids(&self) -> Vec<String> {
        self.to_vec()
    }
}

impl SelectionSource for [&str] {
    fn selected_record_ids(&self) -> Vec<String> {
        self.iter().map(|s| s.to_string()).collect()
    }
}
