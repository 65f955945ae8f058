//! Dataset Module - raw health metric records
//!
//! Records stay as flat JSON objects until preprocessing. A malformed row
//! never fails a load; it is coerced and dropped later by the scorer.
//! File and database ingestion both end up here.

pub mod record;
pub mod loader;

#[cfg(test)]
mod tests;

use std::collections::BTreeSet;
use serde_json::{Map, Value};

pub use record::{
    coerce_numeric, FeatureSchema, Reading, DEFAULT_FEATURES, DEFAULT_TARGET,
    SURROGATE_ID_FIELDS,
};
pub use loader::{load_json, parse_json};

/// Ordered collection of flat records
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<Map<String, Value>>,
}

impl Dataset {
    /// Build from records, stripping storage surrogate ids
    pub fn from_records(records: Vec<Map<String, Value>>) -> Self {
        let records = records
            .into_iter()
            .map(|mut record| {
                for field in SURROGATE_ID_FIELDS {
                    record.remove(field);
                }
                record
            })
            .collect();
        Self { records }
    }

    /// Build from arbitrary JSON documents.
    ///
    /// Non-object entries become empty records so they are dropped during
    /// cleaning like any other malformed row.
    pub fn from_documents(documents: Vec<Value>) -> Self {
        let records = documents
            .into_iter()
            .map(|doc| match doc {
                Value::Object(map) => map,
                _ => Map::new(),
            })
            .collect();
        Self::from_records(records)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Map<String, Value>] {
        &self.records
    }

    /// Union of keys across all records
    pub fn columns(&self) -> BTreeSet<&str> {
        self.records
            .iter()
            .flat_map(|r| r.keys().map(String::as_str))
            .collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.records.iter().any(|r| r.contains_key(name))
    }
}
