use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Predictor columns of the conveyor belt health metrics
pub const DEFAULT_FEATURES: [&str; 3] = ["Vibration", "Temperature", "Speed"];

/// Target column (kW)
pub const DEFAULT_TARGET: &str = "PowerConsumption";

/// Storage surrogate ids, discarded on ingestion
pub const SURROGATE_ID_FIELDS: [&str; 2] = ["_id", "id"];

/// Which columns feed the model, in training order, and which one it predicts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSchema {
    pub features: Vec<String>,
    pub target: String,
}

impl FeatureSchema {
    pub fn new<I, S>(features: I, target: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            features: features.into_iter().map(Into::into).collect(),
            target: target.into(),
        }
    }

    pub fn conveyor_belt() -> Self {
        Self::new(DEFAULT_FEATURES, DEFAULT_TARGET)
    }

    /// Features followed by the target
    pub fn required_columns(&self) -> impl Iterator<Item = &str> {
        self.features
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(self.target.as_str()))
    }
}

impl Default for FeatureSchema {
    fn default() -> Self {
        Self::conveyor_belt()
    }
}

/// Coerce a raw JSON value to a number.
///
/// Numbers pass through, strings are parsed after trimming. Everything
/// else (null, bool, containers, junk, non-finite) is missing.
pub fn coerce_numeric(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;

    number.is_finite().then_some(number)
}

/// A single reading keyed by column name.
///
/// Lookups are by name only, so the order in which a caller supplies the
/// fields never matters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reading {
    values: BTreeMap<String, f64>,
}

impl Reading {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: f64) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: f64) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Build from a flat record, keeping only fields that coerce to numbers
    pub fn from_record(record: &Map<String, Value>) -> Self {
        let values = record
            .iter()
            .filter_map(|(k, v)| coerce_numeric(v).map(|n| (k.clone(), n)))
            .collect();
        Self { values }
    }
}
