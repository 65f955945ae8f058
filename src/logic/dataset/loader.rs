use std::fs;
use std::path::Path;
use serde_json::Value;

use crate::logic::error::{ScorerError, ScorerResult};
use super::Dataset;

/// Load a JSON array of flat records from disk
pub fn load_json(path: &Path) -> ScorerResult<Dataset> {
    if !path.exists() {
        return Err(ScorerError::DataUnavailable(format!(
            "training data not found: {}",
            path.display()
        )));
    }

    let bytes = fs::read(path).map_err(|e| {
        ScorerError::DataUnavailable(format!("cannot read {}: {}", path.display(), e))
    })?;

    let dataset = parse_json(&bytes)?;
    tracing::info!("Loaded {} records from {}", dataset.len(), path.display());
    Ok(dataset)
}

/// Parse a JSON array of records. An empty array is unavailable data.
pub fn parse_json(bytes: &[u8]) -> ScorerResult<Dataset> {
    let value: Value = serde_json::from_slice(bytes)
        .map_err(|e| ScorerError::DataUnavailable(format!("invalid JSON: {}", e)))?;

    let documents = match value {
        Value::Array(items) => items,
        other => {
            return Err(ScorerError::DataUnavailable(format!(
                "expected an array of records, got {}",
                json_kind(&other)
            )))
        }
    };

    if documents.is_empty() {
        return Err(ScorerError::DataUnavailable("source contains no records".to_string()));
    }

    Ok(Dataset::from_documents(documents))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
