//! Scorer error taxonomy
//!
//! Every failure of the scoring workflow surfaces as one of these. Nothing
//! is retried inside the workflow; callers decide.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScorerError {
    /// Source missing, unreadable, not a record array, or empty
    #[error("data unavailable: {0}")]
    DataUnavailable(String),

    /// A required column is absent from the dataset or the reading
    #[error("missing required column: {column}")]
    SchemaError { column: String },

    /// Nothing left to train or evaluate on
    #[error("insufficient data: {0}")]
    InsufficientData(String),

    #[error("artifact not found: {}", path.display())]
    ArtifactMissing { path: PathBuf },

    #[error("artifact corrupt ({}): {reason}", path.display())]
    ArtifactCorrupt { path: PathBuf, reason: String },

    #[error("failed to write artifact {}: {source}", path.display())]
    ArtifactWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Model and transform disagree on feature names or order
    #[error("feature mismatch: {0}")]
    FeatureMismatch(String),

    #[error("model not ready: train or load artifacts before scoring")]
    ModelNotReady,

    #[error("cannot {operation} while scorer is {stage}")]
    StageViolation {
        operation: &'static str,
        stage: &'static str,
    },
}

impl ScorerError {
    pub fn missing_column(column: impl Into<String>) -> Self {
        ScorerError::SchemaError { column: column.into() }
    }
}

pub type ScorerResult<T> = Result<T, ScorerError>;
