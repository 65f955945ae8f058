//! Scoring logic, independent of the HTTP layer

pub mod error;
pub mod dataset;
pub mod model;
pub mod scorer;
pub mod handle;

pub use error::{ScorerError, ScorerResult};
pub use dataset::{Dataset, FeatureSchema, Reading};
pub use model::{ArtifactPair, ArtifactPaths, EvaluationMetrics};
pub use scorer::{AnomalyScorer, BatchScoringResult, ScorerStage, ScoringResult};
pub use handle::{LoadedModel, ModelHandle, ModelInfo, ModelOrigin};
