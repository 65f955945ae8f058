//! Artifact persistence - model + scaling transform, always as a pair
//!
//! Two JSON files. The model file records the SHA-256 of the transform file
//! it was saved with, so a transform from another training run is caught on
//! load instead of silently skewing predictions.

use std::fs;
use std::path::{Path, PathBuf};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::logic::error::{ScorerError, ScorerResult};
use super::metrics::EvaluationMetrics;
use super::regression::LinearModel;
use super::scaler::ScalingTransform;
use super::ArtifactPair;

pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

/// Where the pair lives on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub transform: PathBuf,
}

impl ArtifactPaths {
    pub fn new(model: impl Into<PathBuf>, transform: impl Into<PathBuf>) -> Self {
        Self {
            model: model.into(),
            transform: transform.into(),
        }
    }

    /// `model.json` and `scaler.json` inside `dir`
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join("model.json"), dir.join("scaler.json"))
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct TransformFile {
    format_version: u32,
    transform: ScalingTransform,
}

#[derive(Debug, Serialize, Deserialize)]
struct ModelFile {
    format_version: u32,
    model_id: Uuid,
    model: LinearModel,
    metrics: Option<EvaluationMetrics>,
    transform_sha256: String,
    saved_at: DateTime<Utc>,
}

/// A pair read back from disk
#[derive(Debug, Clone)]
pub struct StoredArtifacts {
    pub model_id: Uuid,
    pub pair: ArtifactPair,
    pub metrics: Option<EvaluationMetrics>,
    pub saved_at: DateTime<Utc>,
}

/// Persist the pair. Transform goes first so a model file never points at
/// a transform that was not written.
pub fn save_artifacts(
    pair: &ArtifactPair,
    model_id: Uuid,
    metrics: Option<EvaluationMetrics>,
    paths: &ArtifactPaths,
) -> ScorerResult<()> {
    let transform_json = serde_json::to_vec_pretty(&TransformFile {
        format_version: ARTIFACT_FORMAT_VERSION,
        transform: pair.transform().clone(),
    })
    .map_err(|e| write_error(&paths.transform, e.into()))?;

    let model_json = serde_json::to_vec_pretty(&ModelFile {
        format_version: ARTIFACT_FORMAT_VERSION,
        model_id,
        model: pair.model().clone(),
        metrics,
        transform_sha256: checksum(&transform_json),
        saved_at: Utc::now(),
    })
    .map_err(|e| write_error(&paths.model, e.into()))?;

    write_atomic(&paths.transform, &transform_json)?;
    write_atomic(&paths.model, &model_json)?;

    tracing::info!(
        "Saved model {} to {} (scaler: {})",
        model_id,
        paths.model.display(),
        paths.transform.display()
    );
    Ok(())
}

/// Load and verify the pair
pub fn load_artifacts(paths: &ArtifactPaths) -> ScorerResult<StoredArtifacts> {
    for path in [&paths.model, &paths.transform] {
        if !path.exists() {
            return Err(ScorerError::ArtifactMissing { path: path.clone() });
        }
    }

    let transform_bytes = read_artifact(&paths.transform)?;
    let model_bytes = read_artifact(&paths.model)?;

    let transform_file: TransformFile = serde_json::from_slice(&transform_bytes)
        .map_err(|e| corrupt(&paths.transform, e.to_string()))?;
    let model_file: ModelFile = serde_json::from_slice(&model_bytes)
        .map_err(|e| corrupt(&paths.model, e.to_string()))?;

    for (path, version) in [
        (&paths.transform, transform_file.format_version),
        (&paths.model, model_file.format_version),
    ] {
        if version != ARTIFACT_FORMAT_VERSION {
            return Err(corrupt(
                path,
                format!("unsupported format version {} (expected {})", version, ARTIFACT_FORMAT_VERSION),
            ));
        }
    }

    let actual = checksum(&transform_bytes);
    if actual != model_file.transform_sha256 {
        return Err(corrupt(
            &paths.transform,
            format!(
                "checksum {} does not match the one recorded with the model ({})",
                actual, model_file.transform_sha256
            ),
        ));
    }

    let pair = ArtifactPair::new(model_file.model, transform_file.transform)
        .map_err(|e| corrupt(&paths.model, e.to_string()))?;

    tracing::info!("Loaded model {} from {}", model_file.model_id, paths.model.display());

    Ok(StoredArtifacts {
        model_id: model_file.model_id,
        pair,
        metrics: model_file.metrics,
        saved_at: model_file.saved_at,
    })
}

fn checksum(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

fn read_artifact(path: &Path) -> ScorerResult<Vec<u8>> {
    fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ScorerError::ArtifactMissing { path: path.to_path_buf() },
        _ => corrupt(path, e.to_string()),
    })
}

/// Write to a uniquely named sibling temp file, then rename over the target
fn write_atomic(path: &Path, bytes: &[u8]) -> ScorerResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| write_error(path, e))?;
    }

    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(format!(".{}.tmp", Uuid::new_v4().simple()));
    let tmp = path.with_file_name(tmp_name);

    if let Err(e) = fs::write(&tmp, bytes) {
        let _ = fs::remove_file(&tmp);
        return Err(write_error(&tmp, e));
    }
    fs::rename(&tmp, path).map_err(|e| {
        let _ = fs::remove_file(&tmp);
        write_error(path, e)
    })
}

fn corrupt(path: &Path, reason: String) -> ScorerError {
    ScorerError::ArtifactCorrupt {
        path: path.to_path_buf(),
        reason,
    }
}

fn write_error(path: &Path, source: std::io::Error) -> ScorerError {
    ScorerError::ArtifactWrite {
        path: path.to_path_buf(),
        source,
    }
}
