//! Configuration module

use std::env;
use std::path::PathBuf;
use serde_json::Value;

use crate::logic::model::ArtifactPaths;

/// Where startup and `/model/train` read training records from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainingSource {
    File,
    Database,
}

impl TrainingSource {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "file" | "json" => Some(Self::File),
            "database" | "db" | "postgres" => Some(Self::Database),
            _ => None,
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Postgres connection URL; record count and database training need it
    pub database_url: Option<String>,

    /// Table holding health metric documents
    pub collection_name: String,

    pub training_source: TrainingSource,

    /// JSONB containment filter for database training (`TRAINING_QUERY`)
    pub training_filter: Option<Value>,

    /// JSON array of records used for training
    pub training_data_path: PathBuf,

    pub model_path: PathBuf,
    pub scaler_path: PathBuf,

    /// Environment (development, production)
    pub environment: String,
}

const DEFAULT_COLLECTION: &str = "health_metrics";

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),

            database_url: env::var("DATABASE_URL")
                .ok()
                .filter(|url| !url.trim().is_empty()),

            collection_name: env::var("COLLECTION_NAME")
                .ok()
                .filter(|name| is_valid_identifier(name))
                .unwrap_or_else(|| DEFAULT_COLLECTION.to_string()),

            training_source: env::var("TRAINING_SOURCE")
                .ok()
                .and_then(|s| TrainingSource::parse(&s))
                .unwrap_or(TrainingSource::File),

            training_filter: env::var("TRAINING_QUERY")
                .ok()
                .and_then(|q| parse_training_filter(&q)),

            training_data_path: env::var("TRAINING_DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data/training_data.json")),

            model_path: env::var("MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("models/model.json")),

            scaler_path: env::var("SCALER_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("models/scaler.json")),

            environment: env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
        }
    }

    pub fn artifact_paths(&self) -> ArtifactPaths {
        ArtifactPaths::new(&self.model_path, &self.scaler_path)
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Settings present in the environment but ignored by `from_env`.
///
/// Called once logging is up, since `from_env` runs before it.
pub fn rejected_settings() -> Vec<String> {
    let mut rejected = Vec::new();

    if let Ok(name) = env::var("COLLECTION_NAME") {
        if !is_valid_identifier(&name) {
            rejected.push(format!("invalid COLLECTION_NAME '{}', using '{}'", name, DEFAULT_COLLECTION));
        }
    }
    if let Ok(source) = env::var("TRAINING_SOURCE") {
        if TrainingSource::parse(&source).is_none() {
            rejected.push(format!("unknown TRAINING_SOURCE '{}', using file", source));
        }
    }
    if let Ok(query) = env::var("TRAINING_QUERY") {
        if !query.trim().is_empty() && parse_training_filter(&query).is_none() {
            rejected.push(format!("TRAINING_QUERY is not a JSON object: {}", query));
        }
    }
    rejected
}

/// `TRAINING_QUERY` must be a JSON object; anything else means no filter
fn parse_training_filter(query: &str) -> Option<Value> {
    serde_json::from_str::<Value>(query)
        .ok()
        .filter(Value::is_object)
}

/// Collection names end up in SQL, so only plain identifiers are allowed
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    name.len() <= 63 && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
