//! Scoring request / response shapes

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;
use validator::Validate;

use crate::logic::dataset::{coerce_numeric, Reading, DEFAULT_TARGET};
use crate::logic::EvaluationMetrics;

pub const MAX_BATCH_SIZE: u64 = 10_000;

/// API field names and the record columns they stand for
const FIELD_ALIASES: [(&str, &str); 4] = [
    ("vibration", "Vibration"),
    ("temperature", "Temperature"),
    ("speed", "Speed"),
    ("actual_power", DEFAULT_TARGET),
];

/// Single reading as posted to `/predict`
#[derive(Debug, Clone, Deserialize)]
pub struct SensorReading {
    pub vibration: f64,
    pub temperature: f64,
    pub speed: f64,
    #[serde(default)]
    pub actual_power: Option<f64>,
}

impl SensorReading {
    pub fn to_reading(&self) -> Reading {
        let reading = Reading::new()
            .with("Vibration", self.vibration)
            .with("Temperature", self.temperature)
            .with("Speed", self.speed);

        match self.actual_power {
            Some(actual) => reading.with(DEFAULT_TARGET, actual),
            None => reading,
        }
    }
}

/// Batch body for `/predict/batch`.
///
/// Readings are free-form objects; either the API names (`vibration`, ...)
/// or the record names (`Vibration`, ..., `PowerConsumption`) are accepted.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BatchReadings {
    #[validate(length(max = MAX_BATCH_SIZE))]
    pub readings: Vec<Map<String, Value>>,
}

impl BatchReadings {
    pub fn to_readings(&self) -> Vec<Reading> {
        self.readings.iter().map(reading_from_payload).collect()
    }
}

/// Map API field names onto record columns, keep everything numeric
pub fn reading_from_payload(payload: &Map<String, Value>) -> Reading {
    let mut reading = Reading::new();
    for (key, value) in payload {
        let Some(number) = coerce_numeric(value) else {
            continue;
        };
        let column = FIELD_ALIASES
            .iter()
            .find(|(api, _)| *api == key.as_str())
            .map(|(_, column)| *column)
            .unwrap_or(key.as_str());
        reading.set(column, number);
    }
    reading
}

#[derive(Debug, Serialize)]
pub struct MetricsResponse {
    pub mse: f64,
    pub r2: f64,
}

impl From<EvaluationMetrics> for MetricsResponse {
    fn from(m: EvaluationMetrics) -> Self {
        Self { mse: m.mse, r2: m.r2 }
    }
}

#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub record_count: i64,
}

#[derive(Debug, Serialize)]
pub struct ModelActionResponse {
    pub success: bool,
    pub message: String,
    pub model_id: Uuid,
    pub metrics: Option<EvaluationMetrics>,
}
