use super::*;
use crate::logic::error::ScorerError;
use serde_json::json;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_load_json_strips_surrogate_ids() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("training.json");
    fs::write(
        &path,
        r#"[
            {"_id": "65f0", "Vibration": 0.8, "Temperature": 30.0, "Speed": 1.5, "PowerConsumption": 2.0},
            {"id": 7, "Vibration": "1.1", "Temperature": 31.0, "Speed": 1.5, "PowerConsumption": 2.2}
        ]"#,
    )
    .unwrap();

    let dataset = load_json(&path).unwrap();

    assert_eq!(dataset.len(), 2);
    assert!(!dataset.has_column("_id"));
    assert!(!dataset.has_column("id"));
    assert!(dataset.has_column("Vibration"));
}

#[test]
fn test_missing_file_is_unavailable() {
    let dir = tempdir().unwrap();
    let result = load_json(&dir.path().join("nope.json"));
    assert!(matches!(result, Err(ScorerError::DataUnavailable(_))));
}

#[test]
fn test_empty_array_is_unavailable() {
    assert!(matches!(parse_json(b"[]"), Err(ScorerError::DataUnavailable(_))));
}

#[test]
fn test_non_array_is_unavailable() {
    let result = parse_json(br#"{"Vibration": 1.0}"#);
    match result {
        Err(ScorerError::DataUnavailable(msg)) => assert!(msg.contains("an object")),
        other => panic!("Expected DataUnavailable, got {:?}", other),
    }
}

#[test]
fn test_malformed_rows_do_not_fail_load() {
    let dataset = parse_json(br#"[42, "junk", {"Speed": "fast"}]"#).unwrap();
    assert_eq!(dataset.len(), 3);
    assert!(dataset.has_column("Speed"));
}

#[test]
fn test_coerce_numeric() {
    assert_eq!(coerce_numeric(&json!(1.5)), Some(1.5));
    assert_eq!(coerce_numeric(&json!(3)), Some(3.0));
    assert_eq!(coerce_numeric(&json!(" 2.25 ")), Some(2.25));
    assert_eq!(coerce_numeric(&json!("n/a")), None);
    assert_eq!(coerce_numeric(&json!("inf")), None);
    assert_eq!(coerce_numeric(&json!(null)), None);
    assert_eq!(coerce_numeric(&json!(true)), None);
    assert_eq!(coerce_numeric(&json!([1.0])), None);
}

#[test]
fn test_reading_from_record_keeps_numeric_fields() {
    let record = json!({"Vibration": 0.8, "Speed": "1.5", "Note": "ok"});
    let reading = Reading::from_record(record.as_object().unwrap());

    assert_eq!(reading.len(), 2);
    assert_eq!(reading.get("Vibration"), Some(0.8));
    assert_eq!(reading.get("Speed"), Some(1.5));
    assert_eq!(reading.get("Note"), None);
}

#[test]
fn test_schema_required_columns() {
    let schema = FeatureSchema::default();
    let cols: Vec<&str> = schema.required_columns().collect();
    assert_eq!(cols, vec!["Vibration", "Temperature", "Speed", "PowerConsumption"]);
}
