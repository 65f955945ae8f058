use super::*;
use crate::logic::dataset::Reading;
use ndarray::{array, Array1, Array2};
use std::fs;
use tempfile::tempdir;
use uuid::Uuid;

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn fitted_pair() -> ArtifactPair {
    let features = names(&["Vibration", "Temperature", "Speed"]);
    let x = array![
        [0.6, 28.0, 1.0],
        [0.8, 30.0, 1.5],
        [1.0, 33.0, 1.2],
        [1.2, 35.0, 2.0],
        [0.7, 31.0, 1.8],
        [0.9, 29.0, 1.1],
    ];
    let y: Array1<f64> = x
        .rows()
        .into_iter()
        .map(|r| 0.18 + 0.4 * r[0] + 0.04 * r[1] + 0.2 * r[2])
        .collect();

    let transform = ScalingTransform::fit(&x, &features).unwrap();
    let scaled = transform.transform_matrix(&x).unwrap();
    let model = LinearModel::fit(&scaled, &y, &features, "PowerConsumption").unwrap();
    ArtifactPair::new(model, transform).unwrap()
}

#[test]
fn test_scaler_zero_mean_unit_variance() {
    let x = array![[1.0, 10.0], [2.0, 20.0], [3.0, 30.0], [4.0, 40.0]];
    let transform = ScalingTransform::fit(&x, &names(&["a", "b"])).unwrap();
    let scaled = transform.transform_matrix(&x).unwrap();

    for column in scaled.columns() {
        let mean = column.sum() / column.len() as f64;
        let var = column.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / column.len() as f64;
        assert!(mean.abs() < 1e-12);
        assert!((var - 1.0).abs() < 1e-12);
    }
}

#[test]
fn test_scaler_constant_column_keeps_unit_scale() {
    let x = array![[5.0, 1.0], [5.0, 2.0]];
    let transform = ScalingTransform::fit(&x, &names(&["flat", "b"])).unwrap();

    assert_eq!(transform.features()[0].scale, 1.0);
    assert_eq!(transform.features()[0].mean, 5.0);
}

#[test]
fn test_scaler_constant_column_with_rounding_noise() {
    // 1.2 is not exact in binary, so the summed mean drifts off 1.2
    let x = Array2::from_shape_fn((200, 2), |(i, j)| if j == 0 { i as f64 * 0.01 } else { 1.2 });
    let transform = ScalingTransform::fit(&x, &names(&["Vibration", "Speed"])).unwrap();

    assert_eq!(transform.features()[1].scale, 1.0);
    assert!((transform.features()[1].mean - 1.2).abs() < 1e-12);
    assert!(transform.features()[0].scale > 0.5);
}

#[test]
fn test_transform_reading_binds_by_name() {
    let transform = ScalingTransform::from_features(vec![
        FeatureScale { name: "a".into(), mean: 1.0, scale: 2.0 },
        FeatureScale { name: "b".into(), mean: 10.0, scale: 5.0 },
    ]);

    // Supplied in reverse order on purpose
    let reading = Reading::new().with("b", 20.0).with("a", 3.0);
    let scaled = transform.transform_reading(&reading).unwrap();

    assert_eq!(scaled.to_vec(), vec![1.0, 2.0]);
}

#[test]
fn test_transform_reading_names_missing_feature() {
    let transform = ScalingTransform::from_features(vec![FeatureScale {
        name: "Speed".into(),
        mean: 0.0,
        scale: 1.0,
    }]);

    match transform.transform_reading(&Reading::new().with("Vibration", 1.0)) {
        Err(ScorerError::SchemaError { column }) => assert_eq!(column, "Speed"),
        other => panic!("Expected SchemaError, got {:?}", other),
    }
}

#[test]
fn test_pair_rejects_reordered_features() {
    let pair = fitted_pair();
    let mut shuffled = pair.transform().features().to_vec();
    shuffled.swap(0, 2);

    let result = ArtifactPair::new(pair.model().clone(), ScalingTransform::from_features(shuffled));
    assert!(matches!(result, Err(ScorerError::FeatureMismatch(_))));
}

#[test]
fn test_pair_predicts_training_relationship() {
    let pair = fitted_pair();
    let reading = Reading::new()
        .with("Vibration", 0.8)
        .with("Temperature", 30.0)
        .with("Speed", 1.5);

    assert!((pair.predict(&reading).unwrap() - 2.0).abs() < 1e-9);
}

#[test]
fn test_save_load_cycle_reproduces_predictions() {
    let dir = tempdir().unwrap();
    let paths = ArtifactPaths::in_dir(&dir.path().join("models"));
    let pair = fitted_pair();
    let id = Uuid::new_v4();
    let metrics = EvaluationMetrics { mse: 0.01, r2: 0.97, train_rows: 5, test_rows: 1 };

    save_artifacts(&pair, id, Some(metrics), &paths).unwrap();
    let stored = load_artifacts(&paths).unwrap();

    assert_eq!(stored.model_id, id);
    assert_eq!(stored.metrics, Some(metrics));
    assert_eq!(stored.pair, pair);

    let reading = Reading::new()
        .with("Vibration", 1.2)
        .with("Temperature", 35.5)
        .with("Speed", 1.5);
    assert_eq!(pair.predict(&reading).unwrap(), stored.pair.predict(&reading).unwrap());
}

#[test]
fn test_load_reports_missing_file() {
    let dir = tempdir().unwrap();
    let paths = ArtifactPaths::in_dir(dir.path());
    save_artifacts(&fitted_pair(), Uuid::new_v4(), None, &paths).unwrap();
    fs::remove_file(&paths.transform).unwrap();

    match load_artifacts(&paths) {
        Err(ScorerError::ArtifactMissing { path }) => assert_eq!(path, paths.transform),
        other => panic!("Expected ArtifactMissing, got {:?}", other),
    }
}

#[test]
fn test_load_rejects_garbage() {
    let dir = tempdir().unwrap();
    let paths = ArtifactPaths::in_dir(dir.path());
    save_artifacts(&fitted_pair(), Uuid::new_v4(), None, &paths).unwrap();
    fs::write(&paths.model, b"not json").unwrap();

    assert!(matches!(
        load_artifacts(&paths),
        Err(ScorerError::ArtifactCorrupt { .. })
    ));
}

#[test]
fn test_load_rejects_transform_from_another_run() {
    let dir = tempdir().unwrap();
    let first = ArtifactPaths::in_dir(&dir.path().join("first"));
    let second = ArtifactPaths::in_dir(&dir.path().join("second"));

    let pair = fitted_pair();
    save_artifacts(&pair, Uuid::new_v4(), None, &first).unwrap();

    let mut other_features = pair.transform().features().to_vec();
    other_features[0].mean += 1.0;
    let other = ArtifactPair::new(
        pair.model().clone(),
        ScalingTransform::from_features(other_features),
    )
    .unwrap();
    save_artifacts(&other, Uuid::new_v4(), None, &second).unwrap();

    fs::copy(&second.transform, &first.transform).unwrap();

    match load_artifacts(&first) {
        Err(ScorerError::ArtifactCorrupt { path, reason }) => {
            assert_eq!(path, first.transform);
            assert!(reason.contains("checksum"));
        }
        other => panic!("Expected ArtifactCorrupt, got {:?}", other),
    }
}

#[test]
fn test_no_temp_files_left_behind() {
    let dir = tempdir().unwrap();
    let paths = ArtifactPaths::in_dir(dir.path());
    save_artifacts(&fitted_pair(), Uuid::new_v4(), None, &paths).unwrap();

    let leftovers: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| p.extension().map_or(false, |e| e == "tmp"))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn test_concurrent_saves_of_one_pair_all_succeed() {
    let dir = tempdir().unwrap();
    let paths = ArtifactPaths::in_dir(dir.path());
    let pair = fitted_pair();
    let id = Uuid::new_v4();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(|| {
                    (0..25)
                        .map(|_| save_artifacts(&pair, id, None, &paths))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        for handle in handles {
            for result in handle.join().unwrap() {
                assert!(result.is_ok(), "{:?}", result);
            }
        }
    });

    assert_eq!(load_artifacts(&paths).unwrap().pair, pair);
    let leftovers = fs::read_dir(dir.path()).unwrap().count();
    assert_eq!(leftovers, 2);
}
