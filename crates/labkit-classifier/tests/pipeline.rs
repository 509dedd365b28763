// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use labkit_classifier::{
    load_dataset, parse_dataset, train_test_split, ClassifierError, Diagnosis, TrainedModel,
    COLUMN_NAMES, N_FEATURES,
};
use labkit_config::ClassifierConfig;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

/// Synthetic export in the 32-column layout. Malignant rows have larger
/// measurements with some overlap so the forest is not trivially perfect.
fn synthetic_csv(rows: usize, seed: u64) -> String {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut text = COLUMN_NAMES.join(",");
    text.push('\n');
    for id in 0..rows {
        let malignant = rng.gen_bool(0.4);
        let centre = if malignant { 1.6 } else { 1.0 };
        let features: Vec<String> = (0..N_FEATURES)
            .map(|i| {
                let scale = 1.0 + i as f64;
                format!("{:.5}", scale * (centre + rng.gen_range(-0.35..0.35)))
            })
            .collect();
        text.push_str(&format!(
            "{},{},{}\n",
            842302 + id,
            features.join(","),
            if malignant { "M" } else { "B" }
        ));
    }
    text
}

fn small_config(source: String) -> ClassifierConfig {
    ClassifierConfig {
        dataset_source: source,
        n_trees: 25,
        ..ClassifierConfig::default()
    }
}

#[test]
fn test_split_and_accuracy_are_reproducible() {
    let dataset = parse_dataset(synthetic_csv(200, 5).as_bytes()).unwrap();
    let config = small_config(String::new());

    let a = train_test_split(&dataset, 0.2, 42).unwrap();
    let b = train_test_split(&dataset, 0.2, 42).unwrap();
    assert_eq!(a.test_indices, b.test_indices);
    assert_eq!(a.test.len(), 40);

    let first = TrainedModel::train(&dataset, &config).unwrap();
    let second = TrainedModel::train(&dataset, &config).unwrap();
    assert_eq!(first.evaluation(), second.evaluation());
    assert!(first.evaluation().accuracy > 0.8);
    assert_eq!(first.train_samples(), 160);
}

#[test]
fn test_predictions_obey_contract() {
    let dataset = parse_dataset(synthetic_csv(150, 9).as_bytes()).unwrap();
    let model = TrainedModel::train(&dataset, &small_config(String::new())).unwrap();

    let mut rng = ChaCha8Rng::seed_from_u64(77);
    let mut inputs: Vec<[f64; N_FEATURES]> = vec![[0.0; N_FEATURES], [1e9; N_FEATURES], [-5.0; N_FEATURES]];
    for _ in 0..50 {
        let mut row = [0.0; N_FEATURES];
        for v in row.iter_mut() {
            *v = rng.gen_range(-100.0..100.0);
        }
        inputs.push(row);
    }

    for features in &inputs {
        let prediction = model.predict(features);
        assert!(matches!(
            prediction.diagnosis.label(),
            "Malignant" | "Benign"
        ));
        assert!(
            (50.0..=100.0).contains(&prediction.confidence),
            "confidence {} out of range",
            prediction.confidence
        );
    }
}

#[test]
fn test_large_measurements_predicted_malignant() {
    let dataset = parse_dataset(synthetic_csv(200, 21).as_bytes()).unwrap();
    let model = TrainedModel::train(&dataset, &small_config(String::new())).unwrap();

    let mut big = [0.0; N_FEATURES];
    let mut small = [0.0; N_FEATURES];
    for i in 0..N_FEATURES {
        big[i] = (1.0 + i as f64) * 1.9;
        small[i] = (1.0 + i as f64) * 0.7;
    }
    assert_eq!(model.predict(&big).diagnosis, Diagnosis::Malignant);
    assert_eq!(model.predict(&small).diagnosis, Diagnosis::Benign);
}

#[test]
fn test_wrong_feature_count_rejected() {
    let dataset = parse_dataset(synthetic_csv(60, 3).as_bytes()).unwrap();
    let model = TrainedModel::train(&dataset, &small_config(String::new())).unwrap();

    let err = model.predict_slice(&[1.0; 12]).unwrap_err();
    assert!(matches!(
        err,
        ClassifierError::FeatureCount {
            expected: 30,
            found: 12
        }
    ));
    assert!(model.predict_slice(&[1.0; 30]).is_ok());
}

#[test]
fn test_from_config_reads_local_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wdbc.csv");
    std::fs::write(&path, synthetic_csv(80, 13)).unwrap();

    let dataset = load_dataset(path.to_str().unwrap(), Duration::from_secs(1)).unwrap();
    assert_eq!(dataset.len(), 80);

    let model = TrainedModel::from_config(&small_config(path.display().to_string())).unwrap();
    assert_eq!(model.n_features(), N_FEATURES);
    assert_eq!(model.evaluation().test_samples, 16);

    let json = serde_json::to_value(model.evaluation()).unwrap();
    assert!(json["accuracy"].as_f64().is_some());
}

#[test]
fn test_tiny_dataset_split_is_fatal() {
    let dataset = parse_dataset(synthetic_csv(1, 1).as_bytes()).unwrap();
    let err = TrainedModel::train(&dataset, &small_config(String::new())).unwrap_err();
    assert!(matches!(err, ClassifierError::Dataset(_)));
}
