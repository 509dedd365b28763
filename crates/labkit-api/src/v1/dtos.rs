// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Request and response bodies of the `/v1` endpoints

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use labkit_classifier::{ClassificationReport, Diagnosis, Evaluation, Prediction};

use crate::common::{ApiError, ApiResult};

/// Either a positional vector in training column order or one entry per
/// feature column name (`radius1` ... `fractal_dimension3`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PredictRequest {
    Vector { features: Vec<f64> },
    Named(BTreeMap<String, f64>),
}

impl PredictRequest {
    /// Arrange the request values in the order of `feature_names`.
    pub fn into_features(self, feature_names: &[String]) -> ApiResult<Vec<f64>> {
        match self {
            PredictRequest::Vector { features } => Ok(features),
            PredictRequest::Named(mut values) => {
                let mut features = Vec::with_capacity(feature_names.len());
                let mut missing = Vec::new();
                for name in feature_names {
                    match values.remove(name) {
                        Some(v) => features.push(v),
                        None => missing.push(name.clone()),
                    }
                }
                if !missing.is_empty() {
                    return Err(ApiError::invalid_input(format!(
                        "Missing features: {}",
                        missing.join(", ")
                    ))
                    .with_details(serde_json::json!({ "missing": missing })));
                }
                if !values.is_empty() {
                    let unknown: Vec<String> = values.into_keys().collect();
                    return Err(ApiError::invalid_input(format!(
                        "Unknown features: {}",
                        unknown.join(", ")
                    ))
                    .with_details(serde_json::json!({ "unknown": unknown })));
                }
                Ok(features)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictResponse {
    /// "Benign" or "Malignant"
    pub diagnosis: String,
    /// Class index (0 = benign, 1 = malignant)
    pub label: usize,
    /// Percentage in [50, 100]
    pub confidence: f64,
    pub message: String,
}

impl From<Prediction> for PredictResponse {
    fn from(prediction: Prediction) -> Self {
        Self {
            diagnosis: prediction.diagnosis.label().to_string(),
            label: prediction.diagnosis.class_index(),
            confidence: prediction.confidence,
            message: prediction.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelEvaluationResponse {
    pub accuracy: f64,
    pub accuracy_percent: f64,
    pub train_samples: usize,
    pub test_samples: usize,
    pub n_trees: usize,
    pub report: ClassificationReport,
    /// Text table of the report
    pub report_text: String,
}

impl ModelEvaluationResponse {
    pub fn new(evaluation: &Evaluation, train_samples: usize, n_trees: usize) -> Self {
        Self {
            accuracy: evaluation.accuracy,
            accuracy_percent: evaluation.accuracy_percent(),
            train_samples,
            test_samples: evaluation.test_samples,
            n_trees,
            report: evaluation.report.clone(),
            report_text: evaluation.report.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    pub status: String,
    pub model_ready: bool,
    pub classes: Vec<String>,
    pub n_features: usize,
}

impl HealthCheckResponse {
    pub fn healthy(n_features: usize) -> Self {
        Self {
            status: "healthy".to_string(),
            model_ready: true,
            classes: Diagnosis::ALL.iter().map(|d| d.label().to_string()).collect(),
            n_features,
        }
    }
}
