// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Trained model and the load → split → train → evaluate pipeline
//!
//! A [`TrainedModel`] is built once per process and never mutated; prediction
//! takes `&self` so one instance can be shared across request handlers.

use std::fmt::{Display, Formatter};
use std::time::{Duration, Instant};

use ndarray::{Array2, ArrayView1};
use serde::{Deserialize, Serialize};

use labkit_config::ClassifierConfig;

use crate::dataset::{load_dataset, Dataset, Diagnosis, N_FEATURES};
use crate::error::ClassifierError;
use crate::forest::{argmax, ForestParams, RandomForest};
use crate::metrics::Evaluation;
use crate::split::train_test_split;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub diagnosis: Diagnosis,
    /// Probability of the predicted class, as a percentage in [50, 100]
    pub confidence: f64,
}

impl Prediction {
    fn from_proba(proba: [f64; 2]) -> Self {
        let class = argmax(&proba);
        Self {
            diagnosis: Diagnosis::from_class_index(class),
            confidence: proba[class] * 100.0,
        }
    }
}

impl Display for Prediction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let emoji = self.diagnosis.emoji();
        write!(
            f,
            "{} The tumor is predicted to be: {} with {:.2}% confidence. {}",
            emoji,
            self.diagnosis.label(),
            self.confidence,
            emoji
        )
    }
}

#[derive(Debug, Clone)]
pub struct TrainedModel {
    forest: RandomForest,
    feature_names: Vec<String>,
    evaluation: Evaluation,
    train_samples: usize,
}

impl TrainedModel {
    /// Split `dataset`, fit the forest on the training side and score it on
    /// the held-out side.
    pub fn train(dataset: &Dataset, config: &ClassifierConfig) -> Result<Self, ClassifierError> {
        let split = train_test_split(dataset, config.test_fraction, config.seed)?;
        let started = Instant::now();
        let forest = RandomForest::fit(&split.train, ForestParams::from_config(config))?;

        let predicted = forest.predict(split.test.features());
        let evaluation = Evaluation::from_predictions(split.test.labels(), &predicted);
        tracing::info!(
            target: "labkit_classifier",
            "Model trained in {:.2?}; accuracy {:.2}% on {} held-out samples",
            started.elapsed(),
            evaluation.accuracy_percent(),
            evaluation.test_samples
        );
        tracing::debug!(target: "labkit_classifier", "Classification report:\n{}", evaluation.report);

        Ok(Self {
            forest,
            feature_names: dataset.feature_names().to_vec(),
            evaluation,
            train_samples: split.train.len(),
        })
    }

    /// Load the configured dataset and train on it.
    pub fn from_config(config: &ClassifierConfig) -> Result<Self, ClassifierError> {
        let dataset = load_dataset(
            &config.dataset_source,
            Duration::from_secs(config.fetch_timeout_secs),
        )?;
        Self::train(&dataset, config)
    }

    pub fn predict(&self, features: &[f64; N_FEATURES]) -> Prediction {
        let row = ArrayView1::from(&features[..]);
        Prediction::from_proba(self.forest.predict_proba_row(row))
    }

    /// Like [`predict`](Self::predict) for input of unchecked length.
    pub fn predict_slice(&self, features: &[f64]) -> Result<Prediction, ClassifierError> {
        let expected = self.forest.n_features();
        if features.len() != expected {
            return Err(ClassifierError::FeatureCount {
                expected,
                found: features.len(),
            });
        }
        Ok(Prediction::from_proba(
            self.forest.predict_proba_row(ArrayView1::from(features)),
        ))
    }

    /// Batch prediction over the rows of `features`.
    pub fn predict_batch(&self, features: &Array2<f64>) -> Result<Vec<Prediction>, ClassifierError> {
        if features.ncols() != self.forest.n_features() {
            return Err(ClassifierError::FeatureCount {
                expected: self.forest.n_features(),
                found: features.ncols(),
            });
        }
        let proba = self.forest.predict_proba(features.view());
        Ok(proba
            .outer_iter()
            .map(|row| Prediction::from_proba([row[0], row[1]]))
            .collect())
    }

    pub fn evaluation(&self) -> &Evaluation {
        &self.evaluation
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn n_features(&self) -> usize {
        self.forest.n_features()
    }

    pub fn train_samples(&self) -> usize {
        self.train_samples
    }

    pub fn forest(&self) -> &RandomForest {
        &self.forest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prediction_message() {
        let p = Prediction {
            diagnosis: Diagnosis::Malignant,
            confidence: 87.0,
        };
        assert_eq!(
            p.to_string(),
            "🔴 The tumor is predicted to be: Malignant with 87.00% confidence. 🔴"
        );
    }

    #[test]
    fn test_tie_goes_to_benign() {
        let p = Prediction::from_proba([0.5, 0.5]);
        assert_eq!(p.diagnosis, Diagnosis::Benign);
        assert_eq!(p.confidence, 50.0);
    }

    #[test]
    fn test_confidence_is_max_probability() {
        let p = Prediction::from_proba([0.13, 0.87]);
        assert_eq!(p.diagnosis, Diagnosis::Malignant);
        assert!((p.confidence - 87.0).abs() < 1e-9);
    }
}
