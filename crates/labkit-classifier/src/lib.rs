// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # labkit-classifier
//!
//! Tumor diagnosis from the Breast Cancer Wisconsin (Diagnostic) table:
//! dataset loading, a seeded 80/20 split, a random forest trained once per
//! process, held-out evaluation and a stateless predictor.
//!
//! ```no_run
//! use labkit_classifier::TrainedModel;
//! use labkit_config::ClassifierConfig;
//!
//! let model = TrainedModel::from_config(&ClassifierConfig::default())?;
//! println!("Accuracy of the model: {:.2}%", model.evaluation().accuracy_percent());
//! let prediction = model.predict(&[0.0; 30]);
//! println!("{prediction}");
//! # Ok::<(), labkit_classifier::ClassifierError>(())
//! ```

pub mod dataset;
pub mod error;
pub mod forest;
pub mod metrics;
pub mod model;
pub mod split;
pub mod tree;

pub use dataset::{
    feature_columns, feature_label, load_dataset, parse_dataset, select_feature_columns, Dataset,
    Diagnosis, COLUMN_NAMES, FEATURE_KEYWORDS, N_FEATURES,
};
pub use error::{ClassifierError, DatasetError};
pub use forest::{ForestParams, MaxFeatures, RandomForest};
pub use metrics::{accuracy, ClassMetrics, ClassificationReport, Evaluation};
pub use model::{Prediction, TrainedModel};
pub use split::{train_test_split, Split};
pub use tree::{DecisionTree, TreeParams};
