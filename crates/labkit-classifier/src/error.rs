// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/// Errors raised while obtaining or splitting the dataset
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("Failed to fetch dataset from {source_url}: {reason}")]
    Fetch { source_url: String, reason: String },

    #[error("Remote dataset {0} requested but labkit-classifier was built without the `remote` feature")]
    RemoteDisabled(String),

    #[error("Failed to read dataset file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed CSV: {0}")]
    Csv(String),

    #[error("Row {row}: expected {expected} columns, found {found}")]
    ColumnCount { row: usize, expected: usize, found: usize },

    #[error("Row {row}: column '{column}' value '{value}' is not a number")]
    BadValue { row: usize, column: String, value: String },

    #[error("Row {row}: unknown diagnosis label '{value}' (expected B or M)")]
    UnknownLabel { row: usize, value: String },

    #[error("Dataset is empty")]
    Empty,

    #[error("Split of {samples} samples with test fraction {test_fraction} leaves an empty partition")]
    DegenerateSplit { samples: usize, test_fraction: f64 },
}

impl From<csv::Error> for DatasetError {
    fn from(err: csv::Error) -> Self {
        DatasetError::Csv(err.to_string())
    }
}

/// Errors raised by training and prediction
#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Expected {expected} features, got {found}")]
    FeatureCount { expected: usize, found: usize },
}
