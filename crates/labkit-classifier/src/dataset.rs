// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Breast Cancer Wisconsin (Diagnostic) dataset
//!
//! The CSV export has 32 columns: an ID, 30 real-valued shape descriptors
//! (ten measurements, each as mean / standard error / worst, suffixed 1/2/3)
//! and the diagnosis letter. The header row of the file is skipped and the
//! fixed names below are used instead.

use std::io::Read;
use std::path::Path;
use std::time::Duration;

use ndarray::{Array2, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::error::DatasetError;

pub const COLUMN_NAMES: [&str; 32] = [
    "ID",
    "radius1",
    "texture1",
    "perimeter1",
    "area1",
    "smoothness1",
    "compactness1",
    "concavity1",
    "concave_points1",
    "symmetry1",
    "fractal_dimension1",
    "radius2",
    "texture2",
    "perimeter2",
    "area2",
    "smoothness2",
    "compactness2",
    "concavity2",
    "concave_points2",
    "symmetry2",
    "fractal_dimension2",
    "radius3",
    "texture3",
    "perimeter3",
    "area3",
    "smoothness3",
    "compactness3",
    "concavity3",
    "concave_points3",
    "symmetry3",
    "fractal_dimension3",
    "Diagnosis",
];

/// Shape descriptors; a column is a feature when its name contains one.
pub const FEATURE_KEYWORDS: [&str; 10] = [
    "radius",
    "texture",
    "perimeter",
    "area",
    "smoothness",
    "compactness",
    "concavity",
    "concave_points",
    "symmetry",
    "fractal_dimension",
];

pub const N_FEATURES: usize = 30;
const LABEL_COLUMN: &str = "Diagnosis";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Diagnosis {
    Benign,
    Malignant,
}

impl Diagnosis {
    pub const ALL: [Diagnosis; 2] = [Diagnosis::Benign, Diagnosis::Malignant];

    /// Class index used by the classifier (B = 0, M = 1)
    pub fn class_index(self) -> usize {
        match self {
            Diagnosis::Benign => 0,
            Diagnosis::Malignant => 1,
        }
    }

    pub fn from_class_index(index: usize) -> Self {
        if index == 1 {
            Diagnosis::Malignant
        } else {
            Diagnosis::Benign
        }
    }

    /// Parse the dataset's `B` / `M` letter.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "B" => Some(Diagnosis::Benign),
            "M" => Some(Diagnosis::Malignant),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Diagnosis::Benign => "Benign",
            Diagnosis::Malignant => "Malignant",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Diagnosis::Benign => "\u{1F7E2}",
            Diagnosis::Malignant => "\u{1F534}",
        }
    }
}

impl std::fmt::Display for Diagnosis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Feature matrix (one row per sample) with class labels
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    feature_names: Vec<String>,
    features: Array2<f64>,
    labels: Vec<usize>,
}

impl Dataset {
    pub fn new(
        feature_names: Vec<String>,
        features: Array2<f64>,
        labels: Vec<usize>,
    ) -> Result<Self, DatasetError> {
        if features.nrows() == 0 {
            return Err(DatasetError::Empty);
        }
        if features.nrows() != labels.len() || features.ncols() != feature_names.len() {
            return Err(DatasetError::Csv(format!(
                "shape mismatch: {} rows x {} columns, {} labels, {} names",
                features.nrows(),
                features.ncols(),
                labels.len(),
                feature_names.len()
            )));
        }
        Ok(Self {
            feature_names,
            features,
            labels,
        })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn n_features(&self) -> usize {
        self.features.ncols()
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn features(&self) -> ArrayView2<'_, f64> {
        self.features.view()
    }

    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    pub fn row(&self, index: usize) -> ArrayView1<'_, f64> {
        self.features.row(index)
    }

    /// New dataset made of the given rows, in order.
    pub fn select(&self, indices: &[usize]) -> Dataset {
        Dataset {
            feature_names: self.feature_names.clone(),
            features: self.features.select(ndarray::Axis(0), indices),
            labels: indices.iter().map(|&i| self.labels[i]).collect(),
        }
    }

    /// Samples per class, indexed by class
    pub fn class_counts(&self) -> [usize; 2] {
        let mut counts = [0; 2];
        for &label in &self.labels {
            counts[label.min(1)] += 1;
        }
        counts
    }
}

/// Indices of the columns whose name contains a shape keyword.
pub fn select_feature_columns(columns: &[&str]) -> Vec<usize> {
    columns
        .iter()
        .enumerate()
        .filter(|(_, name)| FEATURE_KEYWORDS.iter().any(|k| name.contains(k)))
        .map(|(i, _)| i)
        .collect()
}

/// Human-readable form of a feature column, e.g. `concave_points1` becomes
/// `Concave Points 1`.
pub fn feature_label(column: &str) -> String {
    let stem = column.trim_end_matches(|c: char| c.is_ascii_digit());
    let suffix = &column[stem.len()..];
    let words: Vec<String> = stem
        .split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            chars
                .next()
                .map(|first| first.to_uppercase().chain(chars).collect())
                .unwrap_or_default()
        })
        .collect();
    if suffix.is_empty() {
        words.join(" ")
    } else {
        format!("{} {}", words.join(" "), suffix)
    }
}

/// Names of the 30 feature columns in training order.
pub fn feature_columns() -> Vec<&'static str> {
    select_feature_columns(&COLUMN_NAMES)
        .into_iter()
        .map(|c| COLUMN_NAMES[c])
        .collect()
}

/// Parse the 32-column CSV layout. The first row is treated as a header and
/// discarded.
pub fn parse_dataset<R: Read>(reader: R) -> Result<Dataset, DatasetError> {
    let feature_columns = select_feature_columns(&COLUMN_NAMES);
    let label_column = COLUMN_NAMES
        .iter()
        .position(|&c| c == LABEL_COLUMN)
        .unwrap_or(COLUMN_NAMES.len() - 1);

    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut values = Vec::new();
    let mut labels = Vec::new();
    for (index, record) in csv_reader.records().enumerate() {
        let record = record?;
        // Line numbers as seen in the file (header is line 1).
        let row = index + 2;
        if record.len() != COLUMN_NAMES.len() {
            return Err(DatasetError::ColumnCount {
                row,
                expected: COLUMN_NAMES.len(),
                found: record.len(),
            });
        }

        let code = &record[label_column];
        let diagnosis = Diagnosis::from_code(code).ok_or_else(|| DatasetError::UnknownLabel {
            row,
            value: code.to_string(),
        })?;
        labels.push(diagnosis.class_index());

        for &column in &feature_columns {
            let raw = &record[column];
            let value = raw.parse::<f64>().map_err(|_| DatasetError::BadValue {
                row,
                column: COLUMN_NAMES[column].to_string(),
                value: raw.to_string(),
            })?;
            values.push(value);
        }
    }

    let rows = labels.len();
    if rows == 0 {
        return Err(DatasetError::Empty);
    }
    let features = Array2::from_shape_vec((rows, feature_columns.len()), values)
        .map_err(|e| DatasetError::Csv(e.to_string()))?;
    let names = feature_columns
        .iter()
        .map(|&c| COLUMN_NAMES[c].to_string())
        .collect();
    Dataset::new(names, features, labels)
}

/// Load from an `http(s)://` URL or a local file path.
pub fn load_dataset(source: &str, timeout: Duration) -> Result<Dataset, DatasetError> {
    let dataset = if source.starts_with("http://") || source.starts_with("https://") {
        let body = fetch(source, timeout)?;
        parse_dataset(body.as_bytes())?
    } else {
        let path = Path::new(source);
        parse_dataset(std::fs::File::open(path)?)?
    };

    let [benign, malignant] = dataset.class_counts();
    tracing::info!(
        target: "labkit_classifier",
        "Loaded {} samples ({} benign, {} malignant) with {} features from {}",
        dataset.len(),
        benign,
        malignant,
        dataset.n_features(),
        source
    );
    Ok(dataset)
}

#[cfg(feature = "remote")]
fn fetch(url: &str, timeout: Duration) -> Result<String, DatasetError> {
    let fetch_err = |reason: String| DatasetError::Fetch {
        source_url: url.to_string(),
        reason,
    };
    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| fetch_err(format!("HTTP client init failed: {e}")))?;
    let response = client
        .get(url)
        .send()
        .and_then(|r| r.error_for_status())
        .map_err(|e| fetch_err(e.to_string()))?;
    response.text().map_err(|e| fetch_err(e.to_string()))
}

#[cfg(not(feature = "remote"))]
fn fetch(url: &str, _timeout: Duration) -> Result<String, DatasetError> {
    Err(DatasetError::RemoteDisabled(url.to_string()))
}
