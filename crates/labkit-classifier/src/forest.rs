// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Random forest ensemble
//!
//! Each tree is grown on a bootstrap sample of the training rows with its own
//! `ChaCha8Rng`, seeded from a master generator so that a fixed forest seed
//! reproduces the same ensemble regardless of how rayon schedules the work.

use ndarray::{Array2, ArrayView1, ArrayView2};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use labkit_config::ClassifierConfig;

use crate::dataset::Dataset;
use crate::error::ClassifierError;
use crate::tree::{DecisionTree, TreeParams, N_CLASSES};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaxFeatures {
    /// `floor(sqrt(n_features))`
    Sqrt,
    /// `floor(log2(n_features))`
    Log2,
    All,
    Fixed(usize),
}

impl MaxFeatures {
    pub fn resolve(self, n_features: usize) -> usize {
        let n = n_features.max(1);
        let resolved = match self {
            MaxFeatures::Sqrt => (n as f64).sqrt() as usize,
            MaxFeatures::Log2 => (n as f64).log2() as usize,
            MaxFeatures::All => n,
            MaxFeatures::Fixed(k) => k,
        };
        resolved.clamp(1, n)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestParams {
    pub n_trees: usize,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub max_features: MaxFeatures,
    pub bootstrap: bool,
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: None,
            min_samples_split: 2,
            max_features: MaxFeatures::Sqrt,
            bootstrap: true,
            seed: 42,
        }
    }
}

impl ForestParams {
    pub fn from_config(config: &ClassifierConfig) -> Self {
        Self {
            n_trees: config.n_trees,
            max_depth: config.max_depth,
            min_samples_split: config.min_samples_split,
            seed: config.seed,
            ..Self::default()
        }
    }

    fn validate(&self) -> Result<(), ClassifierError> {
        if self.n_trees == 0 {
            return Err(ClassifierError::InvalidParameter(
                "n_trees must be at least 1".to_string(),
            ));
        }
        if self.min_samples_split < 2 {
            return Err(ClassifierError::InvalidParameter(format!(
                "min_samples_split must be at least 2, got {}",
                self.min_samples_split
            )));
        }
        if self.max_depth == Some(0) {
            return Err(ClassifierError::InvalidParameter(
                "max_depth must be at least 1 when set".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct RandomForest {
    trees: Vec<DecisionTree>,
    n_features: usize,
    params: ForestParams,
}

impl RandomForest {
    pub fn fit(dataset: &Dataset, params: ForestParams) -> Result<Self, ClassifierError> {
        params.validate()?;
        if dataset.is_empty() {
            return Err(crate::error::DatasetError::Empty.into());
        }

        let features = dataset.features();
        let labels = dataset.labels();
        let n_samples = dataset.len();
        let tree_params = TreeParams {
            max_depth: params.max_depth,
            min_samples_split: params.min_samples_split,
            max_features: params.max_features.resolve(dataset.n_features()),
        };

        let mut master = ChaCha8Rng::seed_from_u64(params.seed);
        let seeds: Vec<u64> = (0..params.n_trees).map(|_| master.gen()).collect();

        let trees: Vec<DecisionTree> = seeds
            .par_iter()
            .map(|&seed| {
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                let samples: Vec<usize> = if params.bootstrap {
                    (0..n_samples).map(|_| rng.gen_range(0..n_samples)).collect()
                } else {
                    (0..n_samples).collect()
                };
                DecisionTree::fit(features, labels, &samples, tree_params, &mut rng)
            })
            .collect();

        let nodes: usize = trees.iter().map(DecisionTree::node_count).sum();
        tracing::info!(
            target: "labkit_classifier",
            "Trained random forest: {} trees, {} nodes, {} features per split, {} samples",
            trees.len(),
            nodes,
            tree_params.max_features,
            n_samples
        );

        Ok(Self {
            trees,
            n_features: dataset.n_features(),
            params,
        })
    }

    /// Mean of the per-tree leaf class fractions for one row.
    pub fn predict_proba_row(&self, row: ArrayView1<'_, f64>) -> [f64; N_CLASSES] {
        let mut sum = [0.0; N_CLASSES];
        for tree in &self.trees {
            for (s, p) in sum.iter_mut().zip(tree.predict_proba(row)) {
                *s += p;
            }
        }
        let n = self.trees.len().max(1) as f64;
        sum.map(|s| s / n)
    }

    /// One row of class probabilities per input row.
    pub fn predict_proba(&self, features: ArrayView2<'_, f64>) -> Array2<f64> {
        let rows: Vec<[f64; N_CLASSES]> = features
            .outer_iter()
            .into_par_iter()
            .map(|row| self.predict_proba_row(row))
            .collect();
        let mut out = Array2::zeros((rows.len(), N_CLASSES));
        for (mut dest, proba) in out.outer_iter_mut().zip(&rows) {
            for (d, &p) in dest.iter_mut().zip(proba) {
                *d = p;
            }
        }
        out
    }

    pub fn predict(&self, features: ArrayView2<'_, f64>) -> Vec<usize> {
        self.predict_proba(features)
            .outer_iter()
            .map(|row| argmax(row.as_slice().unwrap_or(&[])))
            .collect()
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn params(&self) -> &ForestParams {
        &self.params
    }

    pub fn trees(&self) -> &[DecisionTree] {
        &self.trees
    }
}

/// Index of the largest value; ties resolve to the lowest index.
pub fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate().skip(1) {
        if v > values[best] {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn blobs() -> Dataset {
        // Two well separated clusters in 4 dimensions.
        let rows = 40;
        let features = Array2::from_shape_fn((rows, 4), |(r, c)| {
            let base = if r % 2 == 0 { 0.0 } else { 10.0 };
            base + ((r * 7 + c * 3) % 5) as f64 * 0.3
        });
        let labels = (0..rows).map(|r| r % 2).collect();
        let names = (0..4).map(|i| format!("f{i}")).collect();
        Dataset::new(names, features, labels).unwrap()
    }

    fn params(n_trees: usize) -> ForestParams {
        ForestParams {
            n_trees,
            ..ForestParams::default()
        }
    }

    #[test]
    fn test_max_features_resolution() {
        assert_eq!(MaxFeatures::Sqrt.resolve(30), 5);
        assert_eq!(MaxFeatures::Log2.resolve(30), 4);
        assert_eq!(MaxFeatures::All.resolve(30), 30);
        assert_eq!(MaxFeatures::Fixed(50).resolve(30), 30);
        assert_eq!(MaxFeatures::Sqrt.resolve(1), 1);
    }

    #[test]
    fn test_argmax_ties_go_low() {
        assert_eq!(argmax(&[0.5, 0.5]), 0);
        assert_eq!(argmax(&[0.4, 0.6]), 1);
        assert_eq!(argmax(&[]), 0);
    }

    #[test]
    fn test_forest_learns_separable_clusters() {
        let data = blobs();
        let forest = RandomForest::fit(&data, params(15)).unwrap();
        assert_eq!(forest.n_trees(), 15);
        assert_eq!(forest.predict(data.features()), data.labels());

        let proba = forest.predict_proba(array![[0.2, 0.2, 0.2, 0.2], [10.1, 10.0, 10.4, 10.2]].view());
        assert!(proba[[0, 0]] > 0.9);
        assert!(proba[[1, 1]] > 0.9);
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        let data = blobs();
        let forest = RandomForest::fit(&data, params(10)).unwrap();
        let proba = forest.predict_proba(array![[5.0, 5.0, 5.0, 5.0], [-3.0, 20.0, 0.0, 1.0]].view());
        for row in proba.outer_iter() {
            assert!((row.sum() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_same_seed_same_forest() {
        let data = blobs();
        let a = RandomForest::fit(&data, params(8)).unwrap();
        let b = RandomForest::fit(&data, params(8)).unwrap();
        assert_eq!(a.trees(), b.trees());
    }

    #[test]
    fn test_invalid_params() {
        let data = blobs();
        assert!(matches!(
            RandomForest::fit(&data, params(0)),
            Err(ClassifierError::InvalidParameter(_))
        ));
        let bad_split = ForestParams {
            min_samples_split: 1,
            ..params(3)
        };
        assert!(RandomForest::fit(&data, bad_split).is_err());
    }
}
