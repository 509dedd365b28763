// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! CART decision tree for binary classification
//!
//! Splits minimise the weighted Gini impurity of the two children. Candidate
//! thresholds sit halfway between consecutive distinct feature values. At
//! each node `max_features` features are drawn at random; if none of them
//! separates the samples, drawing continues through the remaining features.

use ndarray::{ArrayView1, ArrayView2};
use rand::seq::SliceRandom;
use rand::Rng;

/// Classes handled by the tree (benign / malignant)
pub const N_CLASSES: usize = 2;

/// Values closer than this are treated as equal when placing thresholds.
const FEATURE_EPSILON: f64 = 1e-7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeParams {
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    /// Features examined per split
    pub max_features: usize,
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Leaf {
        proba: [f64; N_CLASSES],
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DecisionTree {
    nodes: Vec<Node>,
    n_features: usize,
    depth: usize,
}

struct Candidate {
    feature: usize,
    threshold: f64,
    impurity: f64,
}

struct Builder<'a, R: Rng> {
    features: ArrayView2<'a, f64>,
    labels: &'a [usize],
    params: TreeParams,
    rng: &'a mut R,
    nodes: Vec<Node>,
    depth: usize,
}

impl DecisionTree {
    /// Grow a tree on the rows listed in `samples` (duplicates allowed, as
    /// produced by bootstrap sampling).
    pub fn fit<R: Rng>(
        features: ArrayView2<'_, f64>,
        labels: &[usize],
        samples: &[usize],
        params: TreeParams,
        rng: &mut R,
    ) -> Self {
        let n_features = features.ncols();
        let mut builder = Builder {
            features,
            labels,
            params: TreeParams {
                max_features: params.max_features.clamp(1, n_features.max(1)),
                ..params
            },
            rng,
            nodes: Vec::new(),
            depth: 0,
        };
        let mut samples = samples.to_vec();
        builder.grow(&mut samples, 0);
        Self {
            nodes: builder.nodes,
            n_features,
            depth: builder.depth,
        }
    }

    /// Class fractions of the leaf `row` falls into.
    pub fn predict_proba(&self, row: ArrayView1<'_, f64>) -> [f64; N_CLASSES] {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                Node::Leaf { proba } => return *proba,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if row[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, Node::Leaf { .. }))
            .count()
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }
}

impl<R: Rng> Builder<'_, R> {
    /// Build the subtree for `samples` and return its node index.
    fn grow(&mut self, samples: &mut [usize], depth: usize) -> usize {
        self.depth = self.depth.max(depth);
        let counts = self.class_counts(samples);
        let index = self.nodes.len();
        self.nodes.push(Node::Leaf {
            proba: fractions(&counts),
        });

        let depth_reached = self.params.max_depth.is_some_and(|max| depth >= max);
        let pure = counts.iter().filter(|&&c| c > 0).count() <= 1;
        if depth_reached || pure || samples.len() < self.params.min_samples_split {
            return index;
        }

        let Some(best) = self.best_split(samples) else {
            return index;
        };

        let features = self.features;
        let mut boundary = 0;
        for i in 0..samples.len() {
            if features[[samples[i], best.feature]] <= best.threshold {
                samples.swap(i, boundary);
                boundary += 1;
            }
        }
        let (left_samples, right_samples) = samples.split_at_mut(boundary);
        let left = self.grow(left_samples, depth + 1);
        let right = self.grow(right_samples, depth + 1);
        self.nodes[index] = Node::Split {
            feature: best.feature,
            threshold: best.threshold,
            left,
            right,
        };
        index
    }

    fn best_split(&mut self, samples: &[usize]) -> Option<Candidate> {
        let mut order: Vec<usize> = (0..self.features.ncols()).collect();
        order.shuffle(&mut *self.rng);

        let mut best: Option<Candidate> = None;
        for (visited, &feature) in order.iter().enumerate() {
            if visited >= self.params.max_features && best.is_some() {
                break;
            }
            if let Some(candidate) = self.best_threshold(samples, feature) {
                if best
                    .as_ref()
                    .map_or(true, |b| candidate.impurity < b.impurity)
                {
                    best = Some(candidate);
                }
            }
        }
        best
    }

    /// Sweep the sorted values of one feature for the lowest weighted Gini.
    fn best_threshold(&self, samples: &[usize], feature: usize) -> Option<Candidate> {
        let mut sorted: Vec<(f64, usize)> = samples
            .iter()
            .map(|&s| (self.features[[s, feature]], self.labels[s].min(N_CLASSES - 1)))
            .collect();
        sorted.sort_by(|a, b| a.0.total_cmp(&b.0));

        let n = sorted.len();
        let mut right = [0usize; N_CLASSES];
        for &(_, class) in &sorted {
            right[class] += 1;
        }
        let mut left = [0usize; N_CLASSES];

        let mut best: Option<Candidate> = None;
        for i in 0..n.saturating_sub(1) {
            let (value, class) = sorted[i];
            left[class] += 1;
            right[class] -= 1;

            let next = sorted[i + 1].0;
            if next <= value + FEATURE_EPSILON {
                continue;
            }
            let n_left = (i + 1) as f64;
            let n_right = (n - i - 1) as f64;
            let impurity = (n_left * gini(&left) + n_right * gini(&right)) / n as f64;
            if best.as_ref().map_or(true, |b| impurity < b.impurity) {
                let mut threshold = (value + next) / 2.0;
                if threshold >= next {
                    threshold = value;
                }
                best = Some(Candidate {
                    feature,
                    threshold,
                    impurity,
                });
            }
        }
        best
    }

    fn class_counts(&self, samples: &[usize]) -> [usize; N_CLASSES] {
        let mut counts = [0; N_CLASSES];
        for &s in samples {
            counts[self.labels[s].min(N_CLASSES - 1)] += 1;
        }
        counts
    }
}

fn gini(counts: &[usize; N_CLASSES]) -> f64 {
    let total: usize = counts.iter().sum();
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    1.0 - counts
        .iter()
        .map(|&c| {
            let p = c as f64 / total;
            p * p
        })
        .sum::<f64>()
}

fn fractions(counts: &[usize; N_CLASSES]) -> [f64; N_CLASSES] {
    let total: usize = counts.iter().sum();
    let mut proba = [0.0; N_CLASSES];
    if total == 0 {
        proba[0] = 1.0;
        return proba;
    }
    for (p, &c) in proba.iter_mut().zip(counts) {
        *p = c as f64 / total as f64;
    }
    proba
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn params(max_features: usize) -> TreeParams {
        TreeParams {
            max_depth: None,
            min_samples_split: 2,
            max_features,
        }
    }

    #[test]
    fn test_gini() {
        assert_eq!(gini(&[4, 0]), 0.0);
        assert!((gini(&[2, 2]) - 0.5).abs() < 1e-12);
        assert_eq!(gini(&[0, 0]), 0.0);
    }

    #[test]
    fn test_single_threshold_separates_classes() {
        let x = array![[1.0], [2.0], [3.0], [10.0], [11.0], [12.0]];
        let y = [0, 0, 0, 1, 1, 1];
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let tree = DecisionTree::fit(x.view(), &y, &[0, 1, 2, 3, 4, 5], params(1), &mut rng);

        assert_eq!(tree.node_count(), 3);
        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.predict_proba(array![6.4].view()), [1.0, 0.0]);
        assert_eq!(tree.predict_proba(array![6.6].view()), [0.0, 1.0]);
    }

    #[test]
    fn test_constant_feature_is_skipped() {
        // Column 0 never varies; the builder must fall through to column 1.
        let x = array![[5.0, 0.0], [5.0, 1.0], [5.0, 8.0], [5.0, 9.0]];
        let y = [0, 0, 1, 1];
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let tree = DecisionTree::fit(x.view(), &y, &[0, 1, 2, 3], params(1), &mut rng);

        assert_eq!(tree.leaf_count(), 2);
        assert_eq!(tree.predict_proba(array![5.0, 0.5].view())[0], 1.0);
        assert_eq!(tree.predict_proba(array![5.0, 8.5].view())[1], 1.0);
    }

    #[test]
    fn test_inseparable_samples_give_mixed_leaf() {
        let x = Array2::from_elem((4, 2), 1.0);
        let y = [0, 1, 1, 1];
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let tree = DecisionTree::fit(x.view(), &y, &[0, 1, 2, 3], params(2), &mut rng);

        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.predict_proba(array![1.0, 1.0].view()), [0.25, 0.75]);
    }

    #[test]
    fn test_max_depth_limits_growth() {
        let x = array![[1.0], [2.0], [3.0], [4.0], [5.0], [6.0]];
        let y = [0, 1, 0, 1, 0, 1];
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let limited = TreeParams {
            max_depth: Some(1),
            ..params(1)
        };
        let tree = DecisionTree::fit(x.view(), &y, &[0, 1, 2, 3, 4, 5], limited, &mut rng);
        assert!(tree.depth() <= 1);
        assert!(tree.node_count() <= 3);
    }

    #[test]
    fn test_duplicate_samples_weight_leaves() {
        let x = array![[0.0], [0.0]];
        let y = [0, 1];
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let tree = DecisionTree::fit(x.view(), &y, &[0, 1, 1, 1], params(1), &mut rng);
        assert_eq!(tree.predict_proba(array![0.0].view()), [0.25, 0.75]);
    }

    #[test]
    fn test_fully_grown_tree_fits_training_rows() {
        let x = array![[1.0, 4.0], [2.0, 1.0], [3.0, 3.0], [4.0, 2.0], [5.0, 5.0]];
        let y = [1, 0, 1, 0, 1];
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let tree = DecisionTree::fit(x.view(), &y, &[0, 1, 2, 3, 4], params(1), &mut rng);
        for (row, &label) in x.rows().into_iter().zip(&y) {
            assert_eq!(tree.predict_proba(row)[label], 1.0);
        }
    }
}
