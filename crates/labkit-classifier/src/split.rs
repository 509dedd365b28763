// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Seeded train/test partition

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::dataset::Dataset;
use crate::error::DatasetError;

#[derive(Debug, Clone)]
pub struct Split {
    pub train: Dataset,
    pub test: Dataset,
    /// Source row indices of the test partition, in partition order
    pub test_indices: Vec<usize>,
}

/// Number of test samples for `samples` rows (rounded up).
pub fn test_size(samples: usize, test_fraction: f64) -> usize {
    (samples as f64 * test_fraction).ceil() as usize
}

/// Shuffle row indices with `ChaCha8Rng::seed_from_u64(seed)`; the first
/// `ceil(n * test_fraction)` go to the test side, the rest to training.
pub fn train_test_split(
    dataset: &Dataset,
    test_fraction: f64,
    seed: u64,
) -> Result<Split, DatasetError> {
    let samples = dataset.len();
    let n_test = if test_fraction > 0.0 && test_fraction < 1.0 {
        test_size(samples, test_fraction)
    } else {
        0
    };
    if n_test == 0 || n_test >= samples {
        return Err(DatasetError::DegenerateSplit {
            samples,
            test_fraction,
        });
    }

    let mut indices: Vec<usize> = (0..samples).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let (test_indices, train_indices) = indices.split_at(n_test);
    tracing::debug!(
        target: "labkit_classifier",
        "Split {} samples into {} train / {} test (seed {})",
        samples,
        train_indices.len(),
        test_indices.len(),
        seed
    );

    Ok(Split {
        train: dataset.select(train_indices),
        test: dataset.select(test_indices),
        test_indices: test_indices.to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn toy(rows: usize) -> Dataset {
        let features = Array2::from_shape_fn((rows, 2), |(r, c)| (r * 2 + c) as f64);
        let labels = (0..rows).map(|r| r % 2).collect();
        Dataset::new(vec!["a".into(), "b".into()], features, labels).unwrap()
    }

    #[test]
    fn test_sizes_round_up() {
        assert_eq!(test_size(569, 0.2), 114);
        assert_eq!(test_size(10, 0.2), 2);
        assert_eq!(test_size(3, 0.2), 1);
    }

    #[test]
    fn test_same_seed_same_partition() {
        let data = toy(50);
        let a = train_test_split(&data, 0.2, 42).unwrap();
        let b = train_test_split(&data, 0.2, 42).unwrap();
        assert_eq!(a.test_indices, b.test_indices);
        assert_eq!(a.train, b.train);
        assert_eq!(a.test, b.test);
    }

    #[test]
    fn test_different_seed_different_partition() {
        let data = toy(50);
        let a = train_test_split(&data, 0.2, 1).unwrap();
        let b = train_test_split(&data, 0.2, 2).unwrap();
        assert_ne!(a.test_indices, b.test_indices);
    }

    #[test]
    fn test_partition_covers_every_row_once() {
        let data = toy(23);
        let split = train_test_split(&data, 0.25, 7).unwrap();
        assert_eq!(split.test.len(), 6);
        assert_eq!(split.train.len(), 17);

        let mut firsts: Vec<f64> = split
            .train
            .features()
            .column(0)
            .iter()
            .chain(split.test.features().column(0).iter())
            .copied()
            .collect();
        firsts.sort_by(|a, b| a.total_cmp(b));
        let expected: Vec<f64> = (0..23).map(|r| (r * 2) as f64).collect();
        assert_eq!(firsts, expected);
    }

    #[test]
    fn test_degenerate_splits_rejected() {
        assert!(matches!(
            train_test_split(&toy(1), 0.2, 42),
            Err(DatasetError::DegenerateSplit { samples: 1, .. })
        ));
        assert!(train_test_split(&toy(10), 0.0, 42).is_err());
        assert!(train_test_split(&toy(10), 1.0, 42).is_err());
    }
}
