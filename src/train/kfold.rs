//! K-fold split generation for cross-validated search

use crate::error::{Error, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// K-fold splitter
///
/// Fold assignment is contiguous and deterministic by default: the first
/// `n mod k` folds receive one extra sample. An explicit seed enables a
/// reproducible shuffled assignment.
#[derive(Debug, Clone)]
pub struct KFold {
    n_splits: usize,
    shuffle_seed: Option<u64>,
}

impl KFold {
    pub fn new(n_splits: usize) -> Self {
        Self {
            n_splits,
            shuffle_seed: None,
        }
    }

    /// Shuffle sample indices before folding, seeded for determinism
    pub fn with_shuffle(mut self, seed: u64) -> Self {
        self.shuffle_seed = Some(seed);
        self
    }

    /// Produce `(train_indices, validation_indices)` pairs, one per fold
    pub fn split(&self, n_samples: usize) -> Result<Vec<(Vec<usize>, Vec<usize>)>> {
        if self.n_splits < 2 {
            return Err(Error::Training(format!(
                "cross-validation requires at least 2 folds, got {}",
                self.n_splits
            )));
        }
        if n_samples < self.n_splits {
            return Err(Error::Training(format!(
                "cannot split {n_samples} samples into {} folds",
                self.n_splits
            )));
        }

        let mut indices: Vec<usize> = (0..n_samples).collect();
        if let Some(seed) = self.shuffle_seed {
            let mut rng = StdRng::seed_from_u64(seed);
            indices.shuffle(&mut rng);
        }

        let base = n_samples / self.n_splits;
        let extra = n_samples % self.n_splits;

        let mut splits = Vec::with_capacity(self.n_splits);
        let mut start = 0;
        for fold in 0..self.n_splits {
            let size = base + usize::from(fold < extra);
            let end = start + size;
            let validation: Vec<usize> = indices[start..end].to_vec();
            let train: Vec<usize> = indices[..start]
                .iter()
                .chain(indices[end..].iter())
                .copied()
                .collect();
            splits.push((train, validation));
            start = end;
        }
        Ok(splits)
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_split_partitions_all_indices(
            n_splits in 2usize..8,
            n_samples in 8usize..100,
        ) {
            let splits = KFold::new(n_splits).split(n_samples).expect("split");
            prop_assert_eq!(splits.len(), n_splits);

            let mut seen: Vec<usize> = splits
                .iter()
                .flat_map(|(_, val)| val.iter().copied())
                .collect();
            seen.sort_unstable();
            prop_assert_eq!(seen, (0..n_samples).collect::<Vec<_>>());

            let max = splits.iter().map(|(_, v)| v.len()).max().unwrap_or(0);
            let min = splits.iter().map(|(_, v)| v.len()).min().unwrap_or(0);
            prop_assert!(max - min <= 1);
        }
    }
}
