//! Row partitioning for experiments.
//!
//! `train_test_split` shuffles once with a seeded RNG and carves the test
//! partition off the front of the permutation. `validation_split` is the
//! fitting procedure's own split: it holds out the tail of whatever rows it
//! is given, without shuffling.
use std::ops::Range;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::{Result, RunnerError};

/// Row indices of the training pool and the held-out test partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Seeded shuffle-split of `n_samples` rows.
///
/// The test partition holds `ceil(test_size * n_samples)` rows.
pub fn train_test_split(n_samples: usize, test_size: f64, seed: u64) -> Result<Partition> {
    let n_test = (test_size * n_samples as f64).ceil() as usize;
    let n_train = n_samples.saturating_sub(n_test);
    if n_test == 0 || n_train == 0 {
        return Err(RunnerError::Training(format!(
            "cannot split {} rows with test_size={}: a partition would be empty",
            n_samples, test_size
        )));
    }

    let mut indices: Vec<usize> = (0..n_samples).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let train = indices.split_off(n_test);
    Ok(Partition {
        train,
        test: indices,
    })
}

/// Split `n_samples` ordered rows into a fitting head and a validation tail.
///
/// The head holds `floor(n_samples * (1 - fraction))` rows.
pub fn validation_split(n_samples: usize, fraction: f64) -> Result<(Range<usize>, Range<usize>)> {
    let split_at = (n_samples as f64 * (1.0 - fraction)).floor() as usize;
    if split_at == 0 || split_at >= n_samples {
        return Err(RunnerError::Training(format!(
            "cannot hold out validation_split={} of {} training rows",
            fraction, n_samples
        )));
    }
    Ok((0..split_at, split_at..n_samples))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_sizes_follow_ceil_rule() {
        let p = train_test_split(20, 0.2, 100).unwrap();
        assert_eq!(p.test.len(), 4);
        assert_eq!(p.train.len(), 16);

        let p = train_test_split(11, 0.2, 100).unwrap();
        assert_eq!(p.test.len(), 3);
        assert_eq!(p.train.len(), 8);
    }

    #[test]
    fn split_is_a_disjoint_cover() {
        let p = train_test_split(50, 0.2, 7).unwrap();
        let mut all: Vec<usize> = p.train.iter().chain(p.test.iter()).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn same_seed_same_split() {
        let a = train_test_split(30, 0.2, 100).unwrap();
        let b = train_test_split(30, 0.2, 100).unwrap();
        let c = train_test_split(30, 0.2, 101).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn too_few_rows_is_an_error() {
        assert!(train_test_split(1, 0.2, 100).is_err());
        assert!(train_test_split(0, 0.2, 100).is_err());
    }

    #[test]
    fn validation_takes_the_tail() {
        let (fit, val) = validation_split(16, 0.2).unwrap();
        assert_eq!(fit, 0..12);
        assert_eq!(val, 12..16);
        assert!(validation_split(1, 0.2).is_err());
    }
}
