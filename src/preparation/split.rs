//! Stratified train/test split

use crate::error::{PrepError, Result};
use ndarray::Array1;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Row indices of the two partitions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitIndices {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Seeded shuffle split that preserves class proportions
#[derive(Debug, Clone)]
pub struct StratifiedSplit {
    test_size: f64,
    random_state: u64,
}

/// Share `n` draws between classes in proportion to `counts`.
///
/// Each class gets the floor of its exact share; leftover draws go to the
/// largest fractional remainders, lower class first on ties.
fn allocate(counts: &[usize], n: usize) -> Vec<usize> {
    let total: usize = counts.iter().sum();
    if total == 0 {
        return vec![0; counts.len()];
    }

    let mut alloc: Vec<usize> = counts.iter().map(|&c| c * n / total).collect();
    let remainder = n - alloc.iter().sum::<usize>();

    let mut order: Vec<usize> = (0..counts.len()).collect();
    order.sort_by(|&a, &b| (counts[b] * n % total).cmp(&(counts[a] * n % total)));
    for &class in order.iter().take(remainder) {
        alloc[class] += 1;
    }
    alloc
}

impl StratifiedSplit {
    pub fn new(test_size: f64, random_state: u64) -> Self {
        Self {
            test_size,
            random_state,
        }
    }

    /// Split row indices of `y` into train and test partitions
    pub fn split(&self, y: &Array1<f64>) -> Result<SplitIndices> {
        let n = y.len();
        if n == 0 {
            return Err(PrepError::SplitError("cannot split an empty table".to_string()));
        }
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            return Err(PrepError::InvalidParameter {
                name: "test_size".to_string(),
                value: self.test_size.to_string(),
                reason: "must lie strictly between 0 and 1".to_string(),
            });
        }

        let n_test = (self.test_size * n as f64).ceil() as usize;
        let n_train = n - n_test;

        // Group indices by class label
        let mut class_indices: BTreeMap<i64, Vec<usize>> = BTreeMap::new();
        for (idx, &label) in y.iter().enumerate() {
            class_indices.entry(label.round() as i64).or_default().push(idx);
        }

        if let Some((class, members)) = class_indices.iter().find(|(_, m)| m.len() < 2) {
            return Err(PrepError::SplitError(format!(
                "class {} has only {} member; every class needs at least 2",
                class,
                members.len()
            )));
        }

        let n_classes = class_indices.len();
        if n_train < n_classes || n_test < n_classes {
            return Err(PrepError::SplitError(format!(
                "train size {} and test size {} must each be at least the number of classes {}",
                n_train, n_test, n_classes
            )));
        }

        let counts: Vec<usize> = class_indices.values().map(Vec::len).collect();
        let train_counts = allocate(&counts, n_train);
        let remaining: Vec<usize> = counts
            .iter()
            .zip(&train_counts)
            .map(|(c, t)| c - t)
            .collect();
        let test_counts = allocate(&remaining, n_test);

        let mut rng = ChaCha8Rng::seed_from_u64(self.random_state);
        let mut train = Vec::with_capacity(n_train);
        let mut test = Vec::with_capacity(n_test);

        for (k, indices) in class_indices.into_values().enumerate() {
            let mut indices = indices;
            indices.shuffle(&mut rng);
            train.extend_from_slice(&indices[..train_counts[k]]);
            test.extend_from_slice(&indices[train_counts[k]..train_counts[k] + test_counts[k]]);
        }

        train.shuffle(&mut rng);
        test.shuffle(&mut rng);

        Ok(SplitIndices { train, test })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn labels(zeros: usize, ones: usize) -> Array1<f64> {
        Array1::from_iter(
            std::iter::repeat(0.0)
                .take(zeros)
                .chain(std::iter::repeat(1.0).take(ones)),
        )
    }

    fn count(y: &Array1<f64>, idx: &[usize], class: f64) -> usize {
        idx.iter().filter(|&&i| y[i] == class).count()
    }

    #[test]
    fn test_allocate() {
        assert_eq!(allocate(&[12, 8], 14), vec![8, 6]);
        assert_eq!(allocate(&[4, 2], 6), vec![4, 2]);
        assert_eq!(allocate(&[5, 5, 5], 7), vec![3, 2, 2]);
    }

    #[test]
    fn test_split_sizes_and_strata() {
        let y = labels(12, 8);
        let split = StratifiedSplit::new(0.3, 1).split(&y).unwrap();

        assert_eq!(split.train.len(), 14);
        assert_eq!(split.test.len(), 6);
        assert_eq!(count(&y, &split.train, 0.0), 8);
        assert_eq!(count(&y, &split.train, 1.0), 6);
        assert_eq!(count(&y, &split.test, 0.0), 4);
        assert_eq!(count(&y, &split.test, 1.0), 2);
    }

    #[test]
    fn test_split_is_a_partition() {
        let y = labels(70, 30);
        let split = StratifiedSplit::new(0.3, 42).split(&y).unwrap();

        let train: HashSet<usize> = split.train.iter().copied().collect();
        let test: HashSet<usize> = split.test.iter().copied().collect();
        assert!(train.is_disjoint(&test));
        assert_eq!(train.len() + test.len(), 100);
        assert_eq!(count(&y, &split.test, 1.0), 9);
    }

    #[test]
    fn test_split_deterministic_for_seed() {
        let y = labels(30, 20);
        let a = StratifiedSplit::new(0.3, 1).split(&y).unwrap();
        let b = StratifiedSplit::new(0.3, 1).split(&y).unwrap();
        let c = StratifiedSplit::new(0.3, 2).split(&y).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_split_rejects_singleton_class() {
        let y = Array1::from(vec![0.0, 0.0, 0.0, 0.0, 1.0]);
        let err = StratifiedSplit::new(0.3, 1).split(&y).unwrap_err();
        assert!(matches!(err, PrepError::SplitError(_)));
    }

    #[test]
    fn test_split_rejects_tiny_test_partition() {
        // ceil(0.1 * 6) = 1 test row for 2 classes
        let y = labels(3, 3);
        assert!(StratifiedSplit::new(0.1, 1).split(&y).is_err());
    }
}
