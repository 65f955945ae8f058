//! Train / held-out split
//!
//! Fixed 80/20 ratio and a fixed seed, so the same input always splits the
//! same way.

use ndarray::{Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Held-out share, in percent
pub const TEST_PERCENT: usize = 20;

pub const SPLIT_SEED: u64 = 42;

/// Scaled features with their targets, row-aligned
#[derive(Debug, Clone, PartialEq)]
pub struct Partition {
    pub features: Array2<f64>,
    pub target: Array1<f64>,
}

impl Partition {
    fn select(x: &Array2<f64>, y: &Array1<f64>, rows: &[usize]) -> Self {
        Self {
            features: x.select(Axis(0), rows),
            target: y.select(Axis(0), rows),
        }
    }

    pub fn len(&self) -> usize {
        self.target.len()
    }

    pub fn is_empty(&self) -> bool {
        self.target.is_empty()
    }
}

/// Number of held-out rows for `n` samples.
///
/// `ceil(n * TEST_PERCENT / 100)`, capped so one training row always remains.
pub fn held_out_len(n: usize) -> usize {
    let len = (n * TEST_PERCENT + 99) / 100;
    if n > 0 && len >= n {
        n - 1
    } else {
        len
    }
}

/// Shuffle row indices with a seeded RNG and cut off the held-out share
pub fn train_test_split(x: &Array2<f64>, y: &Array1<f64>, seed: u64) -> (Partition, Partition) {
    let n = x.nrows();
    let mut order: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    order.shuffle(&mut rng);

    let (test_rows, train_rows) = order.split_at(held_out_len(n));
    (
        Partition::select(x, y, train_rows),
        Partition::select(x, y, test_rows),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(n: usize) -> (Array2<f64>, Array1<f64>) {
        let x = Array2::from_shape_fn((n, 2), |(i, j)| (i * 10 + j) as f64);
        let y = Array1::from_shape_fn(n, |i| i as f64);
        (x, y)
    }

    #[test]
    fn test_held_out_len() {
        assert_eq!(held_out_len(0), 0);
        assert_eq!(held_out_len(1), 0);
        assert_eq!(held_out_len(2), 1);
        assert_eq!(held_out_len(5), 1);
        assert_eq!(held_out_len(10), 2);
        assert_eq!(held_out_len(11), 3);
        assert_eq!(held_out_len(100), 20);
    }

    #[test]
    fn test_split_is_reproducible() {
        let (x, y) = sample(50);
        let first = train_test_split(&x, &y, SPLIT_SEED);
        let second = train_test_split(&x, &y, SPLIT_SEED);
        assert_eq!(first, second);
    }

    #[test]
    fn test_split_partitions_every_row_once() {
        let (x, y) = sample(23);
        let (train, test) = train_test_split(&x, &y, SPLIT_SEED);

        assert_eq!(train.len() + test.len(), 23);
        assert_eq!(test.len(), 5);

        let mut seen: Vec<f64> = train.target.iter().chain(test.target.iter()).copied().collect();
        seen.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let expected: Vec<f64> = (0..23).map(|i| i as f64).collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_rows_stay_aligned_with_targets() {
        let (x, y) = sample(30);
        let (train, _) = train_test_split(&x, &y, SPLIT_SEED);

        for (row, target) in train.features.rows().into_iter().zip(train.target.iter()) {
            assert_eq!(row[0], target * 10.0);
        }
    }
}
