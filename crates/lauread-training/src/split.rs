//! Seeded train/test split of row indices.

use rand::{SeedableRng as _, seq::SliceRandom as _};
use rand_pcg::Pcg32;

/// Row indices of the two parts of a split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainTestSplit {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

impl TrainTestSplit {
    /// Shuffles `0..len` with a seeded RNG and holds out
    /// `ceil(len * test_fraction)` rows for testing.
    ///
    /// `test_fraction` is clamped to `[0, 1]`.
    ///
    /// ```
    /// use lauread_training::split::TrainTestSplit;
    ///
    /// let split = TrainTestSplit::new(10, 0.2, 42);
    /// assert_eq!(split.train.len(), 8);
    /// assert_eq!(split.test.len(), 2);
    /// assert_eq!(split, TrainTestSplit::new(10, 0.2, 42));
    /// ```
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    #[must_use]
    pub fn new(len: usize, test_fraction: f64, seed: u64) -> Self {
        let fraction = test_fraction.clamp(0.0, 1.0);
        let test_len = ((len as f64 * fraction).ceil() as usize).min(len);

        let mut indices: Vec<usize> = (0..len).collect();
        indices.shuffle(&mut Pcg32::seed_from_u64(seed));
        let train = indices.split_off(test_len);
        Self {
            train,
            test: indices,
        }
    }

    /// Whether both parts hold at least one row.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        !self.train.is_empty() && !self.test.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_covers_all_rows() {
        let split = TrainTestSplit::new(101, 0.2, 42);
        assert_eq!(split.test.len(), 21);
        assert_eq!(split.train.len(), 80);
        let mut all: Vec<usize> = split.train.iter().chain(&split.test).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..101).collect::<Vec<_>>());
    }

    #[test]
    fn test_seed_changes_order() {
        let a = TrainTestSplit::new(50, 0.2, 42);
        let b = TrainTestSplit::new(50, 0.2, 43);
        assert_ne!(a, b);
    }

    #[test]
    fn test_tiny_inputs() {
        let one = TrainTestSplit::new(1, 0.2, 42);
        assert_eq!(one.test, vec![0]);
        assert!(one.train.is_empty());
        assert!(!one.is_usable());

        let none = TrainTestSplit::new(0, 0.2, 42);
        assert!(none.train.is_empty() && none.test.is_empty());

        assert!(TrainTestSplit::new(2, 0.2, 42).is_usable());
    }

    #[test]
    fn test_fraction_bounds() {
        assert!(TrainTestSplit::new(10, 0.0, 1).test.is_empty());
        assert_eq!(TrainTestSplit::new(10, 1.0, 1).test.len(), 10);
        assert_eq!(TrainTestSplit::new(10, 3.0, 1).test.len(), 10);
    }
}
