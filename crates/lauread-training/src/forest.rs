//! Random forest regression.
//!
//! A [`RandomForest`] averages many [`RegressionTree`]s, each fitted on a
//! bootstrap sample (rows drawn with replacement, as many as the data set
//! holds) of the training data.
//!
//! # Determinism
//!
//! Tree `i` draws its bootstrap sample from its own [`Pcg32`] stream, seeded
//! with the forest seed and stream `i`. Fitting the same data with the same
//! [`ForestParams`] always yields the same forest, independent of how many
//! trees are fitted or in which order.

use rand::Rng as _;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::tree::{self, FitError, RegressionTree, TreeParams};

/// Random forest hyperparameters.
///
/// The defaults are 100 trees, seed 42, unlimited depth, one sample per leaf
/// and two samples to split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct ForestParams {
    pub n_trees: usize,
    pub seed: u64,
    pub max_depth: Option<usize>,
    pub min_samples_leaf: usize,
    pub min_samples_split: usize,
}

impl Default for ForestParams {
    fn default() -> Self {
        let tree = TreeParams::default();
        Self {
            n_trees: 100,
            seed: 42,
            max_depth: tree.max_depth,
            min_samples_leaf: tree.min_samples_leaf,
            min_samples_split: tree.min_samples_split,
        }
    }
}

impl ForestParams {
    #[must_use]
    pub fn tree_params(&self) -> TreeParams {
        TreeParams {
            max_depth: self.max_depth,
            min_samples_leaf: self.min_samples_leaf,
            min_samples_split: self.min_samples_split,
        }
    }

    fn tree_rng(&self, tree_index: usize) -> Pcg32 {
        Pcg32::new(self.seed, tree_index as u64)
    }
}

/// A fitted random forest.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RandomForest {
    n_features: usize,
    trees: Vec<RegressionTree>,
}

impl RandomForest {
    /// Fits a forest on rows `x` with targets `y`.
    ///
    /// # Example
    ///
    /// ```
    /// use lauread_training::{ForestParams, RandomForest};
    ///
    /// let x: Vec<[f64; 1]> = (0..40).map(|i| [f64::from(i)]).collect();
    /// let y: Vec<f64> = (0..40).map(|i| if i < 20 { 0.0 } else { 10.0 }).collect();
    /// let params = ForestParams { n_trees: 10, ..ForestParams::default() };
    /// let forest = RandomForest::fit(&x, &y, &params).unwrap();
    /// assert_eq!(forest.tree_count(), 10);
    /// assert!(forest.predict(&[2.0]) < 1.0);
    /// assert!(forest.predict(&[37.0]) > 9.0);
    /// ```
    pub fn fit<R>(x: &[R], y: &[f64], params: &ForestParams) -> Result<Self, FitError>
    where
        R: AsRef<[f64]>,
    {
        if params.n_trees < 1 {
            return Err(FitError::InvalidParam {
                name: "n_trees",
                min: 1,
                value: params.n_trees,
            });
        }
        let tree_params = params.tree_params();
        tree_params.validate()?;
        let n_features = tree::check_data(x, y)?;

        let n = x.len();
        let trees = (0..params.n_trees)
            .map(|tree_index| {
                let mut rng = params.tree_rng(tree_index);
                let bootstrap = (0..n).map(|_| rng.random_range(0..n)).collect();
                RegressionTree::fit_rows(x, y, bootstrap, n_features, &tree_params)
            })
            .collect();

        tracing::debug!(
            trees = params.n_trees,
            rows = n,
            features = n_features,
            "fitted random forest"
        );
        Ok(Self { n_features, trees })
    }

    /// Number of features the forest was fitted on.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    #[must_use]
    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }

    /// Mean prediction of all trees.
    ///
    /// The row must have [`n_features`](Self::n_features) features.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn predict(&self, row: &[f64]) -> f64 {
        debug_assert_eq!(row.len(), self.n_features);
        let sum: f64 = self.trees.iter().map(|tree| tree.predict(row)).sum();
        sum / self.trees.len() as f64
    }

    /// Predicts every row.
    #[must_use]
    pub fn predict_all<R>(&self, rows: &[R]) -> Vec<f64>
    where
        R: AsRef<[f64]>,
    {
        rows.iter().map(|row| self.predict(row.as_ref())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data() -> (Vec<[f64; 2]>, Vec<f64>) {
        let x: Vec<[f64; 2]> = (0..60)
            .map(|i| [f64::from(i % 7), f64::from(i)])
            .collect();
        let y = x.iter().map(|r| 3.0 * r[0] - 0.5 * r[1]).collect();
        (x, y)
    }

    #[test]
    fn test_default_params() {
        let params = ForestParams::default();
        assert_eq!(params.n_trees, 100);
        assert_eq!(params.seed, 42);
        assert_eq!(params.max_depth, None);
        assert_eq!(params.min_samples_leaf, 1);
        assert_eq!(params.min_samples_split, 2);
    }

    #[test]
    fn test_same_seed_same_forest() {
        let (x, y) = data();
        let params = ForestParams {
            n_trees: 8,
            ..ForestParams::default()
        };
        let a = RandomForest::fit(&x, &y, &params).unwrap();
        let b = RandomForest::fit(&x, &y, &params).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_trees_independent_of_forest_size() {
        let (x, y) = data();
        let small = RandomForest::fit(
            &x,
            &y,
            &ForestParams {
                n_trees: 3,
                ..ForestParams::default()
            },
        )
        .unwrap();
        let large = RandomForest::fit(
            &x,
            &y,
            &ForestParams {
                n_trees: 6,
                ..ForestParams::default()
            },
        )
        .unwrap();
        assert_eq!(small.trees[..], large.trees[..3]);
    }

    #[test]
    fn test_different_seed_different_trees() {
        let (x, y) = data();
        let a = RandomForest::fit(&x, &y, &ForestParams::default()).unwrap();
        let b = RandomForest::fit(
            &x,
            &y,
            &ForestParams {
                seed: 7,
                ..ForestParams::default()
            },
        )
        .unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_prediction_is_tree_mean() {
        let (x, y) = data();
        let forest = RandomForest::fit(
            &x,
            &y,
            &ForestParams {
                n_trees: 4,
                ..ForestParams::default()
            },
        )
        .unwrap();
        let row = [2.0, 10.0];
        let mean = forest.trees.iter().map(|t| t.predict(&row)).sum::<f64>() / 4.0;
        assert_eq!(forest.predict(&row), mean);
        assert_eq!(forest.predict_all(&[row]), vec![mean]);
    }

    #[test]
    fn test_constant_target() {
        let x = [[1.0], [2.0], [3.0]];
        let y = [42.0, 42.0, 42.0];
        let forest = RandomForest::fit(&x, &y, &ForestParams::default()).unwrap();
        assert_eq!(forest.predict(&[10.0]), 42.0);
    }

    #[test]
    fn test_invalid_params() {
        let params = ForestParams {
            n_trees: 0,
            ..ForestParams::default()
        };
        assert!(matches!(
            RandomForest::fit(&[[1.0]], &[1.0], &params),
            Err(FitError::InvalidParam { name: "n_trees", .. })
        ));
    }

    #[test]
    fn test_serde_roundtrip() {
        let (x, y) = data();
        let forest = RandomForest::fit(
            &x,
            &y,
            &ForestParams {
                n_trees: 2,
                ..ForestParams::default()
            },
        )
        .unwrap();
        let json = serde_json::to_string(&forest).unwrap();
        let restored: RandomForest = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, forest);
    }
}
