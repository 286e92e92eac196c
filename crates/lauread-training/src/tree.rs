//! CART regression trees.
//!
//! A [`RegressionTree`] recursively partitions feature space with
//! axis-aligned splits `x[feature] <= threshold`. Every split is the one that
//! minimizes the summed squared error of the two children (maximum variance
//! reduction), with the threshold placed halfway between the two neighbouring
//! distinct values. Leaves predict the mean target of their training rows.
//!
//! # Stopping Rules
//!
//! A node becomes a leaf when any of these hold:
//!
//! - it is at [`TreeParams::max_depth`]
//! - it has fewer than [`TreeParams::min_samples_split`] rows
//! - all of its targets are equal
//! - no split leaves at least [`TreeParams::min_samples_leaf`] rows per side
//!
//! Nodes are stored in a flat arena and built with an explicit work stack,
//! so deep trees on long, sorted features do not grow the call stack.

use serde::{Deserialize, Serialize};

/// Growth limits of a single tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct TreeParams {
    /// Maximum depth, `None` for unlimited.
    pub max_depth: Option<usize>,
    /// Minimum rows on each side of a split.
    pub min_samples_leaf: usize,
    /// Minimum rows a node needs before it may be split.
    pub min_samples_split: usize,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_samples_leaf: 1,
            min_samples_split: 2,
        }
    }
}

impl TreeParams {
    pub(crate) fn validate(&self) -> Result<(), FitError> {
        if self.min_samples_leaf < 1 {
            return Err(FitError::InvalidParam {
                name: "min_samples_leaf",
                min: 1,
                value: self.min_samples_leaf,
            });
        }
        if self.min_samples_split < 2 {
            return Err(FitError::InvalidParam {
                name: "min_samples_split",
                min: 2,
                value: self.min_samples_split,
            });
        }
        Ok(())
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum FitError {
    #[display("cannot fit a regressor without rows")]
    NoRows,
    #[display("{rows} feature rows but {targets} targets")]
    LengthMismatch { rows: usize, targets: usize },
    #[display("row {row} has {found} features, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[display("{name} must be at least {min}, got {value}")]
    InvalidParam {
        name: &'static str,
        min: usize,
        value: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// A fitted regression tree.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RegressionTree {
    nodes: Vec<Node>,
}

#[derive(Debug, Clone, Copy)]
struct BestSplit {
    feature: usize,
    threshold: f64,
    sse: f64,
}

struct PendingNode {
    node: usize,
    rows: Vec<usize>,
    depth: usize,
}

/// Checks that `x` and `y` describe a non-empty, rectangular data set and
/// returns its feature count.
pub(crate) fn check_data<R>(x: &[R], y: &[f64]) -> Result<usize, FitError>
where
    R: AsRef<[f64]>,
{
    if x.len() != y.len() {
        return Err(FitError::LengthMismatch {
            rows: x.len(),
            targets: y.len(),
        });
    }
    let width = x.first().ok_or(FitError::NoRows)?.as_ref().len();
    if let Some((row, found)) = x
        .iter()
        .map(|r| r.as_ref().len())
        .enumerate()
        .find(|(_, len)| *len != width)
    {
        return Err(FitError::RaggedRow {
            row,
            expected: width,
            found,
        });
    }
    Ok(width)
}

impl RegressionTree {
    /// Fits a tree on every row of `x`.
    ///
    /// # Example
    ///
    /// ```
    /// use lauread_training::{RegressionTree, TreeParams};
    ///
    /// let x = [[1.0], [2.0], [10.0], [11.0]];
    /// let y = [0.0, 0.0, 5.0, 5.0];
    /// let tree = RegressionTree::fit(&x, &y, &TreeParams::default()).unwrap();
    /// assert_eq!(tree.predict(&[1.5]), 0.0);
    /// assert_eq!(tree.predict(&[6.1]), 5.0);
    /// ```
    pub fn fit<R>(x: &[R], y: &[f64], params: &TreeParams) -> Result<Self, FitError>
    where
        R: AsRef<[f64]>,
    {
        params.validate()?;
        let width = check_data(x, y)?;
        Ok(Self::fit_rows(x, y, (0..x.len()).collect(), width, params))
    }

    /// Fits a tree on the given row indices, which may repeat.
    ///
    /// `x` must be rectangular with `width` columns and `rows` non-empty.
    pub(crate) fn fit_rows<R>(
        x: &[R],
        y: &[f64],
        rows: Vec<usize>,
        width: usize,
        params: &TreeParams,
    ) -> Self
    where
        R: AsRef<[f64]>,
    {
        let mut nodes = vec![Node::Leaf { value: 0.0 }];
        let mut pending = vec![PendingNode {
            node: 0,
            rows,
            depth: 0,
        }];

        while let Some(PendingNode { node, rows, depth }) = pending.pop() {
            let can_split = params.max_depth.is_none_or(|max| depth < max)
                && rows.len() >= params.min_samples_split
                && !is_pure(y, &rows);
            let split = can_split
                .then(|| best_split(x, y, &rows, width, params.min_samples_leaf))
                .flatten();

            let Some(split) = split else {
                nodes[node] = Node::Leaf {
                    value: mean_target(y, &rows),
                };
                continue;
            };

            let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = rows
                .iter()
                .partition(|&&row| x[row].as_ref()[split.feature] <= split.threshold);
            let left = nodes.len();
            let right = left + 1;
            nodes.push(Node::Leaf { value: 0.0 });
            nodes.push(Node::Leaf { value: 0.0 });
            nodes[node] = Node::Split {
                feature: split.feature,
                threshold: split.threshold,
                left,
                right,
            };
            pending.push(PendingNode {
                node: right,
                rows: right_rows,
                depth: depth + 1,
            });
            pending.push(PendingNode {
                node: left,
                rows: left_rows,
                depth: depth + 1,
            });
        }

        Self { nodes }
    }

    /// Predicts the target of one feature row.
    ///
    /// The row must have at least as many features as the training rows.
    #[must_use]
    pub fn predict(&self, row: &[f64]) -> f64 {
        let mut index = 0;
        loop {
            match self.nodes[index] {
                Node::Leaf { value } => return value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => index = if row[feature] <= threshold { left } else { right },
            }
        }
    }

    /// Total number of nodes, leaves included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Length of the longest root-to-leaf path.
    #[must_use]
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack = vec![(0, 0)];
        while let Some((index, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            if let Node::Split { left, right, .. } = self.nodes[index] {
                stack.push((left, depth + 1));
                stack.push((right, depth + 1));
            }
        }
        max_depth
    }
}

#[expect(clippy::float_cmp)]
fn is_pure(y: &[f64], rows: &[usize]) -> bool {
    let first = y[rows[0]];
    rows.iter().all(|&row| y[row] == first)
}

#[expect(clippy::cast_precision_loss)]
fn mean_target(y: &[f64], rows: &[usize]) -> f64 {
    rows.iter().map(|&row| y[row]).sum::<f64>() / rows.len() as f64
}

/// Searches every feature for the split with the lowest summed squared error.
///
/// The first best split found (by feature, then by threshold) wins ties.
#[expect(clippy::cast_precision_loss)]
fn best_split<R>(
    x: &[R],
    y: &[f64],
    rows: &[usize],
    width: usize,
    min_samples_leaf: usize,
) -> Option<BestSplit>
where
    R: AsRef<[f64]>,
{
    let n = rows.len();
    let total_sum: f64 = rows.iter().map(|&row| y[row]).sum();
    let total_sq: f64 = rows.iter().map(|&row| y[row] * y[row]).sum();

    let mut best: Option<BestSplit> = None;
    let mut sorted = rows.to_vec();
    for feature in 0..width {
        let value = |row: usize| x[row].as_ref()[feature];
        sorted.sort_by(|&a, &b| value(a).total_cmp(&value(b)));

        let mut left_sum = 0.0;
        let mut left_sq = 0.0;
        for i in 0..n - 1 {
            let target = y[sorted[i]];
            left_sum += target;
            left_sq += target * target;

            let left_n = i + 1;
            let right_n = n - left_n;
            if left_n < min_samples_leaf || right_n < min_samples_leaf {
                continue;
            }
            let lower = value(sorted[i]);
            let upper = value(sorted[i + 1]);
            if lower >= upper {
                continue;
            }

            let right_sum = total_sum - left_sum;
            let right_sq = total_sq - left_sq;
            let sse = (left_sq - left_sum * left_sum / left_n as f64)
                + (right_sq - right_sum * right_sum / right_n as f64);
            if best.is_none_or(|b| sse < b.sse) {
                best = Some(BestSplit {
                    feature,
                    threshold: midpoint(lower, upper),
                    sse,
                });
            }
        }
    }
    best
}

/// Threshold between two distinct values that keeps `lower` on the left and
/// `upper` on the right even when they are adjacent floats.
fn midpoint(lower: f64, upper: f64) -> f64 {
    let mid = lower + (upper - lower) / 2.0;
    if mid < upper { mid } else { lower }
}
