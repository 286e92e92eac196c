//! Per-column standardization of feature rows.
//!
//! [`StandardScaler`] maps every column to zero mean and unit variance:
//!
//! ```text
//! z = (x - mean) / scale
//! ```
//!
//! `scale` is the population standard deviation of the column, or `1` when
//! the column is constant. The scaler is fitted once on training rows and
//! then stored alongside the models, so inference applies exactly the same
//! transform.
//!
//! # Example
//!
//! ```
//! use lauread_analysis::normalization::StandardScaler;
//!
//! let rows = [[1.0, 5.0], [3.0, 5.0]];
//! let scaler = StandardScaler::fit(&rows).unwrap();
//! assert_eq!(scaler.transform(&[1.0, 5.0]), vec![-1.0, 0.0]);
//! assert_eq!(scaler.transform(&[3.0, 7.0]), vec![1.0, 2.0]);
//! ```

use std::iter;

use lauread_stats::descriptive::DescriptiveStats;
use serde::{Deserialize, Serialize};

/// Fitted per-column mean and scale.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StandardScaler {
    means: Vec<f64>,
    scales: Vec<f64>,
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ScalerError {
    #[display("cannot fit a scaler without rows")]
    NoRows,
    #[display("row {row} has {found} columns, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
}

impl StandardScaler {
    /// Fits the scaler on a set of equally sized rows.
    pub fn fit<R>(rows: &[R]) -> Result<Self, ScalerError>
    where
        R: AsRef<[f64]>,
    {
        let width = rows.first().ok_or(ScalerError::NoRows)?.as_ref().len();
        if let Some((row, found)) = rows
            .iter()
            .map(|r| r.as_ref().len())
            .enumerate()
            .find(|(_, len)| *len != width)
        {
            return Err(ScalerError::RaggedRow {
                row,
                expected: width,
                found,
            });
        }

        let (means, scales) = (0..width)
            .map(|column| {
                // rows is non-empty, so the column always has values
                let stats = DescriptiveStats::new(rows.iter().map(|r| r.as_ref()[column]))
                    .ok_or(ScalerError::NoRows)?;
                let scale = if stats.std_dev > 0.0 {
                    stats.std_dev
                } else {
                    1.0
                };
                Ok((stats.mean, scale))
            })
            .collect::<Result<(Vec<_>, Vec<_>), ScalerError>>()?;

        Ok(Self { means, scales })
    }

    /// Number of columns the scaler was fitted on.
    #[must_use]
    pub fn width(&self) -> usize {
        self.means.len()
    }

    #[must_use]
    pub fn means(&self) -> &[f64] {
        &self.means
    }

    #[must_use]
    pub fn scales(&self) -> &[f64] {
        &self.scales
    }

    /// Standardizes one row.
    ///
    /// Columns beyond [`width`](Self::width) are ignored.
    #[must_use]
    pub fn transform(&self, row: &[f64]) -> Vec<f64> {
        debug_assert_eq!(row.len(), self.width());
        iter::zip(row, iter::zip(&self.means, &self.scales))
            .map(|(value, (mean, scale))| (value - mean) / scale)
            .collect()
    }

    /// Standardizes every row.
    #[must_use]
    pub fn transform_all<R>(&self, rows: &[R]) -> Vec<Vec<f64>>
    where
        R: AsRef<[f64]>,
    {
        rows.iter().map(|row| self.transform(row.as_ref())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_mean_and_population_std() {
        let rows = [[2.0], [4.0], [4.0], [4.0], [5.0], [5.0], [7.0], [9.0]];
        let scaler = StandardScaler::fit(&rows).unwrap();
        assert_eq!(scaler.means(), &[5.0]);
        assert_eq!(scaler.scales(), &[2.0]);
        assert_eq!(scaler.transform(&[9.0]), vec![2.0]);
    }

    #[test]
    fn test_constant_column_uses_unit_scale() {
        let rows = [[3.0, 1.0], [3.0, 2.0]];
        let scaler = StandardScaler::fit(&rows).unwrap();
        assert_eq!(scaler.scales()[0], 1.0);
        assert_eq!(scaler.transform(&[3.0, 1.5]), vec![0.0, 0.0]);
        assert_eq!(scaler.transform(&[5.0, 1.5]), vec![2.0, 0.0]);
    }

    #[test]
    fn test_transformed_columns_are_standardized() {
        let rows: Vec<Vec<f64>> = (0..50)
            .map(|i| vec![f64::from(i), f64::from(i * i) / 7.0])
            .collect();
        let scaler = StandardScaler::fit(&rows).unwrap();
        let scaled = scaler.transform_all(&rows);
        for column in 0..2 {
            let stats = DescriptiveStats::new(scaled.iter().map(|r| r[column])).unwrap();
            assert!(stats.mean.abs() < 1e-9);
            assert!((stats.std_dev - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_fit_errors() {
        let empty: [[f64; 2]; 0] = [];
        assert!(matches!(
            StandardScaler::fit(&empty),
            Err(ScalerError::NoRows)
        ));

        let ragged = vec![vec![1.0, 2.0], vec![1.0]];
        assert!(matches!(
            StandardScaler::fit(&ragged),
            Err(ScalerError::RaggedRow {
                row: 1,
                expected: 2,
                found: 1
            })
        ));
    }

    #[test]
    fn test_serde_roundtrip() {
        let scaler = StandardScaler::fit(&[[1.0, 10.0], [3.0, 30.0]]).unwrap();
        let json = serde_json::to_string(&scaler).unwrap();
        let restored: StandardScaler = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, scaler);
    }
}
