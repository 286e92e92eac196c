//! Goodness-of-fit metrics for regression models.

use crate::descriptive;

/// Coefficient of determination (R²) of `predicted` against `truth`.
///
/// `R² = 1 - SS_res / SS_tot`. When the truth is constant (`SS_tot == 0`)
/// the score is `1.0` for a perfect prediction and `0.0` otherwise.
///
/// # Returns
///
/// `None` if the slices are empty or have different lengths.
///
/// # Examples
///
/// ```
/// use lauread_stats::regression::r2_score;
///
/// let truth = [3.0, -0.5, 2.0, 7.0];
/// let predicted = [2.5, 0.0, 2.0, 8.0];
/// let r2 = r2_score(&truth, &predicted).unwrap();
/// assert!((r2 - 0.948_608_137).abs() < 1e-6);
/// ```
#[must_use]
pub fn r2_score(truth: &[f64], predicted: &[f64]) -> Option<f64> {
    if truth.len() != predicted.len() {
        return None;
    }
    let mean = descriptive::mean(truth)?;
    let ss_res = truth
        .iter()
        .zip(predicted)
        .map(|(t, p)| (t - p).powi(2))
        .sum::<f64>();
    let ss_tot = truth.iter().map(|t| (t - mean).powi(2)).sum::<f64>();
    if ss_tot == 0.0 {
        return Some(if ss_res == 0.0 { 1.0 } else { 0.0 });
    }
    Some(1.0 - ss_res / ss_tot)
}

/// Mean absolute error of `predicted` against `truth`.
///
/// Returns `None` if the slices are empty or have different lengths.
#[must_use]
pub fn mean_absolute_error(truth: &[f64], predicted: &[f64]) -> Option<f64> {
    if truth.len() != predicted.len() {
        return None;
    }
    let errors = truth
        .iter()
        .zip(predicted)
        .map(|(t, p)| (t - p).abs())
        .collect::<Vec<_>>();
    descriptive::mean(&errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_prediction() {
        let truth = [1.0, 5.0, 9.0];
        assert_eq!(r2_score(&truth, &truth), Some(1.0));
        assert_eq!(mean_absolute_error(&truth, &truth), Some(0.0));
    }

    #[test]
    fn test_mean_prediction_scores_zero() {
        let truth = [1.0, 2.0, 3.0];
        let predicted = [2.0, 2.0, 2.0];
        assert_eq!(r2_score(&truth, &predicted), Some(0.0));
    }

    #[test]
    fn test_constant_truth() {
        let truth = [4.0, 4.0];
        assert_eq!(r2_score(&truth, &[4.0, 4.0]), Some(1.0));
        assert_eq!(r2_score(&truth, &[3.0, 4.0]), Some(0.0));
    }

    #[test]
    fn test_mismatched_or_empty() {
        assert_eq!(r2_score(&[1.0], &[1.0, 2.0]), None);
        assert_eq!(r2_score(&[], &[]), None);
        assert_eq!(mean_absolute_error(&[], &[]), None);
    }
}
