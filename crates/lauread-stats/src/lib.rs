//! Statistical utilities shared by the lauread crates.
//!
//! - **Descriptive statistics**: mean, variance, standard deviation of a column
//! - **Regression metrics**: coefficient of determination (R²) and mean
//!   absolute error for fitted models
//!
//! # Modules
//!
//! - [`descriptive`]: Descriptive statistics for summarizing datasets
//! - [`regression`]: Goodness-of-fit scores for regression predictions
//!
//! # Examples
//!
//! ```
//! use lauread_stats::descriptive::DescriptiveStats;
//!
//! let values = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let stats = DescriptiveStats::new(values).unwrap();
//! assert_eq!(stats.mean, 3.0);
//! ```
//!
//! ```
//! use lauread_stats::regression::r2_score;
//!
//! let truth = [1.0, 2.0, 3.0];
//! assert_eq!(r2_score(&truth, &truth), Some(1.0));
//! ```

pub mod descriptive;
pub mod regression;
