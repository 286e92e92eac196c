//! Fitting offset models on a training corpus.
//!
//! [`Trainer::train`] runs in two stages:
//!
//! 1. **Diagnostic**: a seeded split holds out a fraction of the rows. A
//!    scaler and both forests are fitted on the rest, and their R² on the
//!    held-out rows is reported.
//! 2. **Deployment**: the scaler and both forests are fitted again on all
//!    rows. This is the returned [`OffsetModel`].
//!
//! When the split leaves either part empty the diagnostic is skipped and
//! the scores are `None`.

use lauread_analysis::{
    feature_builder::FeatureVector,
    normalization::{ScalerError, StandardScaler},
    sample::TrainingSample,
};
use lauread_stats::regression;
use serde::{Deserialize, Serialize};

use crate::{
    forest::{ForestParams, RandomForest},
    split::TrainTestSplit,
    tree::FitError,
};

/// Training configuration.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct TrainerConfig {
    /// Parameters shared by the hit and release forests.
    pub forest: ForestParams,
    /// Fraction of rows held out for the R² diagnostic, in `[0, 1)`.
    pub test_fraction: f64,
    pub split_seed: u64,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            forest: ForestParams::default(),
            test_fraction: 0.2,
            split_seed: 42,
        }
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum TrainError {
    #[display("training corpus is empty")]
    #[from(ignore)]
    NoSamples,
    #[display("test fraction must be in [0, 1), got {value}")]
    #[from(ignore)]
    InvalidTestFraction { value: f64 },
    #[display("failed to fit feature scaler: {_0}")]
    Scaler(ScalerError),
    #[display("failed to fit regressor: {_0}")]
    Fit(FitError),
}

/// Raw offsets predicted for one note, before clamping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictedOffsets {
    pub hit_offset: f64,
    pub release_offset: f64,
}

/// The fitted scaler and the two offset regressors.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct OffsetModel {
    pub scaler: StandardScaler,
    pub hit_model: RandomForest,
    pub release_model: RandomForest,
}

impl OffsetModel {
    /// Fits a scaler on `rows`, then both forests on the scaled rows.
    pub fn fit<R>(
        rows: &[R],
        hit_offsets: &[f64],
        release_offsets: &[f64],
        params: &ForestParams,
    ) -> Result<Self, TrainError>
    where
        R: AsRef<[f64]>,
    {
        let scaler = StandardScaler::fit(rows)?;
        let scaled = scaler.transform_all(rows);
        let hit_model = RandomForest::fit(&scaled, hit_offsets, params)?;
        let release_model = RandomForest::fit(&scaled, release_offsets, params)?;
        Ok(Self {
            scaler,
            hit_model,
            release_model,
        })
    }

    /// Number of features the model expects per row.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.scaler.width()
    }

    /// Whether the scaler and both forests agree on `n_features`.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let width = self.scaler.width();
        self.hit_model.n_features() == width && self.release_model.n_features() == width
    }

    /// Predicts raw offsets for one unscaled feature row.
    #[must_use]
    pub fn predict(&self, row: &[f64]) -> PredictedOffsets {
        let scaled = self.scaler.transform(row);
        PredictedOffsets {
            hit_offset: self.hit_model.predict(&scaled),
            release_offset: self.release_model.predict(&scaled),
        }
    }
}

/// Summary of a training run.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct TrainingReport {
    /// Rows in the full corpus.
    pub samples: usize,
    pub train_samples: usize,
    pub test_samples: usize,
    /// Held-out R² of the hit-offset regressor.
    pub hit_r2: Option<f64>,
    /// Held-out R² of the release-offset regressor.
    pub release_r2: Option<f64>,
    /// Held-out mean absolute error (ms) of the hit-offset regressor.
    pub hit_mae: Option<f64>,
    /// Held-out mean absolute error (ms) of the release-offset regressor.
    pub release_mae: Option<f64>,
}

/// Held-out scores of one regressor.
#[derive(Debug, Clone, Copy, Default)]
struct HeldOutScore {
    r2: Option<f64>,
    mae: Option<f64>,
}

impl HeldOutScore {
    fn new(truth: &[f64], predicted: &[f64]) -> Self {
        Self {
            r2: regression::r2_score(truth, predicted),
            mae: regression::mean_absolute_error(truth, predicted),
        }
    }
}

/// Fits [`OffsetModel`]s.
#[derive(Debug, Clone, Default)]
pub struct Trainer {
    config: TrainerConfig,
}

impl Trainer {
    #[must_use]
    pub fn new(config: TrainerConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    /// Trains the deployed model on all samples and reports held-out scores.
    #[expect(clippy::cast_precision_loss)]
    pub fn train(
        &self,
        samples: &[TrainingSample],
    ) -> Result<(OffsetModel, TrainingReport), TrainError> {
        let config = &self.config;
        if !(0.0..1.0).contains(&config.test_fraction) {
            return Err(TrainError::InvalidTestFraction {
                value: config.test_fraction,
            });
        }
        if samples.is_empty() {
            return Err(TrainError::NoSamples);
        }

        let rows: Vec<[f64; FeatureVector::COUNT]> =
            samples.iter().map(TrainingSample::feature_values).collect();
        let hit: Vec<f64> = samples
            .iter()
            .map(|s| s.target.hit_offset as f64)
            .collect();
        let release: Vec<f64> = samples
            .iter()
            .map(|s| s.target.release_offset as f64)
            .collect();

        let split = TrainTestSplit::new(rows.len(), config.test_fraction, config.split_seed);
        tracing::info!(
            samples = rows.len(),
            train = split.train.len(),
            test = split.test.len(),
            "training offset models"
        );

        let (hit_score, release_score) = if split.is_usable() {
            let pick = |values: &[f64], indices: &[usize]| -> Vec<f64> {
                indices.iter().map(|&i| values[i]).collect()
            };
            let train_rows: Vec<_> = split.train.iter().map(|&i| rows[i]).collect();
            let test_rows: Vec<_> = split.test.iter().map(|&i| rows[i]).collect();
            let model = OffsetModel::fit(
                &train_rows,
                &pick(&hit, &split.train),
                &pick(&release, &split.train),
                &config.forest,
            )?;
            let predicted: Vec<PredictedOffsets> =
                test_rows.iter().map(|row| model.predict(row)).collect();
            let hit_pred: Vec<f64> = predicted.iter().map(|p| p.hit_offset).collect();
            let release_pred: Vec<f64> = predicted.iter().map(|p| p.release_offset).collect();
            (
                HeldOutScore::new(&pick(&hit, &split.test), &hit_pred),
                HeldOutScore::new(&pick(&release, &split.test), &release_pred),
            )
        } else {
            tracing::warn!(
                samples = rows.len(),
                "too few samples for a held-out split, skipping evaluation"
            );
            (HeldOutScore::default(), HeldOutScore::default())
        };
        if let (Some(hit_r2), Some(release_r2)) = (hit_score.r2, release_score.r2) {
            tracing::info!(hit_r2, release_r2, "held-out scores");
        }

        let model = OffsetModel::fit(&rows, &hit, &release, &config.forest)?;
        let report = TrainingReport {
            samples: rows.len(),
            train_samples: split.train.len(),
            test_samples: split.test.len(),
            hit_r2: hit_score.r2,
            release_r2: release_score.r2,
            hit_mae: hit_score.mae,
            release_mae: release_score.mae,
        };
        Ok((model, report))
    }
}

#[cfg(test)]
mod tests {
    use lauread_analysis::sample::ReplayPair;
    use lauread_core::{Chart, KeyEvent, KeyId, Note};

    use super::*;

    fn samples(count: i64) -> Vec<TrainingSample> {
        let notes: Vec<Note> = (0..count)
            .map(|i| Note {
                column: u8::try_from(i % 7).unwrap(),
                timestamp: 1000 + i * 150,
                note_type: 1,
            })
            .collect();
        // late on odd lanes, early on even lanes
        let keystrokes = notes
            .iter()
            .map(|n| {
                let hit = if n.column % 2 == 1 { 12 } else { -9 };
                let press = n.timestamp + hit;
                KeyEvent::new(press, KeyId::from_index(n.column.into()), press + 60)
            })
            .collect();
        let pair = ReplayPair {
            name: "pair".to_owned(),
            chart: Chart {
                overall_difficulty: 7.0,
                notes,
            },
            keystrokes,
        };
        TrainingSample::from_pairs(&[pair]).unwrap()
    }

    fn small_config() -> TrainerConfig {
        TrainerConfig {
            forest: ForestParams {
                n_trees: 10,
                ..ForestParams::default()
            },
            ..TrainerConfig::default()
        }
    }

    #[test]
    fn test_default_config() {
        let config = TrainerConfig::default();
        assert_eq!(config.forest, ForestParams::default());
        assert_eq!(config.test_fraction, 0.2);
        assert_eq!(config.split_seed, 42);
    }

    #[test]
    fn test_train_reports_split_and_scores() {
        let samples = samples(70);
        let (model, report) = Trainer::new(small_config()).train(&samples).unwrap();
        assert_eq!(report.samples, 70);
        assert_eq!(report.test_samples, 14);
        assert_eq!(report.train_samples, 56);
        assert!(report.hit_r2.unwrap() > 0.8);
        // constant release offsets are predicted exactly
        assert_eq!(report.release_r2, Some(1.0));
        assert_eq!(report.release_mae, Some(0.0));
        assert!(report.hit_mae.unwrap() < 5.0);
        assert!(model.is_consistent());
        assert_eq!(model.n_features(), FeatureVector::COUNT);
    }

    #[test]
    fn test_deployed_model_learns_offsets() {
        let samples = samples(70);
        let (model, _) = Trainer::new(small_config()).train(&samples).unwrap();
        let odd = samples.iter().find(|s| s.features.column == 3.0).unwrap();
        let even = samples.iter().find(|s| s.features.column == 4.0).unwrap();
        let odd_pred = model.predict(&odd.feature_values());
        let even_pred = model.predict(&even.feature_values());
        assert!((odd_pred.hit_offset - 12.0).abs() < 3.0);
        assert!((even_pred.hit_offset + 9.0).abs() < 3.0);
        assert_eq!(odd_pred.release_offset, 60.0);
    }

    #[test]
    fn test_deterministic() {
        let samples = samples(30);
        let trainer = Trainer::new(small_config());
        let (a, report_a) = trainer.train(&samples).unwrap();
        let (b, report_b) = trainer.train(&samples).unwrap();
        assert_eq!(a, b);
        assert_eq!(report_a, report_b);
    }

    #[test]
    fn test_single_sample_skips_evaluation() {
        let samples = samples(1);
        let (model, report) = Trainer::new(small_config()).train(&samples).unwrap();
        assert_eq!(report.hit_r2, None);
        assert_eq!(report.release_r2, None);
        assert_eq!(report.hit_mae, None);
        assert_eq!(model.predict(&samples[0].feature_values()).hit_offset, -9.0);
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            Trainer::new(small_config()).train(&[]),
            Err(TrainError::NoSamples)
        ));
        let config = TrainerConfig {
            test_fraction: 1.0,
            ..small_config()
        };
        assert!(matches!(
            Trainer::new(config).train(&samples(5)),
            Err(TrainError::InvalidTestFraction { .. })
        ));
        let config = TrainerConfig {
            forest: ForestParams {
                n_trees: 0,
                ..ForestParams::default()
            },
            ..TrainerConfig::default()
        };
        assert!(matches!(
            Trainer::new(config).train(&samples(5)),
            Err(TrainError::Fit(FitError::InvalidParam { .. }))
        ));
    }

    #[test]
    fn test_model_serde_roundtrip() {
        let (model, _) = Trainer::new(small_config()).train(&samples(12)).unwrap();
        let json = serde_json::to_string(&model).unwrap();
        let restored: OffsetModel = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, model);
    }
}
