//! Offset model training and synthetic keystroke prediction.
//!
//! This crate learns how a player's keystrokes deviate from chart notes and
//! uses that to generate plausible keystrokes for charts the player never
//! played.
//!
//! # How Training Works
//!
//! 1. **Corpus** - Feature rows and offset targets from
//!    [`lauread_analysis::sample::TrainingSample`]
//! 2. **Diagnostic split** - A seeded 80/20 split ([`split`]) trains a
//!    throwaway model and reports its R² score on the held-out part
//! 3. **Standardization** - A [`StandardScaler`] is fitted on all rows
//! 4. **Regression** - Two [`RandomForest`]s with identical parameters learn
//!    the hit offset and the release offset
//!
//! The scaler and both forests form an [`OffsetModel`], which is what gets
//! persisted.
//!
//! # Architecture
//!
//! ```text
//! TrainingSample[]
//!     ↓
//! Trainer ──► split ──► OffsetModel (80 %) ──► R² on 20 %
//!     ↓
//! OffsetModel (100 %)
//!     ↓ used by
//! Predictor ──► SyntheticKeystroke per note ──► offset file
//! ```
//!
//! # Example
//!
//! ```
//! use lauread_analysis::sample::{ReplayPair, TrainingSample};
//! use lauread_core::{Chart, KeyEvent, KeyId, Note};
//! use lauread_training::{ForestParams, Predictor, Trainer, TrainerConfig};
//!
//! let notes: Vec<Note> = (0..20i64)
//!     .map(|i| Note { column: (i % 7) as u8, timestamp: 500 + i * 250, note_type: 1 })
//!     .collect();
//! let key = KeyId::new(1).unwrap();
//! let keystrokes = notes
//!     .iter()
//!     .map(|n| KeyEvent::new(n.timestamp + 8, key, n.timestamp + 90))
//!     .collect();
//! let pair = ReplayPair {
//!     name: "song".to_owned(),
//!     chart: Chart { overall_difficulty: 8.0, notes },
//!     keystrokes,
//! };
//! let samples = TrainingSample::from_pairs(&[pair.clone()]).unwrap();
//!
//! let config = TrainerConfig {
//!     forest: ForestParams { n_trees: 5, ..ForestParams::default() },
//!     ..TrainerConfig::default()
//! };
//! let (model, report) = Trainer::new(config).train(&samples).unwrap();
//! assert_eq!(report.samples, 20);
//!
//! let predicted = Predictor::new(&model).unwrap().predict(&pair.chart);
//! assert_eq!(predicted[0].keypress_time, 508);
//! assert_eq!(predicted[0].release_time, 590);
//! ```
//!
//! # Current Limitations
//!
//! - **Per-note independence**: every note is predicted on its own, so
//!   synthetic keystrokes on one key may overlap
//! - **Single-threaded**: trees are fitted one after another

pub use self::{
    forest::{ForestParams, RandomForest},
    predictor::{Predictor, SyntheticKeystroke},
    trainer::{OffsetModel, TrainError, Trainer, TrainerConfig, TrainingReport},
    tree::{FitError, RegressionTree, TreeParams},
};
pub use lauread_analysis::normalization::StandardScaler;

pub mod forest;
pub mod predictor;
pub mod split;
pub mod trainer;
pub mod tree;
