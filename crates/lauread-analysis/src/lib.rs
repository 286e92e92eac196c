//! Feature engineering and training targets for keystroke offset models.
//!
//! This crate converts charts and reconstructed keystrokes into the numeric
//! data the regression models in `lauread-training` learn from.
//!
//! # Workflow
//!
//! ```text
//! Chart ──────────────► FeatureBuilder ──► FeatureVector per note
//!   │                                             │
//!   └─► notes ─┐                                  ▼
//!              ├──► TargetBuilder ──► TargetOffsetPair per note
//! KeyEvents ───┘                                  │
//!                                                 ▼
//!                              TrainingSample (features + target)
//!                                                 │
//!                                                 ▼
//!                              StandardScaler (fit on training rows)
//! ```
//!
//! 1. **Features** ([`feature_builder::FeatureBuilder`]): per-note attributes
//!    such as column, gaps to neighbouring notes and chart difficulty
//! 2. **Targets** ([`target_builder::TargetBuilder`]): hit and release offsets
//!    of the keystroke nearest to each note
//! 3. **Samples** ([`sample::TrainingSample`]): features and targets joined
//!    over a whole corpus of chart/replay pairs
//! 4. **Standardization** ([`normalization::StandardScaler`]): zero-mean,
//!    unit-variance scaling fitted once and reused at inference
//!
//! # Current Limitations
//!
//! - **Many-to-one targets**: one keystroke can be the nearest match for
//!   several notes, so its offsets are counted more than once. Notes are not
//!   assigned to keystrokes one-to-one.
//! - **No column awareness in matching**: the nearest keystroke is chosen by
//!   time alone, regardless of which key was pressed.

pub mod feature_builder;
pub mod normalization;
pub mod sample;
pub mod target_builder;
