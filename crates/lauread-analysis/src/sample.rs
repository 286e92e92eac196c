//! Training samples assembled from chart/replay pairs.
//!
//! A [`TrainingSample`] joins the [`FeatureVector`] of one chart note with the
//! [`TargetOffsetPair`] measured for it in a replay. A training corpus is the
//! concatenation of the samples of every pair, in pair order.
//!
//! ```text
//! ReplayPair { chart, keystrokes }
//!     ├─► FeatureBuilder ─► features ─┐
//!     └─► TargetBuilder  ─► targets  ─┴─► TrainingSample per note
//! ```

use std::iter;

use lauread_core::{Chart, KeyEvent};

use crate::{
    feature_builder::{FeatureBuilder, FeatureVector},
    target_builder::{TargetBuilder, TargetError, TargetOffsetPair},
};

/// A chart together with the keystrokes a player produced on it.
#[derive(Debug, Clone)]
pub struct ReplayPair {
    /// Label used in diagnostics, typically the shared file stem.
    pub name: String,
    pub chart: Chart,
    /// Keystrokes sorted by press time.
    pub keystrokes: Vec<KeyEvent>,
}

/// One observation: note features and the offsets the player produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainingSample {
    pub features: FeatureVector,
    pub target: TargetOffsetPair,
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum CorpusError {
    #[display("{name}: {source}")]
    Target { name: String, source: TargetError },
    #[display("no training samples in {pairs} chart/replay pairs")]
    Empty { pairs: usize },
}

impl TrainingSample {
    /// Builds the samples of one pair, one per chart note.
    pub fn from_pair(pair: &ReplayPair) -> Result<Vec<Self>, TargetError> {
        let features = FeatureBuilder::new().build(&pair.chart);
        let targets = TargetBuilder.build(&pair.chart.notes, &pair.keystrokes)?;
        Ok(iter::zip(features, targets)
            .map(|(features, target)| Self { features, target })
            .collect())
    }

    /// Builds the samples of every pair.
    ///
    /// Pairs whose chart has no notes are skipped with a warning. A pair
    /// without keystrokes is an error, and so is a corpus that ends up empty.
    ///
    /// # Example
    ///
    /// ```
    /// use lauread_analysis::sample::{ReplayPair, TrainingSample};
    /// use lauread_core::{Chart, KeyEvent, KeyId, Note};
    ///
    /// let pair = ReplayPair {
    ///     name: "song".to_owned(),
    ///     chart: Chart {
    ///         overall_difficulty: 8.0,
    ///         notes: vec![Note { column: 2, timestamp: 500, note_type: 1 }],
    ///     },
    ///     keystrokes: vec![KeyEvent::new(512, KeyId::new(3).unwrap(), 580)],
    /// };
    /// let samples = TrainingSample::from_pairs(&[pair]).unwrap();
    /// assert_eq!(samples.len(), 1);
    /// assert_eq!(samples[0].target.hit_offset, 12);
    /// assert_eq!(samples[0].target.release_offset, 68);
    /// ```
    pub fn from_pairs(pairs: &[ReplayPair]) -> Result<Vec<Self>, CorpusError> {
        let mut samples = vec![];
        for pair in pairs {
            if pair.chart.notes.is_empty() {
                tracing::warn!(pair = %pair.name, "chart has no notes, skipping");
                continue;
            }
            let pair_samples = Self::from_pair(pair).map_err(|source| CorpusError::Target {
                name: pair.name.clone(),
                source,
            })?;
            tracing::debug!(pair = %pair.name, samples = pair_samples.len(), "collected samples");
            samples.extend(pair_samples);
        }
        if samples.is_empty() {
            return Err(CorpusError::Empty { pairs: pairs.len() });
        }
        Ok(samples)
    }

    /// The feature values of this sample, in [`FeatureVector::NAMES`] order.
    #[must_use]
    pub fn feature_values(&self) -> [f64; FeatureVector::COUNT] {
        self.features.values()
    }
}
