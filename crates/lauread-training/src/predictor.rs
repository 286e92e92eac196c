//! Synthetic keystrokes for unseen charts.
//!
//! For every chart note the [`OffsetModel`] predicts a hit offset and a
//! release offset. Both are clamped to plausible ranges before they become
//! keystroke times:
//!
//! | offset           | range (ms)      |
//! |------------------|-----------------|
//! | hit offset       | `[-200, 200]`   |
//! | release offset   | `[20, 200]`     |
//!
//! ```text
//! keypress_time = trunc(timestamp + hit_offset)
//! release_time  = trunc(keypress_time + release_offset)
//! ```
//!
//! The resulting offset file has one `keypress_time,column,release_time`
//! line per note, in chart order. [`parse_offsets`] reads such a file back,
//! raising any release time that precedes its press time to the press time.

use std::{fmt, io, str::FromStr};

use lauread_analysis::feature_builder::{FeatureBuilder, FeatureVector};
use lauread_core::Chart;

use crate::trainer::OffsetModel;

pub const MIN_HIT_OFFSET: f64 = -200.0;
pub const MAX_HIT_OFFSET: f64 = 200.0;
pub const MIN_RELEASE_OFFSET: f64 = 20.0;
pub const MAX_RELEASE_OFFSET: f64 = 200.0;

/// A generated keystroke for one chart note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SyntheticKeystroke {
    pub keypress_time: i64,
    /// Lane index in `0..7`.
    pub column: u8,
    pub release_time: i64,
}

impl SyntheticKeystroke {
    /// Turns raw predicted offsets into a keystroke for a note at `timestamp`.
    ///
    /// ```
    /// use lauread_training::SyntheticKeystroke;
    ///
    /// let k = SyntheticKeystroke::from_offsets(1000, 2, 12.7, -50.0);
    /// assert_eq!(k.keypress_time, 1012);
    /// assert_eq!(k.release_time, 1032);
    ///
    /// let k = SyntheticKeystroke::from_offsets(1000, 2, -480.0, 75.9);
    /// assert_eq!(k.keypress_time, 800);
    /// assert_eq!(k.release_time, 875);
    /// ```
    #[expect(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_offsets(timestamp: i64, column: u8, hit_offset: f64, release_offset: f64) -> Self {
        let hit_offset = hit_offset.clamp(MIN_HIT_OFFSET, MAX_HIT_OFFSET);
        let release_offset = release_offset.clamp(MIN_RELEASE_OFFSET, MAX_RELEASE_OFFSET);
        let keypress_time = (timestamp as f64 + hit_offset) as i64;
        let release_time = (keypress_time as f64 + release_offset) as i64;
        Self {
            keypress_time,
            column,
            release_time,
        }
    }
}

impl fmt::Display for SyntheticKeystroke {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{}",
            self.keypress_time, self.column, self.release_time
        )
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum OffsetParseError {
    #[display("line {line}: expected 'keypress_time,column,release_time', found '{text}'")]
    Malformed { line: usize, text: String },
}

impl FromStr for SyntheticKeystroke {
    type Err = OffsetParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || OffsetParseError::Malformed {
            line: 0,
            text: s.to_owned(),
        };
        let mut fields = s.split(',').map(str::trim);
        let (Some(press), Some(column), Some(release), None) =
            (fields.next(), fields.next(), fields.next(), fields.next())
        else {
            return Err(malformed());
        };
        let keypress_time: i64 = press.parse().map_err(|_| malformed())?;
        let release_time: i64 = release.parse().map_err(|_| malformed())?;
        Ok(Self {
            keypress_time,
            column: column.parse().map_err(|_| malformed())?,
            release_time: release_time.max(keypress_time),
        })
    }
}

/// Parses an offset file, skipping blank lines.
///
/// ```
/// use lauread_training::predictor::parse_offsets;
///
/// let keystrokes = parse_offsets("105,0,165\n\n245,4,200\n").unwrap();
/// assert_eq!(keystrokes[0].to_string(), "105,0,165");
/// // release times never precede press times
/// assert_eq!(keystrokes[1].release_time, 245);
/// ```
pub fn parse_offsets(text: &str) -> Result<Vec<SyntheticKeystroke>, OffsetParseError> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            line.parse().map_err(|OffsetParseError::Malformed { text, .. }| {
                OffsetParseError::Malformed {
                    line: index + 1,
                    text,
                }
            })
        })
        .collect()
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum PredictError {
    #[display("model expects {found} features per note, this build produces {expected}")]
    FeatureCountMismatch { expected: usize, found: usize },
    #[display("model scaler and regressors disagree on the feature count")]
    InconsistentModel,
}

/// Generates synthetic keystrokes with a fitted [`OffsetModel`].
#[derive(Debug, Clone, Copy)]
pub struct Predictor<'a> {
    model: &'a OffsetModel,
}

impl<'a> Predictor<'a> {
    /// Wraps a model after checking it matches [`FeatureVector`].
    pub fn new(model: &'a OffsetModel) -> Result<Self, PredictError> {
        if !model.is_consistent() {
            return Err(PredictError::InconsistentModel);
        }
        if model.n_features() != FeatureVector::COUNT {
            return Err(PredictError::FeatureCountMismatch {
                expected: FeatureVector::COUNT,
                found: model.n_features(),
            });
        }
        Ok(Self { model })
    }

    /// Predicts one keystroke per chart note, in chart order.
    #[must_use]
    pub fn predict(&self, chart: &Chart) -> Vec<SyntheticKeystroke> {
        let features = FeatureBuilder::new().build(chart);
        let keystrokes: Vec<_> = chart
            .notes
            .iter()
            .zip(&features)
            .map(|(note, features)| {
                let offsets = self.model.predict(&features.values());
                SyntheticKeystroke::from_offsets(
                    note.timestamp,
                    note.column,
                    offsets.hit_offset,
                    offsets.release_offset,
                )
            })
            .collect();
        tracing::debug!(notes = keystrokes.len(), "predicted synthetic keystrokes");
        keystrokes
    }
}

/// Writes keystrokes as offset file lines.
pub fn write_offsets<W>(mut writer: W, keystrokes: &[SyntheticKeystroke]) -> io::Result<()>
where
    W: io::Write,
{
    for keystroke in keystrokes {
        writeln!(writer, "{keystroke}")?;
    }
    writer.flush()
}
