//! Per-note feature vectors.
//!
//! Every note of a chart is described by the same fixed list of numeric
//! features, in the order of [`FeatureVector::NAMES`]:
//!
//! | feature               | value                                               |
//! |-----------------------|-----------------------------------------------------|
//! | `column`              | lane index                                          |
//! | `timestamp`           | note time (ms)                                      |
//! | `note_type`           | raw hit-object type flags                           |
//! | `time_since_last`     | gap to the previous note, `0` for the first note    |
//! | `time_to_next`        | gap to the next note, a placeholder for the last    |
//! | `relative_position`   | `i / N`                                             |
//! | `log_timestamp`       | `ln(1 + timestamp)`                                 |
//! | `overall_difficulty`  | chart difficulty                                    |

use lauread_core::Chart;

/// `time_to_next` value used for the last note of a chart.
pub const DEFAULT_TIME_TO_NEXT: i64 = 1000;

/// Numeric description of one chart note.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    pub column: f64,
    pub timestamp: f64,
    pub note_type: f64,
    pub time_since_last: f64,
    pub time_to_next: f64,
    pub relative_position: f64,
    pub log_timestamp: f64,
    pub overall_difficulty: f64,
}

impl FeatureVector {
    pub const COUNT: usize = 8;

    /// Feature names in [`values`](Self::values) order.
    pub const NAMES: [&'static str; Self::COUNT] = [
        "column",
        "timestamp",
        "note_type",
        "time_since_last",
        "time_to_next",
        "relative_position",
        "log_timestamp",
        "overall_difficulty",
    ];

    /// Feature values in [`NAMES`](Self::NAMES) order.
    #[must_use]
    pub fn values(&self) -> [f64; Self::COUNT] {
        [
            self.column,
            self.timestamp,
            self.note_type,
            self.time_since_last,
            self.time_to_next,
            self.relative_position,
            self.log_timestamp,
            self.overall_difficulty,
        ]
    }
}

/// Builds [`FeatureVector`]s for every note of a chart.
#[derive(Debug, Clone)]
pub struct FeatureBuilder {
    time_to_next_placeholder: i64,
}

impl Default for FeatureBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            time_to_next_placeholder: DEFAULT_TIME_TO_NEXT,
        }
    }

    /// Builds one feature vector per note, in chart order.
    ///
    /// # Example
    ///
    /// ```
    /// use lauread_analysis::feature_builder::FeatureBuilder;
    /// use lauread_core::{Chart, Note};
    ///
    /// let note = |column, timestamp| Note { column, timestamp, note_type: 1 };
    /// let chart = Chart {
    ///     overall_difficulty: 7.0,
    ///     notes: vec![note(0, 100), note(3, 250)],
    /// };
    /// let features = FeatureBuilder::new().build(&chart);
    /// assert_eq!(features[0].time_since_last, 0.0);
    /// assert_eq!(features[0].time_to_next, 150.0);
    /// assert_eq!(features[1].time_since_last, 150.0);
    /// assert_eq!(features[1].time_to_next, 1000.0);
    /// assert_eq!(features[1].relative_position, 0.5);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn build(&self, chart: &Chart) -> Vec<FeatureVector> {
        let notes = &chart.notes;
        let count = notes.len() as f64;
        notes
            .iter()
            .enumerate()
            .map(|(i, note)| {
                let time_since_last = i
                    .checked_sub(1)
                    .map_or(0, |prev| note.timestamp - notes[prev].timestamp);
                let time_to_next = notes
                    .get(i + 1)
                    .map_or(self.time_to_next_placeholder, |next| {
                        next.timestamp - note.timestamp
                    });
                let timestamp = note.timestamp as f64;
                FeatureVector {
                    column: f64::from(note.column),
                    timestamp,
                    note_type: f64::from(note.note_type),
                    time_since_last: time_since_last as f64,
                    time_to_next: time_to_next as f64,
                    relative_position: i as f64 / count,
                    log_timestamp: timestamp.ln_1p(),
                    overall_difficulty: chart.overall_difficulty,
                }
            })
            .collect()
    }
}
