//! Chart (beatmap) reading.
//!
//! A chart file is an INI-like text document split into `[Section]` blocks.
//! Two sections matter here:
//!
//! - `[Difficulty]`: the `OverallDifficulty` scalar that scales timing windows
//! - `[HitObjects]`: one CSV line per note, `x,y,time,type,...`
//!
//! The lane a note belongs to is encoded in its x coordinate; see
//! [`column_from_x`].

use std::{num::ParseFloatError, str::FromStr};

/// Number of lanes a chart can use.
pub const COLUMN_COUNT: u8 = 7;

const COLUMN_ORIGIN_X: i64 = 36;
const COLUMN_WIDTH_X: i64 = 73;

/// A single chart note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Note {
    /// Lane index in `0..7`.
    pub column: u8,
    /// Time (ms) at which the note should be hit.
    pub timestamp: i64,
    /// Raw hit-object type flags.
    pub note_type: u32,
}

/// A parsed chart: notes sorted by timestamp plus the overall difficulty.
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub overall_difficulty: f64,
    pub notes: Vec<Note>,
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ChartParseError {
    #[display("missing OverallDifficulty in [Difficulty] section")]
    MissingOverallDifficulty,
    #[display("invalid OverallDifficulty value '{value}': {error}")]
    InvalidOverallDifficulty {
        value: String,
        #[error(source)]
        error: ParseFloatError,
    },
    #[display("line {line}: invalid {field} '{value}' in hit object")]
    InvalidHitObjectField {
        line: usize,
        field: &'static str,
        value: String,
    },
    #[display("line {line}: x coordinate {x} maps outside columns 0..7")]
    ColumnOutOfRange { line: usize, x: i64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Difficulty,
    HitObjects,
    Other,
}

/// Maps a hit-object x coordinate to its lane.
///
/// `column = (x - 36) div 73` with floor division; `None` outside `0..7`.
///
/// ```
/// use lauread_core::chart::column_from_x;
///
/// assert_eq!(column_from_x(36), Some(0));
/// assert_eq!(column_from_x(109), Some(1));
/// assert_eq!(column_from_x(475), Some(6));
/// assert_eq!(column_from_x(0), None);
/// assert_eq!(column_from_x(548), None);
/// ```
#[must_use]
pub fn column_from_x(x: i64) -> Option<u8> {
    let column = (x - COLUMN_ORIGIN_X).div_euclid(COLUMN_WIDTH_X);
    u8::try_from(column).ok().filter(|c| *c < COLUMN_COUNT)
}

impl Chart {
    /// Parses a chart document.
    ///
    /// Hit-object lines with fewer than four fields are skipped. Notes are
    /// stably sorted by timestamp.
    ///
    /// # Example
    ///
    /// ```
    /// use lauread_core::Chart;
    ///
    /// let chart = Chart::parse(
    ///     "[Difficulty]\nOverallDifficulty:8\n\n[HitObjects]\n109,192,500,1,0\n36,192,250,1,0\n",
    /// )
    /// .unwrap();
    /// assert_eq!(chart.overall_difficulty, 8.0);
    /// assert_eq!(chart.timestamps().collect::<Vec<_>>(), vec![250, 500]);
    /// assert_eq!(chart.notes[1].column, 1);
    /// ```
    pub fn parse(text: &str) -> Result<Self, ChartParseError> {
        let mut section = Section::Other;
        let mut overall_difficulty = None;
        let mut notes = vec![];

        for (index, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.starts_with('[') && line.ends_with(']') {
                section = match &line[1..line.len() - 1] {
                    "Difficulty" => Section::Difficulty,
                    "HitObjects" => Section::HitObjects,
                    _ => Section::Other,
                };
                continue;
            }
            if line.is_empty() {
                continue;
            }
            match section {
                Section::Difficulty => {
                    if let Some(("OverallDifficulty", value)) =
                        line.split_once(':').map(|(k, v)| (k.trim(), v.trim()))
                    {
                        let od = value.parse::<f64>().map_err(|error| {
                            ChartParseError::InvalidOverallDifficulty {
                                value: value.to_owned(),
                                error,
                            }
                        })?;
                        overall_difficulty = Some(od);
                    }
                }
                Section::HitObjects => {
                    if let Some(note) = parse_hit_object(index + 1, line)? {
                        notes.push(note);
                    }
                }
                Section::Other => {}
            }
        }

        let overall_difficulty =
            overall_difficulty.ok_or(ChartParseError::MissingOverallDifficulty)?;
        notes.sort_by_key(|note| note.timestamp);
        Ok(Self {
            overall_difficulty,
            notes,
        })
    }

    /// Note timestamps in chart order.
    pub fn timestamps(&self) -> impl Iterator<Item = i64> + '_ {
        self.notes.iter().map(|note| note.timestamp)
    }
}

impl FromStr for Chart {
    type Err = ChartParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn parse_hit_object(line_no: usize, line: &str) -> Result<Option<Note>, ChartParseError> {
    let fields = line.split(',').map(str::trim).collect::<Vec<_>>();
    if fields.len() < 4 {
        return Ok(None);
    }

    let x: i64 = field(line_no, "x coordinate", fields[0])?;
    let timestamp = field(line_no, "timestamp", fields[2])?;
    let note_type = field(line_no, "note type", fields[3])?;
    let column =
        column_from_x(x).ok_or(ChartParseError::ColumnOutOfRange { line: line_no, x })?;

    Ok(Some(Note {
        column,
        timestamp,
        note_type,
    }))
}

fn field<T: FromStr>(line: usize, name: &'static str, value: &str) -> Result<T, ChartParseError> {
    value
        .parse()
        .map_err(|_| ChartParseError::InvalidHitObjectField {
            line,
            field: name,
            value: value.to_owned(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHART: &str = "\
osu file format v14

[General]
Mode: 3

[Difficulty]
HPDrainRate:8
OverallDifficulty:7.5
ApproachRate:5

[HitObjects]
36,192,1000,1,0,0:0:0:0:
182,192,800,5,0,0:0:0:0:
475,192,1200,128,0,1400:0:0:0:0:
";

    #[test]
    fn test_parse_full_chart() {
        let chart = Chart::parse(CHART).unwrap();
        assert_eq!(chart.overall_difficulty, 7.5);
        assert_eq!(
            chart.notes,
            vec![
                Note {
                    column: 2,
                    timestamp: 800,
                    note_type: 5
                },
                Note {
                    column: 0,
                    timestamp: 1000,
                    note_type: 1
                },
                Note {
                    column: 6,
                    timestamp: 1200,
                    note_type: 128
                },
            ]
        );
    }

    #[test]
    fn test_column_mapping() {
        assert_eq!(column_from_x(36), Some(0));
        assert_eq!(column_from_x(108), Some(0));
        assert_eq!(column_from_x(109), Some(1));
        assert_eq!(column_from_x(35), None);
    }

    #[test]
    fn test_missing_difficulty() {
        let err = Chart::parse("[HitObjects]\n36,192,1000,1,0\n").unwrap_err();
        assert!(matches!(err, ChartParseError::MissingOverallDifficulty));
    }

    #[test]
    fn test_invalid_difficulty() {
        let err = Chart::parse("[Difficulty]\nOverallDifficulty:hard\n").unwrap_err();
        assert!(matches!(
            err,
            ChartParseError::InvalidOverallDifficulty { .. }
        ));
    }

    #[test]
    fn test_short_lines_skipped() {
        let chart = Chart::parse("[Difficulty]\nOverallDifficulty:5\n[HitObjects]\n36,192\n")
            .unwrap();
        assert!(chart.notes.is_empty());
    }

    #[test]
    fn test_bad_timestamp_reports_line() {
        let err = Chart::parse("[Difficulty]\nOverallDifficulty:5\n[HitObjects]\n36,192,abc,1\n")
            .unwrap_err();
        assert!(matches!(
            err,
            ChartParseError::InvalidHitObjectField {
                line: 4,
                field: "timestamp",
                ..
            }
        ));
    }

    #[test]
    fn test_column_out_of_range() {
        let err = Chart::parse("[Difficulty]\nOverallDifficulty:5\n[HitObjects]\n600,192,10,1\n")
            .unwrap_err();
        assert!(matches!(
            err,
            ChartParseError::ColumnOutOfRange { line: 4, x: 600 }
        ));
    }
}
