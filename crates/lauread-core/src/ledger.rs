//! The `.lauread` keystroke ledger.
//!
//! A ledger is a plain text file: replay metadata as `Key: value` header
//! lines, a `ReplayData:` marker, then one `press_time,key,release_time` CSV
//! line per reconstructed keystroke in ascending order.
//!
//! ```text
//! Mode: MANIA
//! Version: 20240101
//! BeatmapHash: 0f3c…
//! Player: player
//! ReplayHash: 9a1b…
//! 300s: 512
//! 100s: 12
//! 50s: 1
//! Gekis: 730
//! Katus: 40
//! Misses: 3
//! Score: 912345
//! MaxCombo: 640
//! Perfect: False
//! Mods: 0
//! LifeBarGraph: 1203|1.0,3050|0.98
//! Timestamp: 2024-05-01T12:34:56+00:00
//! ReplayID: 0
//! RNGSeed: None
//! ReplayData:
//! 1203,1,1290
//! 1211,4,1302
//! ```

use std::fmt::{self, Write as _};

use crate::{DecodedReplay, KeyEvent, KeyId};

const REPLAY_DATA_MARKER: &str = "ReplayData:";
const ABSENT: &str = "None";

/// Parsed or generated ledger contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ledger {
    /// Header entries in file order.
    pub header: Vec<(String, String)>,
    /// Keystrokes sorted by press time, then key.
    pub keystrokes: Vec<KeyEvent>,
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum LedgerParseError {
    #[display("line {line}: header entry is not of the form 'Key: value'")]
    MalformedHeader { line: usize },
    #[display("missing 'ReplayData:' marker")]
    MissingReplayData,
    #[display("line {line}: expected 'press_time,key,release_time', found '{text}'")]
    MalformedEvent { line: usize, text: String },
    #[display("line {line}: key id {key} is outside 1..=7")]
    InvalidKey { line: usize, key: i64 },
    #[display("line {line}: release time {release_time} precedes press time {press_time}")]
    ReleaseBeforePress {
        line: usize,
        press_time: i64,
        release_time: i64,
    },
}

impl Ledger {
    /// Builds a ledger from a decoded replay, reconstructing its keystrokes.
    #[must_use]
    pub fn from_replay(replay: &DecodedReplay) -> Self {
        let life_bar_graph = match replay.life_bar_graph.as_deref() {
            Some(states) if !states.is_empty() => {
                let mut text = String::new();
                for (i, state) in states.iter().enumerate() {
                    if i > 0 {
                        text.push(',');
                    }
                    // `{:?}` keeps a trailing `.0` on whole values
                    let _ = write!(text, "{}|{:?}", state.time, state.life);
                }
                text
            }
            _ => ABSENT.to_owned(),
        };
        let perfect = if replay.perfect { "True" } else { "False" };
        let rng_seed = replay
            .rng_seed
            .map_or_else(|| ABSENT.to_owned(), |seed| seed.to_string());

        let header = [
            ("Mode", replay.mode.to_string()),
            ("Version", replay.game_version.to_string()),
            ("BeatmapHash", replay.beatmap_hash.clone()),
            ("Player", replay.username.clone()),
            ("ReplayHash", replay.replay_hash.clone()),
            ("300s", replay.count_300.to_string()),
            ("100s", replay.count_100.to_string()),
            ("50s", replay.count_50.to_string()),
            ("Gekis", replay.count_geki.to_string()),
            ("Katus", replay.count_katu.to_string()),
            ("Misses", replay.count_miss.to_string()),
            ("Score", replay.score.to_string()),
            ("MaxCombo", replay.max_combo.to_string()),
            ("Perfect", perfect.to_owned()),
            ("Mods", replay.mods.to_string()),
            ("LifeBarGraph", life_bar_graph),
            ("Timestamp", replay.timestamp.to_rfc3339()),
            ("ReplayID", replay.replay_id.to_string()),
            ("RNGSeed", rng_seed),
        ]
        .into_iter()
        .map(|(key, value)| (key.to_owned(), value))
        .collect();

        Self {
            header,
            keystrokes: replay.keystrokes(),
        }
    }

    /// Looks up a header value by key.
    #[must_use]
    pub fn header_value(&self, key: &str) -> Option<&str> {
        self.header
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Press times of all keystrokes, in ledger order.
    pub fn press_times(&self) -> impl Iterator<Item = i64> + '_ {
        self.keystrokes.iter().map(|event| event.press_time)
    }

    /// Parses a ledger document.
    ///
    /// Blank lines are ignored. The returned keystrokes are sorted.
    ///
    /// # Example
    ///
    /// ```
    /// use lauread_core::Ledger;
    ///
    /// let ledger = Ledger::parse("Player: someone\nReplayData:\n250,2,300\n100,1,180\n").unwrap();
    /// assert_eq!(ledger.header_value("Player"), Some("someone"));
    /// assert_eq!(ledger.press_times().collect::<Vec<_>>(), vec![100, 250]);
    /// ```
    pub fn parse(text: &str) -> Result<Self, LedgerParseError> {
        let mut lines = text.lines().enumerate().map(|(i, line)| (i + 1, line.trim()));

        let mut header = vec![];
        let mut found_marker = false;
        for (line_no, line) in lines.by_ref() {
            if line.is_empty() {
                continue;
            }
            if line == REPLAY_DATA_MARKER {
                found_marker = true;
                break;
            }
            let (key, value) = line
                .split_once(':')
                .ok_or(LedgerParseError::MalformedHeader { line: line_no })?;
            header.push((key.trim().to_owned(), value.trim().to_owned()));
        }
        if !found_marker {
            return Err(LedgerParseError::MissingReplayData);
        }

        let mut keystrokes = vec![];
        for (line_no, line) in lines {
            if line.is_empty() {
                continue;
            }
            keystrokes.push(parse_event(line_no, line)?);
        }
        keystrokes.sort_unstable();

        Ok(Self { header, keystrokes })
    }
}

fn parse_event(line_no: usize, line: &str) -> Result<KeyEvent, LedgerParseError> {
    let malformed = || LedgerParseError::MalformedEvent {
        line: line_no,
        text: line.to_owned(),
    };
    let fields = line
        .split(',')
        .map(|field| field.trim().parse::<i64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| malformed())?;
    let [press_time, key, release_time] = fields[..] else {
        return Err(malformed());
    };
    let key_id = u8::try_from(key)
        .ok()
        .and_then(KeyId::new)
        .ok_or(LedgerParseError::InvalidKey { line: line_no, key })?;
    if release_time < press_time {
        return Err(LedgerParseError::ReleaseBeforePress {
            line: line_no,
            press_time,
            release_time,
        });
    }
    Ok(KeyEvent::new(press_time, key_id, release_time))
}

impl fmt::Display for Ledger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in &self.header {
            writeln!(f, "{key}: {value}")?;
        }
        writeln!(f, "{REPLAY_DATA_MARKER}")?;
        for event in &self.keystrokes {
            writeln!(f, "{event}")?;
        }
        Ok(())
    }
}
