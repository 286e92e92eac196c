//! Training directory discovery.
//!
//! A chart `<stem>.osu` pairs with the keystroke source sharing its stem:
//!
//! 1. `<stem>.lauread`: a keystroke ledger, read as is
//! 2. `<stem>.json`: a decoded replay, reconstructed in-process
//!
//! Charts without either are logged and skipped.

use std::path::{Path, PathBuf};

use anyhow::Context;
use lauread_analysis::sample::ReplayPair;

use crate::util;

pub const CHART_EXTENSION: &str = "osu";
pub const LEDGER_EXTENSION: &str = "lauread";
pub const REPLAY_EXTENSION: &str = "json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeystrokeSource {
    Ledger(PathBuf),
    Replay(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairedFiles {
    pub stem: String,
    pub chart: PathBuf,
    pub keystrokes: KeystrokeSource,
}

/// Lists the chart/keystroke file pairs of a directory, sorted by stem.
pub fn find_pairs(dir: &Path) -> anyhow::Result<Vec<PairedFiles>> {
    let entries = dir
        .read_dir()
        .with_context(|| format!("Failed to read training directory: {}", dir.display()))?;

    let mut charts = vec![];
    for entry in entries {
        let path = entry
            .with_context(|| format!("Failed to read training directory: {}", dir.display()))?
            .path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == CHART_EXTENSION) {
            charts.push(path);
        }
    }
    charts.sort();

    let mut pairs = vec![];
    for chart in charts {
        let Some(stem) = chart.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
            continue;
        };
        let ledger = chart.with_extension(LEDGER_EXTENSION);
        let replay = chart.with_extension(REPLAY_EXTENSION);
        let keystrokes = if ledger.is_file() {
            KeystrokeSource::Ledger(ledger)
        } else if replay.is_file() {
            KeystrokeSource::Replay(replay)
        } else {
            tracing::warn!(chart = %chart.display(), "no matching ledger or replay, skipping");
            continue;
        };
        pairs.push(PairedFiles {
            stem,
            chart,
            keystrokes,
        });
    }
    Ok(pairs)
}

impl PairedFiles {
    /// Reads the chart and keystrokes of this pair.
    pub fn load(&self) -> anyhow::Result<ReplayPair> {
        let chart = util::read_chart_file(&self.chart)?;
        let keystrokes = match &self.keystrokes {
            KeystrokeSource::Ledger(path) => util::read_ledger_file(path)?.keystrokes,
            KeystrokeSource::Replay(path) => util::read_replay_file(path)?.keystrokes(),
        };
        tracing::debug!(
            pair = %self.stem,
            notes = chart.notes.len(),
            keystrokes = keystrokes.len(),
            "loaded pair"
        );
        Ok(ReplayPair {
            name: self.stem.clone(),
            chart,
            keystrokes,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    const CHART: &str = "[Difficulty]\nOverallDifficulty:8\n[HitObjects]\n36,192,1000,1,0\n";

    #[test]
    fn test_pairing_by_stem() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        for name in ["b.osu", "a.osu", "c.osu", "a.lauread", "a.json", "b.json", "notes.txt"] {
            fs::write(root.join(name), "").unwrap();
        }

        let pairs = find_pairs(root).unwrap();
        assert_eq!(
            pairs,
            vec![
                PairedFiles {
                    stem: "a".to_owned(),
                    chart: root.join("a.osu"),
                    keystrokes: KeystrokeSource::Ledger(root.join("a.lauread")),
                },
                PairedFiles {
                    stem: "b".to_owned(),
                    chart: root.join("b.osu"),
                    keystrokes: KeystrokeSource::Replay(root.join("b.json")),
                },
            ]
        );
    }

    #[test]
    fn test_load_ledger_pair() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("song.osu"), CHART).unwrap();
        fs::write(
            root.join("song.lauread"),
            "Player: p\nReplayData:\n1010,1,1080\n",
        )
        .unwrap();

        let pairs = find_pairs(root).unwrap();
        let pair = pairs[0].load().unwrap();
        assert_eq!(pair.name, "song");
        assert_eq!(pair.chart.overall_difficulty, 8.0);
        assert_eq!(pair.keystrokes.len(), 1);
        assert_eq!(pair.keystrokes[0].press_time, 1010);
    }

    #[test]
    fn test_load_reports_bad_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("song.osu"), CHART).unwrap();
        fs::write(root.join("song.lauread"), "ReplayData:\n1,2\n").unwrap();

        let err = find_pairs(root).unwrap()[0].load().unwrap_err();
        assert!(format!("{err:#}").contains("song.lauread"));
    }

    #[test]
    fn test_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(find_pairs(&dir.path().join("missing")).is_err());
    }
}
