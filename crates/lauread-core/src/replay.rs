//! Decoded replay model.
//!
//! The binary replay container is decoded by an external tool; this module is
//! the serde model of its output and the adapter that feeds the action stream
//! into [`reconstruct`](crate::reconstruct).
//!
//! # Serialization
//!
//! ```json
//! {
//!   "mode": "MANIA",
//!   "game_version": 20240101,
//!   "beatmap_hash": "…",
//!   "username": "player",
//!   "replay_hash": "…",
//!   "count_300": 512, "count_100": 12, "count_50": 1,
//!   "count_geki": 730, "count_katu": 40, "count_miss": 3,
//!   "score": 912345, "max_combo": 640, "perfect": false, "mods": 0,
//!   "life_bar_graph": [{ "time": 1203, "life": 1.0 }],
//!   "timestamp": "2024-05-01T12:34:56Z",
//!   "replay_data": [{ "time_delta": 1203, "keys": 0 }],
//!   "replay_id": 0,
//!   "rng_seed": null
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{KeyEvent, Sample, reconstruct};

/// Game mode a replay was recorded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, derive_more::Display)]
#[serde(rename_all = "UPPERCASE")]
pub enum GameMode {
    #[display("STD")]
    Std,
    #[display("TAIKO")]
    Taiko,
    #[display("CTB")]
    Ctb,
    #[display("MANIA")]
    Mania,
}

/// One point of the life-bar timeline.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct LifeBarState {
    /// Time (ms) of this life-bar sample.
    pub time: i64,
    /// Life value in `[0, 1]`.
    pub life: f64,
}

/// One raw input action as stored in the replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct ReplayAction {
    /// Milliseconds since the previous action; may be negative in raw data.
    pub time_delta: i64,
    /// Bitmask of held keys.
    pub keys: u32,
}

/// A replay as produced by the external decoder.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DecodedReplay {
    pub mode: GameMode,
    pub game_version: u32,
    pub beatmap_hash: String,
    pub username: String,
    pub replay_hash: String,
    pub count_300: u32,
    pub count_100: u32,
    pub count_50: u32,
    pub count_geki: u32,
    pub count_katu: u32,
    pub count_miss: u32,
    pub score: u64,
    pub max_combo: u32,
    pub perfect: bool,
    pub mods: u32,
    #[serde(default)]
    pub life_bar_graph: Option<Vec<LifeBarState>>,
    pub timestamp: DateTime<Utc>,
    pub replay_data: Vec<ReplayAction>,
    pub replay_id: i64,
    #[serde(default)]
    pub rng_seed: Option<i64>,
}

impl DecodedReplay {
    /// The action stream as reconstruction samples.
    ///
    /// Actions with a negative time delta do not describe input and are
    /// dropped here, so they never reach the reconstructor.
    pub fn samples(&self) -> impl Iterator<Item = Sample> + '_ {
        self.replay_data.iter().filter_map(|action| {
            let delta_time = u32::try_from(action.time_delta).ok()?;
            Some(Sample::new(delta_time, action.keys))
        })
    }

    /// Reference time the first keystroke is aligned to.
    ///
    /// This is the time of the first life-bar sample, or `0` when the replay
    /// has no life-bar timeline.
    #[must_use]
    pub fn initial_offset(&self) -> i64 {
        self.life_bar_graph
            .as_deref()
            .and_then(<[LifeBarState]>::first)
            .map_or(0, |state| state.time)
    }

    /// Reconstructs and realigns the keystrokes of this replay.
    #[must_use]
    pub fn keystrokes(&self) -> Vec<KeyEvent> {
        let mut events = reconstruct::reconstruct(self.samples());
        let initial_offset = self.initial_offset();
        reconstruct::realign(&mut events, initial_offset);
        tracing::debug!(
            events = events.len(),
            initial_offset,
            "reconstructed replay keystrokes"
        );
        events
    }
}
