//! Core replay and chart types for lauread.
//!
//! This crate turns the raw input stream of a decoded replay into discrete
//! keystrokes and reads the text formats the rest of the workspace consumes.
//!
//! # Overview
//!
//! ```text
//! DecodedReplay (external decoder output)
//!     ↓ samples()
//! Sample stream (delta_time, key_bitmask)
//!     ↓ reconstruct::reconstruct + realign
//! KeyEvent list (press_time, key, release_time)
//!     ↓ Ledger
//! .lauread text file
//! ```
//!
//! Charts are read separately with [`chart::Chart::parse`] and carry the
//! notes and the overall difficulty used by judgment and training.
//!
//! # Example
//!
//! ```
//! use lauread_core::{KeyEvent, KeyId, Sample, reconstruct};
//!
//! let samples = [Sample::new(100, 0b100), Sample::new(50, 0)];
//! let events = reconstruct::reconstruct(samples);
//! assert_eq!(events, vec![KeyEvent::new(100, KeyId::new(3).unwrap(), 150)]);
//! ```

pub use self::{
    chart::{Chart, ChartParseError, Note},
    key::{KEY_COUNT, KeyId, KeySet},
    key_event::KeyEvent,
    ledger::{Ledger, LedgerParseError},
    replay::{DecodedReplay, GameMode, LifeBarState, ReplayAction},
    sample::Sample,
};

pub mod chart;
pub mod key;
pub mod key_event;
pub mod ledger;
pub mod reconstruct;
pub mod replay;
pub mod sample;
