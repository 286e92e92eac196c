//! Training targets from reconstructed keystrokes.
//!
//! Each chart note is paired with the keystroke whose press time is nearest
//! to the note's timestamp. Two offsets are derived from that keystroke:
//!
//! - **hit offset**: `press_time - note.timestamp`
//! - **release offset**: `release_time - press_time`
//!
//! Matching is many-to-one. A single keystroke may be nearest to several
//! notes (chords, dense streams, missed notes) and then contributes its
//! offsets to every one of them.

use lauread_core::{KeyEvent, Note};

/// Offsets a player produced for one note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetOffsetPair {
    /// Signed timing error of the press (ms).
    pub hit_offset: i64,
    /// Hold duration of the keystroke (ms).
    pub release_offset: i64,
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum TargetError {
    #[display("no keystrokes to match {notes} notes against")]
    NoKeystrokes { notes: usize },
}

/// Matches chart notes to their nearest keystrokes.
#[derive(Debug, Clone, Copy, Default)]
pub struct TargetBuilder;

impl TargetBuilder {
    /// Builds one target per note, in note order.
    ///
    /// `keystrokes` must be sorted by press time, as produced by
    /// reconstruction and by the ledger reader. When two keystrokes are
    /// equally near, the earlier one in the list wins.
    ///
    /// # Example
    ///
    /// ```
    /// use lauread_analysis::target_builder::{TargetBuilder, TargetOffsetPair};
    /// use lauread_core::{KeyEvent, KeyId, Note};
    ///
    /// let note = |timestamp| Note { column: 0, timestamp, note_type: 1 };
    /// let key = KeyId::new(1).unwrap();
    /// let targets = TargetBuilder
    ///     .build(
    ///         &[note(100), note(300)],
    ///         &[KeyEvent::new(95, key, 160), KeyEvent::new(310, key, 330)],
    ///     )
    ///     .unwrap();
    /// assert_eq!(
    ///     targets,
    ///     vec![
    ///         TargetOffsetPair { hit_offset: -5, release_offset: 65 },
    ///         TargetOffsetPair { hit_offset: 10, release_offset: 20 },
    ///     ]
    /// );
    /// ```
    pub fn build(
        &self,
        notes: &[Note],
        keystrokes: &[KeyEvent],
    ) -> Result<Vec<TargetOffsetPair>, TargetError> {
        debug_assert!(keystrokes.is_sorted_by_key(|k| k.press_time));
        if keystrokes.is_empty() {
            return Err(TargetError::NoKeystrokes { notes: notes.len() });
        }
        let targets = notes
            .iter()
            .filter_map(|note| {
                let nearest = nearest_keystroke(keystrokes, note.timestamp)?;
                Some(TargetOffsetPair {
                    hit_offset: nearest.press_time - note.timestamp,
                    release_offset: nearest.release_time - nearest.press_time,
                })
            })
            .collect();
        Ok(targets)
    }
}

/// Finds the keystroke in a press-time sorted slice whose press time is
/// nearest to `time`, preferring the earliest on ties.
fn nearest_keystroke(keystrokes: &[KeyEvent], time: i64) -> Option<&KeyEvent> {
    let after_index = keystrokes.partition_point(|k| k.press_time < time);
    let after = keystrokes.get(after_index);
    let before = after_index.checked_sub(1).map(|last| {
        // first keystroke sharing the press time of the last one before `time`
        let press_time = keystrokes[last].press_time;
        &keystrokes[keystrokes[..last].partition_point(|k| k.press_time < press_time)]
    });
    match (before, after) {
        (Some(before), Some(after)) => {
            if time.abs_diff(before.press_time) <= after.press_time.abs_diff(time) {
                Some(before)
            } else {
                Some(after)
            }
        }
        (before, after) => before.or(after),
    }
}
