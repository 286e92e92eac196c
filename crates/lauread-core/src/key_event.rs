use std::fmt;

use crate::KeyId;

/// A reconstructed keystroke: the interval during which one key was held.
///
/// Events order by `press_time`, then by `key`, which is the order the
/// reconstruction and the ledger use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct KeyEvent {
    /// Absolute time (ms) the key went down.
    pub press_time: i64,
    /// Which key was held.
    pub key: KeyId,
    /// Absolute time (ms) the key came up; never earlier than `press_time`.
    pub release_time: i64,
}

impl KeyEvent {
    #[must_use]
    pub const fn new(press_time: i64, key: KeyId, release_time: i64) -> Self {
        Self {
            press_time,
            key,
            release_time,
        }
    }

    /// How long the key was held, in ms.
    #[must_use]
    pub const fn hold_duration(&self) -> i64 {
        self.release_time - self.press_time
    }
}

/// Formats as the ledger CSV line `press_time,key,release_time`.
impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.press_time, self.key, self.release_time)
    }
}
