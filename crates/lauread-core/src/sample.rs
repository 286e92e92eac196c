use crate::KeySet;

/// One sampled input frame: elapsed time since the previous frame and the
/// bitmask of keys held at this instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    /// Milliseconds elapsed since the previous sample.
    pub delta_time: u32,
    /// Raw key bitmask; only the lowest 7 bits are meaningful.
    pub key_bitmask: u32,
}

impl Sample {
    #[must_use]
    pub const fn new(delta_time: u32, key_bitmask: u32) -> Self {
        Self {
            delta_time,
            key_bitmask,
        }
    }

    /// Keys held down in this sample.
    #[must_use]
    pub const fn keys(&self) -> KeySet {
        KeySet::from_bitmask(self.key_bitmask)
    }
}
