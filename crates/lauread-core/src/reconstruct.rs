//! Keystroke reconstruction from a delta-compressed input stream.
//!
//! A replay records input as a sequence of [`Sample`]s: the time elapsed since
//! the previous sample and the set of keys held at that instant. This module
//! turns that stream back into [`KeyEvent`] intervals.
//!
//! # Algorithm
//!
//! 1. Advance a running clock by each sample's `delta_time`
//! 2. Decode the bitmask into the set of held keys
//! 3. Every tracked key missing from the set is released at the current clock
//! 4. Every held key not yet tracked is pressed at the current clock
//! 5. At the end of the stream, keys still held are released at the final clock
//!
//! The output is sorted by press time, then key id.
//!
//! # Sampling Resolution
//!
//! A key that goes down and up between two samples never appears in any
//! bitmask, so it produces no event. The reconstruction cannot recover such
//! taps.
//!
//! # Realignment
//!
//! The replay clock and the chart clock have different origins. [`realign`]
//! shifts every event so the first press lands on a reference time taken from
//! an independent timeline of the replay (see
//! [`DecodedReplay::initial_offset`](crate::DecodedReplay::initial_offset)).

use crate::{KEY_COUNT, KeyEvent, KeyId, KeySet, Sample};

/// Incremental keystroke reconstructor.
///
/// Feed samples in order with [`push`](Self::push) and collect the events with
/// [`finish`](Self::finish). Held keys are tracked in a fixed table indexed by
/// key id.
///
/// # Example
///
/// ```
/// use lauread_core::{KeyEvent, KeyId, Sample, reconstruct::EventReconstructor};
///
/// let mut reconstructor = EventReconstructor::new();
/// reconstructor.push(Sample::new(10, 0b01));
/// reconstructor.push(Sample::new(20, 0b11));
/// reconstructor.push(Sample::new(5, 0b10));
/// let events = reconstructor.finish();
///
/// let key = |id| KeyId::new(id).unwrap();
/// assert_eq!(
///     events,
///     vec![KeyEvent::new(10, key(1), 35), KeyEvent::new(30, key(2), 35)]
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct EventReconstructor {
    clock: i64,
    pressed_at: [Option<i64>; KEY_COUNT],
    events: Vec<KeyEvent>,
}

impl EventReconstructor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current absolute clock in ms (sum of all deltas pushed so far).
    #[must_use]
    pub fn clock(&self) -> i64 {
        self.clock
    }

    /// Keys currently held down.
    #[must_use]
    pub fn held_keys(&self) -> KeySet {
        let bits = KeyId::all()
            .filter(|key| self.pressed_at[key.index()].is_some())
            .fold(0, |bits, key| bits | (1 << key.index()));
        KeySet::from_bitmask(bits)
    }

    /// Advances the clock by one sample and records presses and releases.
    pub fn push(&mut self, sample: Sample) {
        self.clock += i64::from(sample.delta_time);
        let held = sample.keys();
        for key in KeyId::all() {
            let slot = &mut self.pressed_at[key.index()];
            match (*slot, held.contains(key)) {
                (Some(press_time), false) => {
                    self.events.push(KeyEvent::new(press_time, key, self.clock));
                    *slot = None;
                }
                (None, true) => *slot = Some(self.clock),
                _ => {}
            }
        }
    }

    /// Releases every key still held at the final clock value and returns the
    /// events sorted by press time, then key id.
    #[must_use]
    pub fn finish(mut self) -> Vec<KeyEvent> {
        for key in KeyId::all() {
            if let Some(press_time) = self.pressed_at[key.index()].take() {
                self.events.push(KeyEvent::new(press_time, key, self.clock));
            }
        }
        self.events.sort_unstable();
        self.events
    }
}

/// Reconstructs key events from a complete sample stream.
///
/// # Example
///
/// ```
/// use lauread_core::{KeyEvent, KeyId, Sample, reconstruct};
///
/// // key 2 pressed at 0 and never released
/// let events = reconstruct::reconstruct([Sample::new(0, 0b10), Sample::new(40, 0b10)]);
/// assert_eq!(events, vec![KeyEvent::new(0, KeyId::new(2).unwrap(), 40)]);
/// ```
#[must_use]
pub fn reconstruct<I>(samples: I) -> Vec<KeyEvent>
where
    I: IntoIterator<Item = Sample>,
{
    let mut reconstructor = EventReconstructor::new();
    for sample in samples {
        reconstructor.push(sample);
    }
    reconstructor.finish()
}

/// Shifts sorted events so the first press lands exactly on `initial_offset`.
///
/// With `shift = events[0].press_time - initial_offset`, every press and
/// release time becomes `max(time - shift, initial_offset)`. Does nothing for
/// an empty slice.
///
/// `events` must be sorted as returned by [`reconstruct`].
///
/// # Example
///
/// ```
/// use lauread_core::{KeyEvent, KeyId, reconstruct};
///
/// let key = KeyId::new(1).unwrap();
/// let mut events = vec![KeyEvent::new(1200, key, 1300), KeyEvent::new(1500, key, 1550)];
/// reconstruct::realign(&mut events, 1000);
/// assert_eq!(events, vec![KeyEvent::new(1000, key, 1100), KeyEvent::new(1300, key, 1350)]);
/// ```
pub fn realign(events: &mut [KeyEvent], initial_offset: i64) {
    debug_assert!(events.is_sorted(), "events must be sorted");
    let Some(first) = events.first() else {
        return;
    };
    let shift = first.press_time - initial_offset;
    for event in events {
        event.press_time = (event.press_time - shift).max(initial_offset);
        event.release_time = (event.release_time - shift).max(initial_offset);
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn key(id: u8) -> KeyId {
        KeyId::new(id).unwrap()
    }

    #[test]
    fn test_single_key_press_and_release() {
        let events = reconstruct([Sample::new(100, 1 << 2), Sample::new(50, 0)]);
        assert_eq!(events, vec![KeyEvent::new(100, key(3), 150)]);
    }

    #[test]
    fn test_empty_stream() {
        assert!(reconstruct(Vec::<Sample>::new()).is_empty());
    }

    #[test]
    fn test_held_keys_force_closed_at_final_clock() {
        let events = reconstruct([
            Sample::new(10, 0b101),
            Sample::new(10, 0b101),
            Sample::new(15, 0b001),
            Sample::new(5, 0b001),
        ]);
        assert_eq!(
            events,
            vec![KeyEvent::new(10, key(1), 40), KeyEvent::new(10, key(3), 35)]
        );
    }

    #[test]
    fn test_ties_ordered_by_key_id() {
        let events = reconstruct([Sample::new(5, 0b110_0001), Sample::new(5, 0)]);
        let keys: Vec<u8> = events.iter().map(|e| e.key.get()).collect();
        assert_eq!(keys, vec![1, 6, 7]);
        assert!(events.iter().all(|e| e.press_time == 5 && e.release_time == 10));
    }

    #[test]
    fn test_key_reopened_after_release() {
        let events = reconstruct([
            Sample::new(0, 0b1),
            Sample::new(30, 0),
            Sample::new(30, 0b1),
            Sample::new(30, 0),
        ]);
        assert_eq!(
            events,
            vec![KeyEvent::new(0, key(1), 30), KeyEvent::new(60, key(1), 90)]
        );
    }

    #[test]
    fn test_unobserved_tap_is_absent() {
        // a tap shorter than one sample interval leaves no trace in any bitmask
        let events = reconstruct([Sample::new(16, 0), Sample::new(16, 0), Sample::new(16, 0)]);
        assert!(events.is_empty());
    }

    #[test]
    fn test_high_bits_masked() {
        let events = reconstruct([Sample::new(1, 0x100 | 0b10), Sample::new(1, 0x100)]);
        assert_eq!(events, vec![KeyEvent::new(1, key(2), 2)]);
    }

    #[test]
    fn test_held_keys_tracking() {
        let mut reconstructor = EventReconstructor::new();
        reconstructor.push(Sample::new(3, 0b1001));
        assert_eq!(reconstructor.clock(), 3);
        assert_eq!(reconstructor.held_keys(), KeySet::from_bitmask(0b1001));
        reconstructor.push(Sample::new(3, 0b1000));
        assert_eq!(reconstructor.held_keys(), KeySet::from_bitmask(0b1000));
    }

    #[test]
    fn test_realign_first_press_matches_offset() {
        let mut events = reconstruct([
            Sample::new(500, 0b1),
            Sample::new(100, 0b10),
            Sample::new(100, 0),
        ]);
        realign(&mut events, 2000);
        assert_eq!(
            events,
            vec![KeyEvent::new(2000, key(1), 2100), KeyEvent::new(2100, key(2), 2200)]
        );
    }

    #[test]
    fn test_realign_shift_backwards() {
        let mut events = vec![KeyEvent::new(10, key(4), 20)];
        realign(&mut events, 500);
        assert_eq!(events, vec![KeyEvent::new(500, key(4), 510)]);
    }

    #[test]
    fn test_realign_empty() {
        let mut events: Vec<KeyEvent> = vec![];
        realign(&mut events, 100);
        assert!(events.is_empty());
    }

    fn arb_samples() -> impl Strategy<Value = Vec<Sample>> {
        prop::collection::vec(
            (0u32..200, any::<u32>()).prop_map(|(delta, bits)| Sample::new(delta, bits)),
            0..200,
        )
    }

    proptest! {
        #[test]
        fn test_press_never_after_release(samples in arb_samples()) {
            for event in reconstruct(samples) {
                prop_assert!(event.press_time <= event.release_time);
            }
        }

        #[test]
        fn test_sorted_by_press_then_key(samples in arb_samples()) {
            let events = reconstruct(samples);
            for pair in events.windows(2) {
                prop_assert!(
                    (pair[0].press_time, pair[0].key) <= (pair[1].press_time, pair[1].key)
                );
            }
        }

        #[test]
        fn test_same_key_intervals_do_not_overlap(samples in arb_samples()) {
            let events = reconstruct(samples);
            for key in KeyId::all() {
                let intervals: Vec<_> = events.iter().filter(|e| e.key == key).collect();
                for pair in intervals.windows(2) {
                    prop_assert!(pair[0].release_time <= pair[1].press_time);
                }
            }
        }

        #[test]
        fn test_realign_keeps_order_and_offset(
            samples in arb_samples(),
            initial_offset in -5_000i64..5_000,
        ) {
            let mut events = reconstruct(samples);
            realign(&mut events, initial_offset);
            if let Some(first) = events.first() {
                prop_assert_eq!(first.press_time, initial_offset);
            }
            for event in &events {
                prop_assert!(event.press_time >= initial_offset);
                prop_assert!(event.press_time <= event.release_time);
            }
            prop_assert!(events.is_sorted());
        }
    }
}
