//! State shared between the tick interrupt and the reporting loop.
//!
//! The interrupt is the only writer. It publishes the clock and light state
//! into single-word atomics after every tick; the loop takes [`Snapshot`]s.
//! Write access is a [`StateWriter`] handle that can be claimed exactly once,
//! so only the code that registers the interrupt can hold it.

use portable_atomic::{AtomicBool, AtomicU8, AtomicU16, Ordering};

use crate::clock::ClockState;

/// Clock and light state, readable from anywhere.
pub struct SharedState {
    seconds: AtomicU8,
    minute: AtomicU16,
    light_on: AtomicBool,
    writer_claimed: AtomicBool,
}

impl SharedState {
    pub const fn new() -> Self {
        Self {
            seconds: AtomicU8::new(0),
            minute: AtomicU16::new(0),
            light_on: AtomicBool::new(false),
            writer_claimed: AtomicBool::new(false),
        }
    }

    /// Hands out the single writer.
    ///
    /// Returns `None` if the writer has already been claimed.
    pub fn claim_writer(&self) -> Option<StateWriter<'_>> {
        if self.writer_claimed.swap(true, Ordering::AcqRel) {
            None
        } else {
            Some(StateWriter { state: self })
        }
    }

    /// Reads the current state.
    ///
    /// Fields are loaded one by one; a tick landing between the loads can
    /// mix two consecutive states, which only matters for display.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            clock: ClockState::new(
                self.seconds.load(Ordering::Acquire),
                self.minute.load(Ordering::Acquire),
            ),
            light_on: self.light_on.load(Ordering::Acquire),
        }
    }
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new()
    }
}

/// Exclusive write access to a [`SharedState`].
pub struct StateWriter<'a> {
    state: &'a SharedState,
}

impl StateWriter<'_> {
    pub fn publish_clock(&mut self, clock: ClockState) {
        self.state.seconds.store(clock.seconds_in_minute(), Ordering::Release);
        self.state.minute.store(clock.minute_of_day(), Ordering::Release);
    }

    pub fn publish_light(&mut self, on: bool) {
        self.state.light_on.store(on, Ordering::Release);
    }
}

/// Point-in-time copy of the shared state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Snapshot {
    pub clock: ClockState,
    pub light_on: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writer_can_only_be_claimed_once() {
        let state = SharedState::new();
        let writer = state.claim_writer();
        assert!(writer.is_some());
        assert!(state.claim_writer().is_none());
        drop(writer);
        assert!(state.claim_writer().is_none());
    }

    #[test]
    fn snapshot_reflects_published_values() {
        let state = SharedState::new();
        assert_eq!(
            state.snapshot(),
            Snapshot {
                clock: ClockState::BOOT,
                light_on: false
            }
        );

        let mut writer = state.claim_writer().unwrap();
        writer.publish_clock(ClockState::new(42, 839));
        writer.publish_light(true);

        let snapshot = state.snapshot();
        assert_eq!(snapshot.clock.seconds_in_minute(), 42);
        assert_eq!(snapshot.clock.minute_of_day(), 839);
        assert!(snapshot.light_on);
    }

    #[test]
    fn static_state_is_const_constructible() {
        static STATE: SharedState = SharedState::new();
        let mut writer = STATE.claim_writer().unwrap();
        writer.publish_light(true);
        assert!(STATE.snapshot().light_on);
    }
}
