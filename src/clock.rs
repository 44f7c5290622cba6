//! Software clock advanced by the 1 Hz interrupt.
//!
//! The clock always starts at minute 0 on boot and counts minutes since
//! power-on modulo one day. There is no calendar and no persistence.

/// Ticks (seconds) per minute.
pub const SECONDS_PER_MINUTE: u8 = 60;

/// Length of one light cycle in minutes.
pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// Seconds within the current minute and minute within the current cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockState {
    seconds: u8,
    minute: u16,
}

impl ClockState {
    /// Clock state at power-on.
    pub const BOOT: Self = Self {
        seconds: 0,
        minute: 0,
    };

    /// Creates a clock state, folding out-of-range values back into range.
    pub const fn new(seconds: u8, minute: u16) -> Self {
        Self {
            seconds: seconds % SECONDS_PER_MINUTE,
            minute: minute % MINUTES_PER_DAY,
        }
    }

    pub const fn seconds_in_minute(&self) -> u8 {
        self.seconds
    }

    pub const fn minute_of_day(&self) -> u16 {
        self.minute
    }

    /// Advances by one second.
    ///
    /// Returns true if this tick completed a minute, in which case the
    /// minute-of-day has already been advanced (and wrapped at 1440).
    pub fn tick(&mut self) -> bool {
        self.seconds += 1;
        if self.seconds >= SECONDS_PER_MINUTE {
            self.seconds = 0;
            self.advance_minute();
            true
        } else {
            false
        }
    }

    fn advance_minute(&mut self) {
        self.minute += 1;
        if self.minute >= MINUTES_PER_DAY {
            self.minute = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boot_state_is_zero() {
        let clock = ClockState::BOOT;
        assert_eq!(clock.seconds_in_minute(), 0);
        assert_eq!(clock.minute_of_day(), 0);
        assert_eq!(clock, ClockState::default());
    }

    #[test]
    fn sixty_ticks_advance_one_minute() {
        let mut clock = ClockState::BOOT;
        for _ in 0..59 {
            assert!(!clock.tick());
        }
        assert_eq!(clock.minute_of_day(), 0);
        assert_eq!(clock.seconds_in_minute(), 59);

        assert!(clock.tick());
        assert_eq!(clock.minute_of_day(), 1);
        assert_eq!(clock.seconds_in_minute(), 0);
    }

    #[test]
    fn full_day_wraps_without_drift() {
        let mut clock = ClockState::BOOT;
        let mut boundaries = 0u32;
        for _ in 0..(u32::from(MINUTES_PER_DAY) * u32::from(SECONDS_PER_MINUTE)) {
            if clock.tick() {
                boundaries += 1;
            }
        }
        assert_eq!(boundaries, 1440);
        assert_eq!(clock, ClockState::BOOT);
    }

    #[test]
    fn last_minute_wraps_to_zero() {
        let mut clock = ClockState::new(59, 1439);
        assert!(clock.tick());
        assert_eq!(clock.minute_of_day(), 0);
        assert_eq!(clock.seconds_in_minute(), 0);
    }

    #[test]
    fn new_folds_out_of_range_values() {
        let clock = ClockState::new(61, 1441);
        assert_eq!(clock.seconds_in_minute(), 1);
        assert_eq!(clock.minute_of_day(), 1);
    }
}
