//! Daily light cycle.
//!
//! The light is on from minute 0 (power-on) for the configured on-duration,
//! then off for the rest of the 1440-minute cycle. Example: an on-duration of
//! 840 minutes means on for minutes 0-839 and off for minutes 840-1439.

use crate::clock::MINUTES_PER_DAY;

/// Decides whether the light is on at `minute_of_day`.
///
/// An on-duration of 0 never switches on, 1440 or more never switches off.
pub const fn is_light_on(minute_of_day: u16, on_duration_minutes: u16) -> bool {
    if on_duration_minutes >= MINUTES_PER_DAY {
        true
    } else if on_duration_minutes == 0 {
        false
    } else {
        minute_of_day < on_duration_minutes
    }
}

/// Next scheduled change of the light state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Transition {
    /// Light is on and switches off after this many minutes
    LightsOff { in_minutes: u16 },
    /// Light is off and the next cycle starts after this many minutes
    LightsOn { in_minutes: u16 },
}

/// Time until the light next changes state.
///
/// Returns `None` for schedules that never change (always on or always off).
pub const fn next_transition(minute_of_day: u16, on_duration_minutes: u16) -> Option<Transition> {
    if on_duration_minutes == 0 || on_duration_minutes >= MINUTES_PER_DAY {
        return None;
    }
    if minute_of_day < on_duration_minutes {
        Some(Transition::LightsOff {
            in_minutes: on_duration_minutes - minute_of_day,
        })
    } else {
        Some(Transition::LightsOn {
            in_minutes: MINUTES_PER_DAY.saturating_sub(minute_of_day),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn on_exactly_before_on_duration() {
        for on_duration in [1u16, 60, 720, 840, 1439] {
            for minute in 0..MINUTES_PER_DAY {
                assert_eq!(
                    is_light_on(minute, on_duration),
                    minute < on_duration,
                    "minute {} on_duration {}",
                    minute,
                    on_duration
                );
            }
        }
    }

    #[test]
    fn zero_duration_never_on() {
        assert!((0..MINUTES_PER_DAY).all(|minute| !is_light_on(minute, 0)));
    }

    #[test]
    fn full_day_or_more_never_off() {
        for on_duration in [1440u16, 1441, u16::MAX] {
            assert!((0..MINUTES_PER_DAY).all(|minute| is_light_on(minute, on_duration)));
        }
    }

    #[test]
    fn fourteen_hour_boundary() {
        assert!(is_light_on(839, 840));
        assert!(!is_light_on(840, 840));
        assert!(!is_light_on(1439, 840));
        assert!(is_light_on(0, 840));
    }

    #[test]
    fn transition_while_on_counts_to_switch_off() {
        assert_eq!(
            next_transition(0, 840),
            Some(Transition::LightsOff { in_minutes: 840 })
        );
        assert_eq!(
            next_transition(839, 840),
            Some(Transition::LightsOff { in_minutes: 1 })
        );
    }

    #[test]
    fn transition_while_off_counts_to_next_cycle() {
        assert_eq!(
            next_transition(840, 840),
            Some(Transition::LightsOn { in_minutes: 600 })
        );
        assert_eq!(
            next_transition(1439, 840),
            Some(Transition::LightsOn { in_minutes: 1 })
        );
    }

    #[test]
    fn constant_schedules_have_no_transition() {
        assert_eq!(next_transition(100, 0), None);
        assert_eq!(next_transition(100, 1440), None);
    }
}
