//! Human-readable status line for the diagnostic console.
//!
//! ```text
//! Cycle minute: 839/1440 (13:59), Light: ON  (1 mins remaining)
//! Temperature ADC: 512
//! ```
//!
//! Informational only, not a machine protocol.

use core::fmt;

use crate::clock::MINUTES_PER_DAY;
use crate::config::GrowConfig;
use crate::schedule::{self, Transition};
use crate::state::Snapshot;

pub struct Report {
    minute: u16,
    light_on: bool,
    transition: Option<Transition>,
    temperature_raw: Option<u16>,
}

impl Report {
    /// # Arguments
    ///
    /// * `snapshot` - Clock and light state read from the shared state
    /// * `config` - Schedule used to compute the time to the next transition
    /// * `temperature_raw` - Last analog sample, if one was taken
    pub fn new(snapshot: Snapshot, config: &GrowConfig, temperature_raw: Option<u16>) -> Self {
        let minute = snapshot.clock.minute_of_day();
        Self {
            minute,
            light_on: snapshot.light_on,
            transition: schedule::next_transition(minute, config.on_duration_minutes()),
            temperature_raw,
        }
    }

    pub fn transition(&self) -> Option<Transition> {
        self.transition
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Cycle minute: {}/{} ({:02}:{:02}), Light: {}",
            self.minute,
            MINUTES_PER_DAY,
            self.minute / 60,
            self.minute % 60,
            if self.light_on { "ON " } else { "OFF" }
        )?;
        // Skip the countdown if the light state and the schedule disagree
        match self.transition {
            Some(Transition::LightsOff { in_minutes }) if self.light_on => {
                write!(f, " ({} mins remaining)", in_minutes)?
            }
            Some(Transition::LightsOn { in_minutes }) if !self.light_on => {
                write!(f, " ({} mins until next cycle)", in_minutes)?
            }
            _ => {}
        }
        if let Some(raw) = self.temperature_raw {
            write!(f, "\nTemperature ADC: {}", raw)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ClockState;

    fn snapshot(minute: u16, light_on: bool) -> Snapshot {
        Snapshot {
            clock: ClockState::new(0, minute),
            light_on,
        }
    }

    fn config(on_minutes: u16) -> GrowConfig {
        GrowConfig::new(on_minutes, 100).unwrap()
    }

    #[test]
    fn on_phase_shows_remaining_minutes() {
        let report = Report::new(snapshot(839, true), &config(840), None);
        assert_eq!(
            report.to_string(),
            "Cycle minute: 839/1440 (13:59), Light: ON  (1 mins remaining)"
        );
    }

    #[test]
    fn off_phase_shows_time_to_next_cycle() {
        let report = Report::new(snapshot(840, false), &config(840), Some(512));
        assert_eq!(
            report.to_string(),
            "Cycle minute: 840/1440 (14:00), Light: OFF (600 mins until next cycle)\n\
             Temperature ADC: 512"
        );
    }

    #[test]
    fn constant_schedule_has_no_countdown() {
        let report = Report::new(snapshot(5, true), &config(1440), None);
        assert_eq!(report.to_string(), "Cycle minute: 5/1440 (00:05), Light: ON ");
        assert_eq!(report.transition(), None);
    }

    #[test]
    fn torn_snapshot_skips_countdown() {
        // Light flag not yet updated for the new minute
        let report = Report::new(snapshot(840, true), &config(840), None);
        assert_eq!(report.to_string(), "Cycle minute: 840/1440 (14:00), Light: ON ");
    }
}
