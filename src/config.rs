//! Light schedule and output power configuration.
//!
//! The firmware builds its configuration in a `const` item, so an
//! out-of-range value fails the build instead of reaching the driver:
//!
//! ```
//! use tidegrow::GrowConfig;
//!
//! const CONFIG: GrowConfig = match GrowConfig::new(14 * 60, 100) {
//!     Ok(config) => config,
//!     Err(_) => panic!("invalid grow configuration"),
//! };
//!
//! assert_eq!(CONFIG.on_duration_minutes(), 840);
//! assert_eq!(CONFIG.off_duration_minutes(), 600);
//! ```

use crate::clock::MINUTES_PER_DAY;
use crate::error::ConfigError;

/// Output power in percent, always within `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PowerLevel(u8);

impl PowerLevel {
    /// Driver disabled (pin driven low)
    pub const OFF: Self = Self(0);

    /// Full power (pin floating)
    pub const FULL: Self = Self(100);

    /// Returns `None` for values above 100.
    pub const fn new(percent: u8) -> Option<Self> {
        if percent <= 100 {
            Some(Self(percent))
        } else {
            None
        }
    }

    /// Clamps values above 100 to full power.
    pub const fn saturating(percent: u8) -> Self {
        if percent > 100 { Self::FULL } else { Self(percent) }
    }

    pub const fn percent(self) -> u8 {
        self.0
    }
}

/// Daily light schedule and steady-state output power.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GrowConfig {
    on_duration_minutes: u16,
    power: PowerLevel,
}

impl GrowConfig {
    /// Validates and builds a configuration.
    ///
    /// # Arguments
    ///
    /// * `on_duration_minutes` - Minutes the light stays on per 1440-minute
    ///   cycle, starting at minute 0 (`0..=1440`)
    /// * `power_percent` - Output level while the light is on (`0..=100`)
    pub const fn new(on_duration_minutes: u16, power_percent: u8) -> Result<Self, ConfigError> {
        if on_duration_minutes > MINUTES_PER_DAY {
            return Err(ConfigError::OnDurationOutOfRange {
                minutes: on_duration_minutes,
            });
        }
        match PowerLevel::new(power_percent) {
            Some(power) => Ok(Self {
                on_duration_minutes,
                power,
            }),
            None => Err(ConfigError::PowerOutOfRange {
                percent: power_percent,
            }),
        }
    }

    pub const fn on_duration_minutes(&self) -> u16 {
        self.on_duration_minutes
    }

    /// Minutes per cycle the light stays off.
    pub const fn off_duration_minutes(&self) -> u16 {
        MINUTES_PER_DAY - self.on_duration_minutes
    }

    pub const fn power(&self) -> PowerLevel {
        self.power
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_full_range() {
        assert!(GrowConfig::new(0, 0).is_ok());
        assert!(GrowConfig::new(1440, 100).is_ok());

        let config = GrowConfig::new(840, 60).unwrap();
        assert_eq!(config.on_duration_minutes(), 840);
        assert_eq!(config.off_duration_minutes(), 600);
        assert_eq!(config.power().percent(), 60);
    }

    #[test]
    fn rejects_on_duration_past_one_day() {
        assert_eq!(
            GrowConfig::new(1441, 100),
            Err(ConfigError::OnDurationOutOfRange { minutes: 1441 })
        );
    }

    #[test]
    fn rejects_power_above_full() {
        assert_eq!(
            GrowConfig::new(840, 101),
            Err(ConfigError::PowerOutOfRange { percent: 101 })
        );
    }

    #[test]
    fn power_level_bounds() {
        assert_eq!(PowerLevel::new(100), Some(PowerLevel::FULL));
        assert_eq!(PowerLevel::new(101), None);
        assert_eq!(PowerLevel::saturating(250), PowerLevel::FULL);
        assert_eq!(PowerLevel::saturating(42).percent(), 42);
        assert!(PowerLevel::OFF < PowerLevel::FULL);
    }
}
