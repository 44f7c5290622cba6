//! Power output driver for the grow-light LED driver.
//!
//! A single pin controls the downstream PAM-style constant-current driver.
//! Its enable input reads three different electrical states:
//!
//! - **Driven low**: driver disabled (light off)
//! - **Floating (high-Z)**: full power
//! - **Open-drain PWM**: dimmed; the released (floating) phase is the "on"
//!   phase, so a larger compare value gives more light
//!
//! The 0% and 100% regimes are deliberately not symmetric: 100% is a floating
//! input, not a driven-high output. This is the driver's hardware convention.
//!
//! # Switching Order
//!
//! The PWM channel is only ever enabled while the pin is in open-drain PWM
//! mode. Leaving PWM, the channel is disabled before the pin mode changes.
//! Entering PWM, polarity and compare value are loaded first, the pin is
//! handed to the timer, and the channel is enabled last.

use embedded_hal::PwmPin;

use crate::config::PowerLevel;

/// Logic level of the output pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    Low,
    High,
}

/// Electrical configuration of the output pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinMode {
    /// Push-pull digital output, level set through [`PinControl::write`]
    PushPullOutput,
    /// High-impedance input, no pull resistor
    FloatingInput,
    /// Open-drain output driven by the timer channel
    OpenDrainPwm,
}

/// PWM output polarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    /// Output high (released) while the counter is below the compare value
    NonInverted,
    /// Output low while the counter is below the compare value
    Inverted,
}

/// Mode and level control of the output pin.
pub trait PinControl {
    /// Reconfigures the pin's electrical mode.
    fn set_mode(&mut self, mode: PinMode);

    /// Sets the output latch. Takes effect on the pin in push-pull mode.
    fn write(&mut self, level: Level);

    /// Reads the level currently present on the pin.
    fn read(&self) -> Level;
}

/// Timer channel feeding the output pin.
///
/// `set_duty` must go through the timer's preload (shadow) register so a new
/// compare value only takes effect at the next period boundary.
pub trait PwmOutput: PwmPin<Duty = u16> {
    fn set_polarity(&mut self, polarity: Polarity);
}

/// Electrical regime the driver has put the pin into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Regime {
    /// 0%: PWM disabled, pin push-pull driven low
    Off,
    /// 100%: PWM disabled, pin floating
    Full,
    /// 1-99%: pin open-drain under timer control
    Pwm {
        /// Timer compare value
        compare: u16,
    },
}

impl Regime {
    /// Selects the regime for `level` on a timer with the given full-scale
    /// compare value.
    ///
    /// The compare value is `round(percent * full_scale / 100)`.
    pub fn for_level(level: PowerLevel, full_scale: u16) -> Self {
        match level.percent() {
            0 => Regime::Off,
            100 => Regime::Full,
            percent => {
                let compare = (u32::from(percent) * u32::from(full_scale) + 50) / 100;
                Regime::Pwm {
                    compare: compare as u16,
                }
            }
        }
    }
}

/// Owner of the output pin and its timer channel.
///
/// [`apply_power`](Self::apply_power) is the only way to change what the pin
/// does. It is not re-entrant; callers outside the tick interrupt must
/// serialize against it.
pub struct PowerDriver<G, P> {
    /// Output pin
    pin: G,
    /// Timer channel routed to the pin in PWM mode
    pwm: P,
    /// Last applied regime, `None` until the first call
    applied: Option<Regime>,
}

impl<G: PinControl, P: PwmOutput> PowerDriver<G, P> {
    /// Creates a driver. The pin is left untouched until the first
    /// [`apply_power`](Self::apply_power).
    pub fn new(pin: G, pwm: P) -> Self {
        Self {
            pin,
            pwm,
            applied: None,
        }
    }

    /// Puts the output into the regime for `level`.
    ///
    /// Requesting the regime that is already applied touches no peripheral
    /// register, so redundant calls are safe.
    ///
    /// # Returns
    ///
    /// The regime the output is in afterwards
    pub fn apply_power(&mut self, level: PowerLevel) -> Regime {
        let regime = Regime::for_level(level, self.pwm.get_max_duty());
        if self.applied == Some(regime) {
            return regime;
        }

        match regime {
            Regime::Off => {
                self.pwm.disable();
                self.pin.write(Level::Low);
                self.pin.set_mode(PinMode::PushPullOutput);
            }
            Regime::Full => {
                self.pwm.disable();
                self.pin.set_mode(PinMode::FloatingInput);
            }
            Regime::Pwm { compare } => {
                if let Some(Regime::Pwm { .. }) = self.applied {
                    // Already running, the preload register takes the new value
                    self.pwm.set_duty(compare);
                } else {
                    self.pwm.set_polarity(Polarity::NonInverted);
                    self.pwm.set_duty(compare);
                    self.pin.set_mode(PinMode::OpenDrainPwm);
                    self.pwm.enable();
                }
            }
        }

        self.applied = Some(regime);
        regime
    }

    /// Regime applied by the last call, `None` before the first.
    pub fn regime(&self) -> Option<Regime> {
        self.applied
    }

    /// Level currently seen on the output pin.
    pub fn pin_level(&self) -> Level {
        self.pin.read()
    }
}
