//! Tick handler binding clock, scheduler and power driver.
//!
//! The firmware builds one [`GrowController`], calls [`boot`] before the
//! tick interrupt is started, then moves it into the interrupt handler, which
//! calls [`on_tick`] once per second. Tests drive [`on_tick`] directly.
//!
//! [`boot`]: GrowController::boot
//! [`on_tick`]: GrowController::on_tick

use crate::clock::ClockState;
use crate::config::{GrowConfig, PowerLevel};
use crate::power::{PinControl, PowerDriver, PwmOutput, Regime};
use crate::schedule;
use crate::state::StateWriter;

pub struct GrowController<'a, G, P> {
    config: GrowConfig,
    clock: ClockState,
    writer: StateWriter<'a>,
    driver: PowerDriver<G, P>,
}

impl<'a, G: PinControl, P: PwmOutput> GrowController<'a, G, P> {
    pub fn new(config: GrowConfig, writer: StateWriter<'a>, driver: PowerDriver<G, P>) -> Self {
        Self {
            config,
            clock: ClockState::BOOT,
            writer,
            driver,
        }
    }

    /// Establishes the output state for minute 0.
    ///
    /// Must run once before the tick interrupt is enabled.
    ///
    /// # Returns
    ///
    /// Whether the light is on
    pub fn boot(&mut self) -> bool {
        self.writer.publish_clock(self.clock);
        self.update_light()
    }

    /// Interrupt body: advances the clock by one second and re-evaluates the
    /// schedule on every minute boundary.
    ///
    /// Bounded and allocation-free; never waits.
    pub fn on_tick(&mut self) {
        let minute_changed = self.clock.tick();
        self.writer.publish_clock(self.clock);
        if minute_changed {
            self.update_light();
        }
    }

    fn update_light(&mut self) -> bool {
        let on = schedule::is_light_on(
            self.clock.minute_of_day(),
            self.config.on_duration_minutes(),
        );
        let level = if on { self.config.power() } else { PowerLevel::OFF };

        let previous = self.driver.regime();
        let regime = self.driver.apply_power(level);
        self.writer.publish_light(on);

        #[cfg(feature = "defmt")]
        if previous != Some(regime) {
            defmt::info!(
                "Minute {}: light {}, output {}",
                self.clock.minute_of_day(),
                if on { "ON" } else { "OFF" },
                regime
            );
        }
        #[cfg(not(feature = "defmt"))]
        let _ = (previous, regime);

        on
    }

    pub fn clock(&self) -> ClockState {
        self.clock
    }

    /// Regime currently applied to the output.
    pub fn regime(&self) -> Option<Regime> {
        self.driver.regime()
    }
}
