//! Grow-light controller core.
//!
//! Hardware-independent part of the Tidegrow firmware: the software clock,
//! the daily light-cycle scheduler and the power output driver that switches
//! the single LED driver pin between its three electrical regimes.
//!
//! # Control Flow
//!
//! ```text
//! 1 Hz interrupt -> GrowController::on_tick
//!                     -> ClockState::tick (every 60 ticks: next minute)
//!                     -> schedule::is_light_on
//!                     -> PowerDriver::apply_power
//! ```
//!
//! The reporting loop only reads [`state::Snapshot`]s and never touches the
//! controller.
//!
//! # Module Organization
//!
//! - [`clock`] - seconds/minute-of-day arithmetic
//! - [`schedule`] - on/off decision and time to the next transition
//! - [`power`] - pin/PWM capabilities and the regime-switching driver
//! - [`state`] - interrupt-written, loop-read shared state
//! - [`controller`] - binds clock, scheduler and driver for the interrupt
//! - [`registers`] - passive status register table for the bus master
//! - [`report`] - human-readable status line
//! - [`config`] / [`error`] - validated configuration and error types

#![cfg_attr(not(test), no_std)]

pub mod clock;
pub mod config;
pub mod controller;
pub mod error;
pub mod power;
pub mod registers;
pub mod report;
pub mod schedule;
pub mod state;

pub use clock::{ClockState, MINUTES_PER_DAY, SECONDS_PER_MINUTE};
pub use config::{GrowConfig, PowerLevel};
pub use controller::GrowController;
pub use error::{ConfigError, RegisterError};
pub use power::{Level, PinControl, PinMode, Polarity, PowerDriver, PwmOutput, Regime};
pub use registers::{RegisterObserver, StatusRegisters};
pub use report::Report;
pub use schedule::Transition;
pub use state::{SharedState, Snapshot, StateWriter};
