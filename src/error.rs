//! Error types for configuration and the status register table.
//!
//! Nothing on the interrupt path returns an error. These only surface while
//! building the configuration or when the bus master sends a malformed
//! transaction.

use core::fmt;

/// Rejected [`GrowConfig`](crate::GrowConfig) values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// On-duration longer than one 1440-minute cycle
    OnDurationOutOfRange {
        /// Requested on-duration in minutes
        minutes: u16,
    },

    /// Power level above 100%
    PowerOutOfRange {
        /// Requested power in percent
        percent: u8,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::OnDurationOutOfRange { minutes } => {
                write!(f, "On-duration of {} minutes exceeds 1440", minutes)
            }
            ConfigError::PowerOutOfRange { percent } => {
                write!(f, "Power of {}% exceeds 100%", percent)
            }
        }
    }
}

/// Malformed bus transactions against the status register table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegisterError {
    /// Write transaction carried no register index
    EmptyFrame,

    /// Register index beyond the end of the table
    IndexOutOfRange {
        /// Index sent by the bus master
        index: u8,
        /// Number of registers in the table
        len: usize,
    },
}

impl fmt::Display for RegisterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegisterError::EmptyFrame => write!(f, "Empty register write"),
            RegisterError::IndexOutOfRange { index, len } => {
                write!(f, "Register 0x{:02x} out of range (table has {})", index, len)
            }
        }
    }
}
