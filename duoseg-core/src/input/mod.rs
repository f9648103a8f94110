//! Serial line input
//!
//! Bytes arrive one at a time from the operator's serial link. They are
//! assembled into lines ([`LineBuffer`]), parsed into a number with an
//! optional new threshold ([`parse_command`]) and turned into a display
//! update by the [`InputController`], which also owns the idle timeout.

pub mod controller;
pub mod line;
pub mod parse;

pub use controller::{commit, idle_reset, DisplayUpdate, InputController};
pub use line::{Feed, LineBuffer, LINE_CAPACITY};
pub use parse::{parse_command, Command};

/// Rejected input line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputError {
    /// Line matches neither `NN TT` nor `NN`
    InvalidFormat,
    /// Number parsed but lies outside 0-99
    OutOfRange(i8),
    /// Line exceeded the buffer before its terminator
    TooLong,
}

impl core::fmt::Display for InputError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            InputError::InvalidFormat => {
                f.write_str("Invalid input! Please enter a number in 'XX YY' format.")
            }
            InputError::OutOfRange(n) => {
                write!(f, "Invalid number {}! Enter a value between 0-99.", n)
            }
            InputError::TooLong => write!(
                f,
                "Line too long! At most {} characters are accepted.",
                LINE_CAPACITY
            ),
        }
    }
}
