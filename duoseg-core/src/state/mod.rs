//! Shared display state
//!
//! The value currently intended for the display. Written by the input
//! controller, read by the blink scheduler.

mod store;

pub use store::DisplayStateStore;

use crate::segment::Digit;

/// What the display should show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayState {
    /// Tens cell
    pub digit1: Digit,
    /// Units cell
    pub digit2: Digit,
    /// Value exceeds the threshold; the blink scheduler owns rendering
    pub blinking: bool,
}

impl DisplayState {
    /// Power-on and idle-reset state
    pub const BLANK: DisplayState = DisplayState {
        digit1: Digit::BLANK,
        digit2: Digit::BLANK,
        blinking: false,
    };

    pub const fn new(digit1: Digit, digit2: Digit, blinking: bool) -> Self {
        Self {
            digit1,
            digit2,
            blinking,
        }
    }
}

impl Default for DisplayState {
    fn default() -> Self {
        Self::BLANK
    }
}
