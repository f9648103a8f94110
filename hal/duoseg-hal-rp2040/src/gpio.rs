//! GPIO output adapter
//!
//! Wraps an embassy-rp `Output` so display drivers can stay generic over
//! `duoseg_hal::OutputPin`.

use embassy_rp::gpio::{Level, Output, Pin};
use embassy_rp::Peri;

use duoseg_hal::OutputPin;

/// Push-pull output pin
pub struct RpOutput<'d> {
    pin: Output<'d>,
}

impl<'d> RpOutput<'d> {
    /// Configure a pin as an output at the given initial level
    pub fn new(pin: Peri<'d, impl Pin>, initial: duoseg_hal::Level) -> Self {
        let level = match initial {
            duoseg_hal::Level::Low => Level::Low,
            duoseg_hal::Level::High => Level::High,
        };
        Self {
            pin: Output::new(pin, level),
        }
    }

    /// Wrap an already configured output
    pub fn from_output(pin: Output<'d>) -> Self {
        Self { pin }
    }
}

impl OutputPin for RpOutput<'_> {
    fn set_high(&mut self) {
        self.pin.set_high();
    }

    fn set_low(&mut self) {
        self.pin.set_low();
    }

    fn is_set_high(&self) -> bool {
        self.pin.is_set_high()
    }
}
