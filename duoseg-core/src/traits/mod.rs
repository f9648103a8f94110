//! Hardware abstraction traits
//!
//! Interfaces between the application logic and the display hardware.

pub mod display;

pub use display::DigitDisplay;
