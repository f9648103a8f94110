//! Board-agnostic core logic for the two-digit display firmware
//!
//! Everything here is independent of the microcontroller and builds on the
//! host:
//!
//! - Seven-segment encoding table
//! - Shared display state behind a mutex
//! - Blink scheduling (show/blank cycle)
//! - Serial line input: buffering, parsing, idle timeout
//! - Operator status messages
//! - Configuration types and the embedded config parser
//! - The `DigitDisplay` trait implemented by display drivers

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod blink;
pub mod config;
pub mod input;
pub mod segment;
pub mod state;
pub mod status;
pub mod traits;

pub use segment::Digit;
pub use state::{DisplayState, DisplayStateStore};
pub use traits::DigitDisplay;
