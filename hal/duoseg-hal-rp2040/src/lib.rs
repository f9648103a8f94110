//! RP2040-specific HAL for the display firmware
//!
//! This crate provides RP2040-specific implementations of the shared
//! `duoseg-hal` traits, plus RP2040-specific functionality:
//!
//! - Push-pull GPIO outputs for the display bus
//! - Buffered UART byte reader with a per-byte timeout
//! - Serial settings mapping from the device config

#![no_std]

pub mod gpio;
pub mod uart;

pub use gpio::RpOutput;
pub use uart::{ByteReader, RxError};
