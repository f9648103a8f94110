//! Hardware driver implementations
//!
//! Concrete implementations of the traits defined in duoseg-core:
//!
//! - LED display controllers (AiP1628 / TM1628, bit-banged)

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod display;
