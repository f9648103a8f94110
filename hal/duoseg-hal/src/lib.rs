//! duoseg Hardware Abstraction Layer
//!
//! Traits implemented by chip-specific HALs so that the display driver and
//! the application logic can be built and tested on the host.
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  duoseg-drivers / duoseg-firmware       │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  duoseg-hal (this crate - traits)       │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  duoseg-hal-rp2040                      │
//! └─────────────────────────────────────────┘
//! ```
//!
//! Delays are not abstracted here; drivers take any
//! `embedded_hal::delay::DelayNs`.

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;

pub use gpio::{Level, OutputPin};
