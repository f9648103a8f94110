//! Display controller implementations

pub mod aip1628;

pub use aip1628::{Aip1628, Aip1628Config};
