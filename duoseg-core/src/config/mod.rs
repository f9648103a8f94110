//! Configuration types
//!
//! Board-agnostic configuration. The firmware embeds a TOML file and parses
//! it at boot with [`parse_config`]; anything missing keeps its default.

pub mod parse;
pub mod types;

pub use parse::{parse_config, ConfigError};
pub use types::*;
