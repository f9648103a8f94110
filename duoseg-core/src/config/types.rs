//! Configuration type definitions

/// Minimum settle time between bus edges (µs)
pub const MIN_SETTLE_US: u32 = 10;

/// Highest display brightness level
pub const MAX_BRIGHTNESS: u8 = 7;

/// Largest value accepted as a threshold in the config file
pub const MAX_THRESHOLD: i8 = 99;

/// Display timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimingConfig {
    /// Duration of each blink phase (ms)
    pub blink_interval_ms: u32,
    /// Blink task re-check period while not blinking (ms)
    pub blink_poll_ms: u32,
    /// Hold time for each clock/data/strobe phase on the display bus (µs)
    pub settle_us: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            blink_interval_ms: 300,
            blink_poll_ms: 100,
            settle_us: MIN_SETTLE_US,
        }
    }
}

/// Serial line input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InputConfig {
    /// Clear the display after this long without a completed line (ms)
    pub idle_timeout_ms: u32,
    /// Maximum wait for a single byte before re-checking the idle timer (ms)
    pub byte_timeout_ms: u32,
    /// Threshold used until a line sets one
    pub default_threshold: i8,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            idle_timeout_ms: 60_000,
            byte_timeout_ms: 100,
            default_threshold: 50,
        }
    }
}

/// Display controller settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayConfig {
    /// Brightness level 0-7 (7 = brightest)
    pub brightness: u8,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            brightness: MAX_BRIGHTNESS,
        }
    }
}

/// Operator serial link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SerialConfig {
    pub baudrate: u32,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self { baudrate: 115_200 }
    }
}

/// Complete device configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceConfig {
    pub timing: TimingConfig,
    pub input: InputConfig,
    pub display: DisplayConfig,
    pub serial: SerialConfig,
}
