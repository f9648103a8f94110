//! Blink scheduling
//!
//! While the stored state has `blinking` set, the display alternates between
//! the stored digits and blank. Each call to [`BlinkScheduler::step`] renders
//! at most one phase and reports how long to wait before the next call; the
//! caller does the waiting, outside of any lock.

use embassy_sync::blocking_mutex::raw::RawMutex;

use crate::config::TimingConfig;
use crate::segment::Digit;
use crate::state::DisplayStateStore;
use crate::traits::DigitDisplay;

/// Phase rendered by the next blinking step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BlinkPhase {
    /// Render the stored digits
    Show,
    /// Render blank
    Blank,
}

/// Outcome of one scheduler step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BlinkStep {
    /// Pair sent to the display, if any
    pub rendered: Option<(Digit, Digit)>,
    /// Time to wait before the next step
    pub wait_ms: u32,
}

/// Show/blank cycle driven from the shared display state
#[derive(Debug, Clone)]
pub struct BlinkScheduler {
    phase: BlinkPhase,
    interval_ms: u32,
    idle_poll_ms: u32,
}

impl BlinkScheduler {
    /// Create a scheduler
    ///
    /// - `interval_ms`: duration of each show and blank phase
    /// - `idle_poll_ms`: re-check period while not blinking
    pub const fn new(interval_ms: u32, idle_poll_ms: u32) -> Self {
        Self {
            phase: BlinkPhase::Show,
            interval_ms,
            idle_poll_ms,
        }
    }

    pub const fn from_config(config: &TimingConfig) -> Self {
        Self::new(config.blink_interval_ms, config.blink_poll_ms)
    }

    /// Phase the next blinking step will render
    pub fn phase(&self) -> BlinkPhase {
        self.phase
    }

    /// Run one phase
    ///
    /// Reads the store once. When blinking, renders the current phase and
    /// flips to the other one; otherwise leaves the display alone and
    /// restarts the cycle at [`BlinkPhase::Show`].
    pub fn step<M: RawMutex, D: DigitDisplay>(
        &mut self,
        store: &DisplayStateStore<M>,
        display: &mut D,
    ) -> BlinkStep {
        let state = store.get();

        if !state.blinking {
            self.phase = BlinkPhase::Show;
            return BlinkStep {
                rendered: None,
                wait_ms: self.idle_poll_ms,
            };
        }

        let pair = match self.phase {
            BlinkPhase::Show => {
                self.phase = BlinkPhase::Blank;
                (state.digit1, state.digit2)
            }
            BlinkPhase::Blank => {
                self.phase = BlinkPhase::Show;
                (Digit::BLANK, Digit::BLANK)
            }
        };

        display.show(pair.0, pair.1);

        BlinkStep {
            rendered: Some(pair),
            wait_ms: self.interval_ms,
        }
    }
}

impl Default for BlinkScheduler {
    fn default() -> Self {
        Self::from_config(&TimingConfig::default())
    }
}
