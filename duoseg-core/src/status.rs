//! Operator status messages
//!
//! Human-readable lines written back over the serial link. There is no
//! machine-readable contract; wording may change.

use core::fmt;

use crate::input::{DisplayUpdate, InputError};
use crate::segment::Digit;

/// A status line for the operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Status {
    /// Ask for the next line
    Prompt,
    /// A line set a new threshold
    ThresholdUpdated(i8),
    /// Digits accepted and stored
    Displaying {
        digit1: Digit,
        digit2: Digit,
        threshold: i8,
    },
    /// Accepted value is above the threshold
    ExceedsThreshold,
    /// A field had more than two digits; only the first two were used
    Truncated(u8),
    /// Line rejected
    Rejected(InputError),
    /// Idle timeout cleared the display
    IdleReset,
    /// Serial receive error; the partial line was dropped
    ReceiveError,
}

impl Status {
    /// Status lines describing an accepted update, in output order
    pub fn for_update(update: &DisplayUpdate) -> impl Iterator<Item = Status> {
        let truncated = update.truncated.then_some(Status::Truncated(update.number));
        let threshold = update
            .threshold_updated
            .then_some(Status::ThresholdUpdated(update.threshold));
        let displaying = Status::Displaying {
            digit1: update.state.digit1,
            digit2: update.state.digit2,
            threshold: update.threshold,
        };
        let exceeds = update.state.blinking.then_some(Status::ExceedsThreshold);

        truncated
            .into_iter()
            .chain(threshold)
            .chain(core::iter::once(displaying))
            .chain(exceeds)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Prompt => {
                f.write_str("Enter number and threshold (format: 'XX YY'), then press Enter:")
            }
            Status::ThresholdUpdated(threshold) => write!(f, "Threshold updated to {}", threshold),
            Status::Displaying {
                digit1,
                digit2,
                threshold,
            } => write!(
                f,
                "Displaying '{}{}', Threshold: {}",
                digit1.value(),
                digit2.value(),
                threshold
            ),
            Status::ExceedsThreshold => {
                f.write_str("Number exceeds threshold! Continuous blinking...")
            }
            Status::Truncated(number) => {
                write!(f, "Only two digits per field are read; using {}", number)
            }
            Status::Rejected(error) => write!(f, "{}", error),
            Status::IdleReset => f.write_str("No input received for a while. Clearing display."),
            Status::ReceiveError => f.write_str("Serial receive error, line discarded."),
        }
    }
}
