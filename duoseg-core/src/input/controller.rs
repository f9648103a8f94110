//! Input controller
//!
//! Line-level state machine:
//!
//! ```text
//!            byte                terminator
//! AWAIT_LINE ─────► AWAIT_LINE ─────────────► LINE_READY ──► process ──► AWAIT_LINE
//!      │
//!      │ no completed line for idle_timeout_ms
//!      ▼
//! IDLE_TIMEOUT ──► blank display, clear blinking ──► AWAIT_LINE
//! ```
//!
//! The controller itself only tracks the line, the threshold and the idle
//! timer. Writing the store and rendering is done by [`commit`] and
//! [`idle_reset`], which the caller runs while holding the display lock.

use embassy_sync::blocking_mutex::raw::RawMutex;

use super::line::{Feed, LineBuffer, LINE_CAPACITY};
use super::parse::{parse_command, Command};
use super::InputError;
use crate::config::InputConfig;
use crate::segment::Digit;
use crate::state::{DisplayState, DisplayStateStore};
use crate::traits::DigitDisplay;

/// Accepted line, ready to be committed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayUpdate {
    /// New display state
    pub state: DisplayState,
    /// Number being displayed (0-99)
    pub number: u8,
    /// Threshold in effect after this line
    pub threshold: i8,
    /// The line carried a threshold
    pub threshold_updated: bool,
    /// A field was longer than two characters and was cut
    pub truncated: bool,
}

/// Turns serial bytes into display updates
#[derive(Debug, Clone)]
pub struct InputController<const N: usize = LINE_CAPACITY> {
    line: LineBuffer<N>,
    threshold: i8,
    idle_timeout_ms: u32,
    last_activity_ms: u32,
}

impl<const N: usize> InputController<N> {
    /// Create a controller; `now_ms` starts the idle timer
    pub fn new(config: &InputConfig, now_ms: u32) -> Self {
        Self {
            line: LineBuffer::new(),
            threshold: config.default_threshold,
            idle_timeout_ms: config.idle_timeout_ms,
            last_activity_ms: now_ms,
        }
    }

    /// Threshold currently in effect
    pub fn threshold(&self) -> i8 {
        self.threshold
    }

    /// A line is partially assembled
    pub fn has_partial_line(&self) -> bool {
        !self.line.is_empty()
    }

    /// Feed one received byte
    ///
    /// Returns `None` until a non-empty line is terminated. Empty lines are
    /// ignored and do not count as activity. Any other completed line,
    /// accepted or rejected, restarts the idle timer.
    pub fn feed(&mut self, byte: u8, now_ms: u32) -> Option<Result<DisplayUpdate, InputError>> {
        match self.line.push(byte) {
            Feed::Pending | Feed::Empty => None,
            Feed::Overflowed => {
                self.last_activity_ms = now_ms;
                Some(Err(InputError::TooLong))
            }
            Feed::Complete => {
                self.last_activity_ms = now_ms;
                let parsed = parse_command(self.line.as_bytes());
                self.line.clear();
                Some(parsed.and_then(|command| self.apply(command)))
            }
        }
    }

    /// Drop the partially received line (after a receive error)
    pub fn discard_line(&mut self) {
        self.line.clear();
    }

    /// Check the idle timer
    ///
    /// Returns `true` once `idle_timeout_ms` has passed since the last
    /// completed line. The partial line is discarded and the timer
    /// restarts; the caller then runs [`idle_reset`].
    pub fn poll_idle(&mut self, now_ms: u32) -> bool {
        if now_ms.wrapping_sub(self.last_activity_ms) < self.idle_timeout_ms {
            return false;
        }

        self.line.clear();
        self.last_activity_ms = now_ms;
        true
    }

    fn apply(&mut self, command: Command) -> Result<DisplayUpdate, InputError> {
        // A two-field line sets the threshold even if the number is rejected
        if let Some(threshold) = command.threshold {
            self.threshold = threshold;
        }

        let (digit1, digit2) = u8::try_from(command.number)
            .ok()
            .and_then(Digit::pair)
            .ok_or(InputError::OutOfRange(command.number))?;

        Ok(DisplayUpdate {
            state: DisplayState::new(digit1, digit2, command.number > self.threshold),
            number: command.number as u8,
            threshold: self.threshold,
            threshold_updated: command.threshold.is_some(),
            truncated: command.truncated,
        })
    }
}

/// Publish an accepted update
///
/// Writes the store, then renders immediately unless the blink scheduler
/// owns the display. Returns whether a render happened.
pub fn commit<M: RawMutex, D: DigitDisplay>(
    update: &DisplayUpdate,
    store: &DisplayStateStore<M>,
    display: &mut D,
) -> bool {
    let state = update.state;
    store.set(state);

    if state.blinking {
        return false;
    }

    display.show(state.digit1, state.digit2);
    true
}

/// Blank the display and stop blinking
pub fn idle_reset<M: RawMutex, D: DigitDisplay>(store: &DisplayStateStore<M>, display: &mut D) {
    store.set(DisplayState::BLANK);
    display.blank();
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::fmt::Write;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;
    use heapless::Vec;
    use proptest::prelude::*;

    struct RecordingDisplay {
        frames: Vec<(u8, u8), 16>,
    }

    impl RecordingDisplay {
        fn new() -> Self {
            Self { frames: Vec::new() }
        }
    }

    impl DigitDisplay for RecordingDisplay {
        fn display_number(&mut self, digit1: u8, digit2: u8, _dot1: bool, _dot2: bool) {
            self.frames.push((digit1, digit2)).unwrap();
        }
    }

    type Store = DisplayStateStore<NoopRawMutex>;

    fn controller() -> InputController {
        InputController::new(&InputConfig::default(), 0)
    }

    /// Feed a whole line, returning the last outcome
    fn send(
        controller: &mut InputController,
        bytes: &[u8],
        now_ms: u32,
    ) -> Option<Result<DisplayUpdate, InputError>> {
        let mut outcome = None;
        for &b in bytes {
            if let Some(result) = controller.feed(b, now_ms) {
                outcome = Some(result);
            }
        }
        outcome
    }

    fn digit(v: u8) -> Digit {
        Digit::new(v).unwrap()
    }

    #[test]
    fn test_number_with_threshold_blinks() {
        let mut controller = controller();
        let store = Store::new();
        let mut display = RecordingDisplay::new();

        let update = send(&mut controller, b"45 30\r", 10).unwrap().unwrap();
        assert_eq!(controller.threshold(), 30);
        assert!(update.threshold_updated);
        assert_eq!(update.state, DisplayState::new(digit(4), digit(5), true));

        // Blinking: the scheduler renders, not the controller
        assert!(!commit(&update, &store, &mut display));
        assert_eq!(store.get(), update.state);
        assert!(display.frames.is_empty());
    }

    #[test]
    fn test_number_below_default_threshold_renders_now() {
        let mut controller = controller();
        let store = Store::new();
        let mut display = RecordingDisplay::new();

        let update = send(&mut controller, b"20\n", 10).unwrap().unwrap();
        assert_eq!(controller.threshold(), 50);
        assert!(!update.threshold_updated);
        assert_eq!(update.state, DisplayState::new(digit(2), digit(0), false));

        assert!(commit(&update, &store, &mut display));
        assert_eq!(display.frames.as_slice(), &[(2, 0)]);
    }

    #[test]
    fn test_equal_to_threshold_does_not_blink() {
        let mut controller = controller();
        let update = send(&mut controller, b"50\n", 10).unwrap().unwrap();
        assert!(!update.state.blinking);

        let update = send(&mut controller, b"51\n", 20).unwrap().unwrap();
        assert!(update.state.blinking);
    }

    #[test]
    fn test_threshold_persists_across_lines() {
        let mut controller = controller();
        send(&mut controller, b"10 5\n", 10).unwrap().unwrap();

        let update = send(&mut controller, b"7\n", 20).unwrap().unwrap();
        assert_eq!(update.threshold, 5);
        assert!(update.state.blinking);
    }

    #[test]
    fn test_invalid_line_leaves_state_unchanged() {
        let mut controller = controller();
        let store = Store::new();
        store.set_digits(digit(3), digit(3), false);

        let outcome = send(&mut controller, b"abc\n", 10).unwrap();
        assert_eq!(outcome, Err(InputError::InvalidFormat));
        assert_eq!(store.get(), DisplayState::new(digit(3), digit(3), false));
        assert_eq!(controller.threshold(), 50);
    }

    #[test]
    fn test_truncated_three_digit_number() {
        let mut controller = controller();
        let update = send(&mut controller, b"150 10\n", 10).unwrap().unwrap();

        assert!(update.truncated);
        assert_eq!(update.number, 15);
        assert_eq!(controller.threshold(), 10);
        assert_eq!(update.state, DisplayState::new(digit(1), digit(5), true));
    }

    #[test]
    fn test_negative_number_out_of_range() {
        let mut controller = controller();
        assert_eq!(
            send(&mut controller, b"-5\n", 10),
            Some(Err(InputError::OutOfRange(-5)))
        );

        // Threshold from the same line is still adopted
        assert_eq!(
            send(&mut controller, b"-5 20\n", 20),
            Some(Err(InputError::OutOfRange(-5)))
        );
        assert_eq!(controller.threshold(), 20);
    }

    #[test]
    fn test_too_long_line_rejected() {
        let mut controller = controller();
        assert_eq!(
            send(&mut controller, b"12 34 56 78\n", 10),
            Some(Err(InputError::TooLong))
        );
        assert!(!controller.has_partial_line());

        // The following line parses normally
        let update = send(&mut controller, b"12\n", 20).unwrap().unwrap();
        assert_eq!(update.number, 12);
    }

    #[test]
    fn test_empty_lines_ignored() {
        let mut controller = controller();
        assert_eq!(send(&mut controller, b"\r\n\n", 10), None);
    }

    #[test]
    fn test_idle_timeout_blanks_display() {
        let mut controller = controller();
        let store = Store::new();
        let mut display = RecordingDisplay::new();

        let update = send(&mut controller, b"99 10\n", 0).unwrap().unwrap();
        commit(&update, &store, &mut display);
        assert!(store.get().blinking);

        assert!(!controller.poll_idle(59_999));
        assert!(controller.poll_idle(60_000));
        idle_reset(&store, &mut display);

        assert_eq!(store.get(), DisplayState::BLANK);
        assert_eq!(display.frames.as_slice(), &[(10, 10)]);

        // Timer restarted
        assert!(!controller.poll_idle(60_001));
        assert!(controller.poll_idle(120_000));
    }

    #[test]
    fn test_completed_line_defers_idle_timeout() {
        let mut controller = controller();
        send(&mut controller, b"xyz\n", 30_000);

        assert!(!controller.poll_idle(60_000));
        assert!(controller.poll_idle(90_000));
    }

    #[test]
    fn test_empty_line_does_not_defer_idle_timeout() {
        let mut controller = controller();
        send(&mut controller, b"\n", 50_000);
        assert!(controller.poll_idle(60_000));
    }

    #[test]
    fn test_idle_timeout_discards_partial_line() {
        let mut controller = controller();
        send(&mut controller, b"4", 100);
        assert!(controller.has_partial_line());

        assert!(controller.poll_idle(60_000));
        assert!(!controller.has_partial_line());
        assert_eq!(controller.feed(b'\n', 60_010), None);
    }

    #[test]
    fn test_idle_timer_survives_wraparound() {
        let mut controller = InputController::<LINE_CAPACITY>::new(&InputConfig::default(), u32::MAX - 10);
        assert!(!controller.poll_idle(5));
        assert!(controller.poll_idle(59_990));
    }

    proptest! {
        #[test]
        fn prop_every_number_splits_into_digits(n in 0u8..=99) {
            let mut controller = controller();
            let mut text: heapless::String<8> = heapless::String::new();
            write!(text, "{}\r", n).unwrap();

            let update = send(&mut controller, text.as_bytes(), 1).unwrap().unwrap();
            prop_assert_eq!(update.state.digit1.value(), n / 10);
            prop_assert_eq!(update.state.digit2.value(), n % 10);
            prop_assert_eq!(update.state.blinking, n > 50);
        }

        #[test]
        fn prop_arbitrary_bytes_keep_digits_in_range(
            bytes in proptest::collection::vec(any::<u8>(), 0..128)
        ) {
            let mut controller = controller();
            let store = Store::new();
            let mut display = RecordingDisplay::new();

            for (i, &b) in bytes.iter().enumerate() {
                if let Some(Ok(update)) = controller.feed(b, i as u32) {
                    display.frames.clear();
                    commit(&update, &store, &mut display);
                }
                let state = store.get();
                prop_assert!(state.digit1.value() <= 10);
                prop_assert!(state.digit2.value() <= 10);
                for &(d1, d2) in display.frames.iter() {
                    prop_assert!(d1 <= 10 && d2 <= 10);
                }
            }
        }
    }
}
