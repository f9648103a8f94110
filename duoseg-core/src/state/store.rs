//! Mutex-guarded display state

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;

use super::DisplayState;
use crate::segment::Digit;

/// Display state shared between the input controller and the blink scheduler
///
/// Every access is a single lock acquisition that copies the whole state in
/// or out, so a reader never sees `digit1` from one update paired with
/// `digit2` from another. Critical sections are O(1) and never span an
/// await.
///
/// With `CriticalSectionRawMutex` the lock masks interrupts, which rules out
/// priority inversion between tasks for the duration of a copy.
pub struct DisplayStateStore<M: RawMutex> {
    inner: Mutex<M, Cell<DisplayState>>,
}

impl<M: RawMutex> DisplayStateStore<M> {
    /// Create a store holding [`DisplayState::BLANK`]
    pub const fn new() -> Self {
        Self::with_state(DisplayState::BLANK)
    }

    pub const fn with_state(state: DisplayState) -> Self {
        Self {
            inner: Mutex::new(Cell::new(state)),
        }
    }

    /// Replace the whole state
    pub fn set(&self, state: DisplayState) {
        self.inner.lock(|cell| cell.set(state));
    }

    /// Replace the whole state from its parts
    pub fn set_digits(&self, digit1: Digit, digit2: Digit, blinking: bool) {
        self.set(DisplayState::new(digit1, digit2, blinking));
    }

    /// Copy of the current state
    pub fn get(&self) -> DisplayState {
        self.inner.lock(|cell| cell.get())
    }
}

impl<M: RawMutex> Default for DisplayStateStore<M> {
    fn default() -> Self {
        Self::new()
    }
}
