//! Bounded line assembly

use heapless::Vec;

/// Usable characters per line
pub const LINE_CAPACITY: usize = 9;

/// Result of feeding one byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Feed {
    /// Byte stored (or dropped after overflow); no terminator yet
    Pending,
    /// Terminator after at least one character; read with `as_bytes`
    Complete,
    /// Terminator with nothing before it
    Empty,
    /// Terminator after the line overflowed; contents discarded
    Overflowed,
}

/// Fixed-capacity line buffer terminated by CR or LF
///
/// Overflow is reported instead of silently truncating: once more than `N`
/// characters arrive, the rest of the line is dropped and the terminator
/// yields [`Feed::Overflowed`].
#[derive(Debug, Clone, Default)]
pub struct LineBuffer<const N: usize = LINE_CAPACITY> {
    buf: Vec<u8, N>,
    overflowed: bool,
}

impl<const N: usize> LineBuffer<N> {
    pub const fn new() -> Self {
        Self {
            buf: Vec::new(),
            overflowed: false,
        }
    }

    /// Feed one byte
    ///
    /// After [`Feed::Complete`] the line stays readable until [`clear`]
    /// is called.
    ///
    /// [`clear`]: LineBuffer::clear
    pub fn push(&mut self, byte: u8) -> Feed {
        if is_terminator(byte) {
            if self.overflowed {
                self.clear();
                return Feed::Overflowed;
            }
            if self.buf.is_empty() {
                return Feed::Empty;
            }
            return Feed::Complete;
        }

        if !self.overflowed && self.buf.push(byte).is_err() {
            self.overflowed = true;
        }
        Feed::Pending
    }

    /// Characters collected so far
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty() && !self.overflowed
    }

    /// Discard the current line
    pub fn clear(&mut self) {
        self.buf.clear();
        self.overflowed = false;
    }
}

fn is_terminator(byte: u8) -> bool {
    byte == b'\r' || byte == b'\n'
}
