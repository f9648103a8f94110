//! Two-digit display trait

use crate::segment::Digit;

/// A two-cell seven-segment display
///
/// Rendering is open-loop: the hardware never acknowledges a write, so there
/// is no error path.
pub trait DigitDisplay {
    /// Render two digit values (0-9, 10 = blank) with optional decimal points
    fn display_number(&mut self, digit1: u8, digit2: u8, dot1: bool, dot2: bool);

    /// Render a digit pair without decimal points
    fn show(&mut self, digit1: Digit, digit2: Digit) {
        self.display_number(digit1.value(), digit2.value(), false, false);
    }

    /// Turn both cells off
    fn blank(&mut self) {
        self.show(Digit::BLANK, Digit::BLANK);
    }
}

impl<T: DigitDisplay + ?Sized> DigitDisplay for &mut T {
    fn display_number(&mut self, digit1: u8, digit2: u8, dot1: bool, dot2: bool) {
        T::display_number(self, digit1, digit2, dot1, dot2)
    }
}
