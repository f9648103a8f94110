//! Seven-segment encoding
//!
//! Bit layout matches the wiring of the two-digit module behind the
//! AiP1628: bit 5 is the decimal point, the remaining bits drive segments
//! A-G.

/// Digit value rendered as an unlit cell
pub const BLANK: u8 = 10;

/// Decimal point bit
pub const DOT_MASK: u8 = 0x20;

/// Segment patterns for 0-9 followed by blank
pub const SEGMENT_TABLE: [u8; 11] = [
    0b1101_1110, // 0
    0b1000_1000, // 1
    0b0101_1101, // 2
    0b1001_1101, // 3
    0b1000_1011, // 4
    0b1001_0111, // 5
    0b1101_0111, // 6
    0b1000_1100, // 7
    0b1101_1111, // 8
    0b1001_1111, // 9
    0b0000_0000, // blank
];

/// Encode a digit (0-9, or [`BLANK`]) as a segment pattern
///
/// Values above [`BLANK`] are rendered blank. Nothing in this crate
/// produces them; [`Digit`] keeps stored values in range.
pub const fn encode(digit: u8, dot: bool) -> u8 {
    let pattern = if digit <= BLANK {
        SEGMENT_TABLE[digit as usize]
    } else {
        SEGMENT_TABLE[BLANK as usize]
    };

    if dot {
        pattern | DOT_MASK
    } else {
        pattern
    }
}

/// A single display cell value: 0-9 or blank
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Digit(u8);

impl Digit {
    /// Unlit cell
    pub const BLANK: Digit = Digit(BLANK);

    /// Create a digit, returning `None` outside 0-10
    pub const fn new(value: u8) -> Option<Self> {
        if value <= BLANK {
            Some(Digit(value))
        } else {
            None
        }
    }

    /// Split a two-digit number into tens and units
    ///
    /// Returns `None` for values above 99.
    pub const fn pair(number: u8) -> Option<(Digit, Digit)> {
        if number > 99 {
            return None;
        }
        Some((Digit(number / 10), Digit(number % 10)))
    }

    /// Raw value (10 = blank)
    pub const fn value(self) -> u8 {
        self.0
    }

    pub const fn is_blank(self) -> bool {
        self.0 == BLANK
    }

    /// Segment pattern for this digit
    pub const fn segments(self, dot: bool) -> u8 {
        encode(self.0, dot)
    }
}

impl Default for Digit {
    fn default() -> Self {
        Digit::BLANK
    }
}
