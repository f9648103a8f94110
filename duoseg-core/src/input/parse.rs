//! Line parsing
//!
//! Accepted forms are `"<NN> <TT>"` (number and new threshold) and `"<NN>"`
//! (number only). Each field is read with a width of two characters, sign
//! included, so `"150"` reads as `15` and `"-12"` as `-1`. Digits beyond
//! the width are dropped and reported through [`Command::truncated`].

use super::InputError;

/// Characters read per numeric field
const FIELD_WIDTH: usize = 2;

/// A parsed input line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Command {
    /// Value to display (not yet range-checked)
    pub number: i8,
    /// New threshold, if the line carried one
    pub threshold: Option<i8>,
    /// A field had more digits than the field width
    pub truncated: bool,
}

/// Parse one line (without its terminator)
///
/// The first token must be numeric. A numeric second token becomes the new
/// threshold; a missing or non-numeric second token leaves the threshold
/// alone. Further tokens are ignored.
pub fn parse_command(line: &[u8]) -> Result<Command, InputError> {
    let mut tokens = line
        .split(|b| b.is_ascii_whitespace())
        .filter(|token| !token.is_empty());

    let (number, mut truncated) = tokens
        .next()
        .and_then(scan_field)
        .ok_or(InputError::InvalidFormat)?;

    let threshold = match tokens.next().and_then(scan_field) {
        Some((value, cut)) => {
            truncated |= cut;
            Some(value)
        }
        None => None,
    };

    Ok(Command {
        number,
        threshold,
        truncated,
    })
}

/// Read one signed field of at most [`FIELD_WIDTH`] characters
///
/// The whole token must be an optional sign followed by digits. Returns the
/// value and whether digits were left over.
fn scan_field(token: &[u8]) -> Option<(i8, bool)> {
    let (negative, digits) = match token.split_first() {
        Some((&b'-', rest)) => (true, rest),
        Some((&b'+', rest)) => (false, rest),
        _ => (false, token),
    };

    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }

    let width = FIELD_WIDTH - (token.len() - digits.len());
    let used = &digits[..digits.len().min(width)];
    let magnitude = used
        .iter()
        .fold(0i8, |acc, &d| acc * 10 + (d - b'0') as i8);

    let value = if negative { -magnitude } else { magnitude };
    Some((value, digits.len() > width))
}
