//! Base-36 digit arithmetic used by rank values
//!
//! Digits are the ASCII characters `0-9` followed by `a-z`. Their byte order
//! matches their numeric order, so comparing digit strings byte by byte
//! compares the numbers they encode.

/// All digits in ascending order
pub const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// The smallest digit
pub const MIN_DIGIT: char = '0';

/// Returns whether `c` belongs to the base-36 alphabet
pub fn is_digit(c: char) -> bool {
    c.is_ascii_digit() || c.is_ascii_lowercase()
}

/// Returns whether `value` is a canonical rank value: non-empty, only made
/// of base-36 digits and not ending with `0`
pub fn is_valid_value(value: &str) -> bool {
    match value.chars().last() {
        None | Some(MIN_DIGIT) => false,
        Some(_) => value.chars().all(is_digit),
    }
}

fn position(c: char) -> Option<usize> {
    ALPHABET.iter().position(|&d| char::from(d) == c)
}

/// Returns the digit following `c`, or None for `z` and for characters
/// outside the alphabet
pub fn succ(c: char) -> Option<char> {
    let next = position(c)? + 1;
    ALPHABET.get(next).copied().map(char::from)
}

/// Returns the digit preceding `c`, or None for `0` and for characters
/// outside the alphabet
pub fn pred(c: char) -> Option<char> {
    let prev = position(c)?.checked_sub(1)?;
    ALPHABET.get(prev).copied().map(char::from)
}
