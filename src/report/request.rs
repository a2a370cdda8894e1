//! Status request parameters.

use crate::serial::Origin;

/// How much the report carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportStyle {
    /// Live state only.
    #[default]
    Base,
    /// Live state plus machine identity.
    Extended,
}

impl ReportStyle {
    /// `S1` selects the extended block; any other value, or none, does not.
    pub fn from_param(style: Option<i32>) -> Self {
        match style {
            Some(1) => Self::Extended,
            _ => Self::Base,
        }
    }
}

/// One inbound status request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportRequest {
    pub origin: Origin,
    pub style: ReportStyle,
}

impl ReportRequest {
    pub fn new(origin: Origin, style: ReportStyle) -> Self {
        Self { origin, style }
    }

    /// Build a request from the argument text following the command word,
    /// e.g. `"S1"`.
    pub fn from_args(args: &str, origin: Origin) -> Self {
        Self::new(origin, ReportStyle::from_param(int_param(args, 'S')))
    }
}

/// Integer value of parameter `letter`.
///
/// `None` when the letter is absent. A letter with no digits reads as 0,
/// and parsing stops at the first non-digit (`S1.5` is 1).
pub fn int_param(args: &str, letter: char) -> Option<i32> {
    let word = args
        .split_ascii_whitespace()
        .find(|w| w.chars().next().is_some_and(|c| c.eq_ignore_ascii_case(&letter)))?;
    let value = &word[letter.len_utf8()..];

    let (negative, digits) = match value.as_bytes().first() {
        Some(b'-') => (true, &value[1..]),
        Some(b'+') => (false, &value[1..]),
        _ => (false, value),
    };
    let mut n: i32 = 0;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        n = n.saturating_mul(10).saturating_add(i32::from(b - b'0'));
    }
    Some(if negative { -n } else { n })
}
