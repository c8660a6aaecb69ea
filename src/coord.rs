//! Fixed-point ("E7") coordinate strings
//!
//! Coordinates never go through floating point. A fixed-point string is an
//! optional `-` followed by the integer degrees and exactly seven fractional
//! digits, e.g. `"506553765"` for 50.6553765°.

use crate::error::FormatError;

/// Number of fractional digits carried by a fixed-point string
pub const FRACTION_DIGITS: usize = 7;

const DEGREE_MARK: char = '°';

/// Convert a decimal degree literal such as `"50.6443831°"` into a
/// fixed-point string.
///
/// The fractional part is truncated or right-padded to seven digits; an
/// empty integer part becomes `"0"`.
pub fn to_fixed_point(literal: &str) -> Result<String, FormatError> {
    let trimmed = literal.trim();
    let trimmed = trimmed.strip_suffix(DEGREE_MARK).unwrap_or(trimmed);
    let (negative, body) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let invalid = || FormatError(literal.to_string());
    let (integer, fraction) = body.split_once('.').ok_or_else(invalid)?;
    if fraction.contains('.') || !is_digits(integer) || !is_digits(fraction) {
        return Err(invalid());
    }

    let integer = if integer.is_empty() { "0" } else { integer };
    let mut fixed = String::with_capacity(integer.len() + FRACTION_DIGITS + 1);
    if negative {
        fixed.push('-');
    }
    fixed.push_str(integer);
    if fraction.len() >= FRACTION_DIGITS {
        fixed.push_str(&fraction[..FRACTION_DIGITS]);
    } else {
        fixed.push_str(fraction);
        fixed.extend(std::iter::repeat_n('0', FRACTION_DIGITS - fraction.len()));
    }
    Ok(fixed)
}

/// Bring a raw E7 integer literal (as found in `latitudeE7`) into
/// fixed-point form.
///
/// Only zero-padding is applied so that the integer part has at least one
/// digit: `"-5000000"` becomes `"-05000000"`.
pub fn from_e7(raw: &str) -> Result<String, FormatError> {
    let (negative, digits) = split_sign(raw);
    if digits.is_empty() || !is_digits(digits) {
        return Err(FormatError(raw.to_string()));
    }
    let (sign, padded) = pad_fixed(negative, digits);
    Ok(format!("{sign}{padded}"))
}

/// Render a fixed-point string as `DD.DDDDDDD`.
///
/// The sign stays in front of the padding and an empty input renders as
/// `"0.0000000"`.
pub fn fixed_point_to_decimal(fixed: &str) -> String {
    let (integer, fraction, sign) = split_fixed(fixed);
    format!("{sign}{integer}.{fraction}")
}

/// Split a fixed-point string into `(integer, fraction, sign)`, padding the
/// digits so the integer part has at least one digit.
pub(crate) fn split_fixed(fixed: &str) -> (String, String, &'static str) {
    let (negative, digits) = split_sign(fixed);
    let (sign, mut padded) = pad_fixed(negative, digits);
    let fraction = padded.split_off(padded.len() - FRACTION_DIGITS);
    (padded, fraction, sign)
}

fn split_sign(s: &str) -> (bool, &str) {
    match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    }
}

fn pad_fixed(negative: bool, digits: &str) -> (&'static str, String) {
    let width = FRACTION_DIGITS + 1;
    let sign = if negative { "-" } else { "" };
    (sign, format!("{digits:0>width$}"))
}

fn is_digits(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_fixed_point() {
        assert_eq!(to_fixed_point("50.6443831°").unwrap(), "506443831");
        assert_eq!(to_fixed_point(" 3.0536723°").unwrap(), "30536723");
        assert_eq!(to_fixed_point("-1.5").unwrap(), "-15000000");
        assert_eq!(to_fixed_point(".25").unwrap(), "02500000");
        assert_eq!(to_fixed_point("-.5°").unwrap(), "-05000000");
        // truncated, not rounded
        assert_eq!(to_fixed_point("12.123456789").unwrap(), "121234567");
    }

    #[test]
    fn test_to_fixed_point_rejects_bad_literals() {
        assert!(to_fixed_point("50").is_err());
        assert!(to_fixed_point("50.1.2").is_err());
        assert!(to_fixed_point("5a.12").is_err());
        assert!(to_fixed_point("").is_err());
    }

    #[test]
    fn test_from_e7() {
        assert_eq!(from_e7("506553765").unwrap(), "506553765");
        assert_eq!(from_e7("30632229").unwrap(), "30632229");
        assert_eq!(from_e7("-5000000").unwrap(), "-05000000");
        assert_eq!(from_e7("12").unwrap(), "00000012");
        assert!(from_e7("").is_err());
        assert!(from_e7("-").is_err());
        assert!(from_e7("1.5").is_err());
    }

    #[test]
    fn test_fixed_point_to_decimal() {
        assert_eq!(fixed_point_to_decimal("987654321"), "98.7654321");
        assert_eq!(fixed_point_to_decimal("0987654321"), "098.7654321");
        assert_eq!(fixed_point_to_decimal("87654321"), "8.7654321");
        assert_eq!(fixed_point_to_decimal("7654321"), "0.7654321");
        assert_eq!(fixed_point_to_decimal(""), "0.0000000");
        assert_eq!(fixed_point_to_decimal("-10000000"), "-1.0000000");
        assert_eq!(fixed_point_to_decimal("-5000000"), "-0.5000000");
    }

    #[test]
    fn test_decimal_round_trip() {
        for fixed in ["506443831", "-1401500000", "00000001", "-05000000", "0987654321"] {
            let decimal = fixed_point_to_decimal(fixed);
            assert_eq!(to_fixed_point(&decimal).unwrap(), fixed, "via {decimal}");
        }
    }
}
