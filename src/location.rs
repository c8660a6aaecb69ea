//! Normalized location record shared by every stage of the pipeline

use chrono::{DateTime, SecondsFormat, Utc};

/// One location fix after decoding, independent of the input schema.
///
/// `latitude` and `longitude` are fixed-point strings (see [`crate::coord`]),
/// `accuracy` is an integer digit string in meters and `timestamp` is an
/// ISO 8601 UTC string. None of them is ever parsed into a number.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Location {
    pub latitude: String,
    pub longitude: String,
    pub accuracy: String,
    pub timestamp: String,
}

/// Whether `timestamp` has the `YYYY-MM-DDThh:mm:ss` shape the date window
/// and the writers rely on, optionally followed by fractional seconds and a
/// zone (`Z` or `+hh:mm`).
pub fn is_timestamp(timestamp: &str) -> bool {
    const SHAPE: &[u8] = b"dddd-dd-ddTdd:dd:dd";
    let bytes = timestamp.as_bytes();
    if bytes.len() < SHAPE.len() {
        return false;
    }
    let (head, tail) = bytes.split_at(SHAPE.len());
    let head_ok = head.iter().zip(SHAPE).all(|(&b, &s)| match s {
        b'd' => b.is_ascii_digit(),
        _ => b == s,
    });
    head_ok
        && tail
            .iter()
            .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b':' | b'+' | b'-' | b'Z'))
}

/// Rewrite an RFC 3339 timestamp carrying an offset into UTC with a `Z`
/// suffix, e.g. `2024-12-07T17:46:25.000+01:00` -> `2024-12-07T16:46:25Z`. Sub-second
/// digits are dropped.
///
/// A string without any `+` or `-` is taken to be UTC already. Strings that
/// do not parse are returned unchanged.
pub fn to_utc(timestamp: &str) -> String {
    if !timestamp.contains(['+', '-']) {
        return timestamp.to_string();
    }
    match DateTime::parse_from_rfc3339(timestamp) {
        Ok(dt) => dt
            .with_timezone(&Utc)
            .to_rfc3339_opts(SecondsFormat::Secs, true),
        Err(_) => timestamp.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_utc_with_offset() {
        assert_eq!(to_utc("2024-12-07T17:46:25.000+01:00"), "2024-12-07T16:46:25Z");
        assert_eq!(to_utc("2024-12-31T23:30:00.250-02:00"), "2025-01-01T01:30:00Z");
    }

    #[test]
    fn test_to_utc_already_utc() {
        assert_eq!(to_utc("2012-01-27T21:14:42.352Z"), "2012-01-27T21:14:42Z");
        assert_eq!(to_utc("2012-01-27T21:14:42Z"), "2012-01-27T21:14:42Z");
    }

    #[test]
    fn test_timestamp_shape() {
        assert!(is_timestamp("2012-01-27T21:14:42Z"));
        assert!(is_timestamp("2012-01-27T21:14:42.352Z"));
        assert!(is_timestamp("2024-12-07T17:46:25.000+01:00"));
        assert!(!is_timestamp("2012-01-27"));
        assert!(!is_timestamp("2012-01-27 21:14:42Z"));
        assert!(!is_timestamp("2012-01-27T21:14:42</time><x>&"));
        assert!(!is_timestamp(""));
    }

    #[test]
    fn test_to_utc_passthrough() {
        assert_eq!(to_utc("not a date"), "not a date");
        assert_eq!(to_utc("2024-13-45"), "2024-13-45");
    }
}
