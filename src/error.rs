//! Error types shared by the decoder, the filter configuration and the
//! coordinate codec.

use std::io;
use thiserror::Error;

/// Fatal errors raised while walking the input stream.
///
/// Any of these aborts the conversion; the output written so far has no
/// footer and must not be trusted.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Neither `"locations"` nor `"rawSignals"` appears as an object key
    #[error("no \"locations\" or \"rawSignals\" key found before end of input (scanned {offset} bytes)")]
    MissingKey { offset: u64 },

    /// The records key is not followed by an array
    #[error("expected '[' after \"{key}\" key at byte {offset}, found {found}")]
    ExpectedArray {
        key: &'static str,
        offset: u64,
        found: String,
    },

    /// The input ended before the records array was closed
    #[error("input ended inside the records array at byte {offset} after {records} records")]
    UnexpectedEof { offset: u64, records: u64 },

    /// Something other than ',' or ']' follows an array element
    #[error("malformed records array at byte {offset} (record {records}): found {found}")]
    Malformed {
        offset: u64,
        records: u64,
        found: String,
    },

    /// A single array element exceeds the buffering limit
    #[error("record starting at byte {offset} exceeds {limit} bytes")]
    RecordTooLarge { offset: u64, limit: usize },

    #[error("read error at byte {offset}: {source}")]
    Io {
        offset: u64,
        #[source]
        source: io::Error,
    },
}

/// A coordinate literal that cannot be turned into fixed-point form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid coordinate literal {0:?}")]
pub struct FormatError(pub String);

/// Invalid conversion settings, detected before any input is read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid date {0:?}, expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("end date {end} is before start date {start}")]
    EndBeforeStart { start: String, end: String },

    #[error("invalid accuracy {0:?}, expected a non-negative integer")]
    InvalidAccuracy(String),

    #[error("unknown output format {0:?} (expected gpx, kml, tcx, csv or nmea)")]
    UnknownFormat(String),
}

/// Describe the byte found where something else was expected.
pub(crate) fn describe_byte(byte: Option<u8>) -> String {
    match byte {
        Some(b) if b.is_ascii_graphic() => format!("'{}'", b as char),
        Some(b) => format!("byte 0x{b:02x}"),
        None => "end of input".to_string(),
    }
}
