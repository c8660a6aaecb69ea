//! Streaming decoder for location history exports
//!
//! Two layouts are supported:
//!
//! - `Records.json` (Takeout, before 2024): `{"locations": [{"latitudeE7": ..,
//!   "longitudeE7": .., "accuracy": .., "timestamp": ..}, ...]}`
//! - on-device export (since 2024): `{"rawSignals": [{"position": {"LatLng":
//!   "50.6443831°, 3.0536723°", "accuracyMeters": 13, "timestamp": ..}}, ...]}`
//!
//! The input is scanned byte by byte until one of the two keys is found,
//! then the array is consumed one element at a time: only the bytes of the
//! current element are buffered, whatever the size of the export.

use serde::{Deserialize, Deserializer};
use serde_json::value::RawValue;
use std::fmt;
use std::io::{self, BufRead};

use crate::coord;
use crate::error::{DecodeError, FormatError, describe_byte};
use crate::location::{Location, is_timestamp, to_utc};

/// Upper bound on the size of a single array element
pub const MAX_RECORD_BYTES: usize = 16 * 1024 * 1024;

/// The two supported input layouts, selected once per stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schema {
    /// `"locations"` array of E7 records
    Locations,
    /// `"rawSignals"` array of position wrappers
    RawSignals,
}

impl Schema {
    pub fn key(self) -> &'static str {
        match self {
            Schema::Locations => "locations",
            Schema::RawSignals => "rawSignals",
        }
    }

    fn from_key(key: &[u8]) -> Option<Self> {
        match key {
            b"locations" => Some(Schema::Locations),
            b"rawSignals" => Some(Schema::RawSignals),
            _ => None,
        }
    }

    fn decode(self, element: &[u8]) -> Result<Location, RecordError> {
        match self {
            Schema::Locations => serde_json::from_slice::<E7Record>(element)?.into_location(),
            Schema::RawSignals => serde_json::from_slice::<SignalRecord>(element)?.into_location(),
        }
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Schema::Locations => write!(f, "v1 (locations)"),
            Schema::RawSignals => write!(f, "v2 (rawSignals)"),
        }
    }
}

/// Why a single element was skipped
#[derive(Debug)]
enum RecordError {
    Json(serde_json::Error),
    Coordinate(FormatError),
    MissingTimestamp,
    BadTimestamp(String),
}

impl From<serde_json::Error> for RecordError {
    fn from(e: serde_json::Error) -> Self {
        RecordError::Json(e)
    }
}

impl From<FormatError> for RecordError {
    fn from(e: FormatError) -> Self {
        RecordError::Coordinate(e)
    }
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordError::Json(e) => write!(f, "{e}"),
            RecordError::Coordinate(e) => write!(f, "{e}"),
            RecordError::MissingTimestamp => write!(f, "missing timestamp"),
            RecordError::BadTimestamp(t) => write!(f, "invalid timestamp {t:?}"),
        }
    }
}

/// A JSON integer kept as its literal text
#[derive(Debug)]
struct IntLiteral(String);

impl<'de> Deserialize<'de> for IntLiteral {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Box::<RawValue>::deserialize(deserializer)?;
        let text = raw.get();
        let digits = text.strip_prefix('-').unwrap_or(text);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(serde::de::Error::custom(format!("expected an integer, found {text}")));
        }
        Ok(IntLiteral(text.to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct E7Record {
    #[serde(rename = "latitudeE7")]
    latitude_e7: IntLiteral,
    #[serde(rename = "longitudeE7")]
    longitude_e7: IntLiteral,
    accuracy: IntLiteral,
    timestamp: String,
}

impl E7Record {
    fn into_location(self) -> Result<Location, RecordError> {
        if self.timestamp.is_empty() {
            return Err(RecordError::MissingTimestamp);
        }
        if !is_timestamp(&self.timestamp) {
            return Err(RecordError::BadTimestamp(self.timestamp));
        }
        Ok(Location {
            latitude: coord::from_e7(&self.latitude_e7.0)?,
            longitude: coord::from_e7(&self.longitude_e7.0)?,
            accuracy: self.accuracy.0,
            timestamp: self.timestamp,
        })
    }
}

#[derive(Debug, Deserialize)]
struct SignalRecord {
    position: Position,
}

#[derive(Debug, Deserialize)]
struct Position {
    #[serde(rename = "LatLng")]
    lat_lng: String,
    #[serde(rename = "accuracyMeters")]
    accuracy_meters: IntLiteral,
    #[serde(default)]
    timestamp: String,
}

impl SignalRecord {
    fn into_location(self) -> Result<Location, RecordError> {
        let position = self.position;
        if position.timestamp.is_empty() {
            return Err(RecordError::MissingTimestamp);
        }
        let (lat, lon) = position
            .lat_lng
            .split_once(',')
            .ok_or_else(|| FormatError(position.lat_lng.clone()))?;
        let timestamp = to_utc(&position.timestamp);
        if !is_timestamp(&timestamp) {
            return Err(RecordError::BadTimestamp(timestamp));
        }
        Ok(Location {
            latitude: coord::to_fixed_point(lat)?,
            longitude: coord::to_fixed_point(lon)?,
            accuracy: position.accuracy_meters.0,
            timestamp,
        })
    }
}

/// Byte cursor over a buffered reader that tracks its absolute offset
struct ByteReader<R> {
    inner: R,
    offset: u64,
}

impl<R: BufRead> ByteReader<R> {
    fn peek(&mut self) -> Result<Option<u8>, DecodeError> {
        loop {
            match self.inner.fill_buf() {
                Ok(buf) => return Ok(buf.first().copied()),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(source) => {
                    return Err(DecodeError::Io {
                        offset: self.offset,
                        source,
                    });
                }
            }
        }
    }

    fn bump(&mut self) {
        self.inner.consume(1);
        self.offset += 1;
    }

    fn next_byte(&mut self) -> Result<Option<u8>, DecodeError> {
        let byte = self.peek()?;
        if byte.is_some() {
            self.bump();
        }
        Ok(byte)
    }

    fn skip_whitespace(&mut self) -> Result<Option<u8>, DecodeError> {
        loop {
            match self.peek()? {
                Some(b' ' | b'\t' | b'\n' | b'\r') => self.bump(),
                other => return Ok(other),
            }
        }
    }

    /// Consume the rest of a string whose opening quote was already read.
    /// Returns the schema named by the string, if any. `None` from the outer
    /// option means the input ended inside the string.
    fn read_string_key(&mut self) -> Result<Option<Option<Schema>>, DecodeError> {
        const LONGEST_KEY: usize = 10;
        let mut key = Vec::with_capacity(LONGEST_KEY);
        let mut plain = true;
        loop {
            match self.next_byte()? {
                None => return Ok(None),
                Some(b'"') => break,
                Some(b'\\') => {
                    plain = false;
                    if self.next_byte()?.is_none() {
                        return Ok(None);
                    }
                }
                Some(b) => {
                    if key.len() < LONGEST_KEY {
                        key.push(b);
                    } else {
                        plain = false;
                    }
                }
            }
        }
        Ok(Some(if plain { Schema::from_key(&key) } else { None }))
    }
}

/// Lazily decoded location records of one input stream.
///
/// Obtained from [`Records::open`], which performs schema detection. Every
/// call to `next` decodes exactly one array element; malformed elements are
/// counted in [`Records::skipped`] and passed over. A fatal error is yielded
/// once, after which the iterator is exhausted.
pub struct Records<R> {
    reader: ByteReader<R>,
    schema: Schema,
    element: Vec<u8>,
    started: bool,
    done: bool,
    decoded: u64,
    skipped: u64,
}

impl<R: BufRead> Records<R> {
    /// Scan forward to the `"locations"` or `"rawSignals"` key (at any depth)
    /// and position the stream on the first array element.
    pub fn open(inner: R) -> Result<Self, DecodeError> {
        let mut reader = ByteReader { inner, offset: 0 };
        let schema = loop {
            match reader.next_byte()? {
                None => return Err(DecodeError::MissingKey { offset: reader.offset }),
                Some(b'"') => {}
                Some(_) => continue,
            }
            let key = reader
                .read_string_key()?
                .ok_or(DecodeError::MissingKey { offset: reader.offset })?;
            // a matching string is only a key when a ':' follows it
            if let Some(schema) = key
                && reader.skip_whitespace()? == Some(b':')
            {
                reader.bump();
                break schema;
            }
        };

        match reader.skip_whitespace()? {
            Some(b'[') => reader.bump(),
            found => {
                return Err(DecodeError::ExpectedArray {
                    key: schema.key(),
                    offset: reader.offset,
                    found: describe_byte(found),
                });
            }
        }

        Ok(Self {
            reader,
            schema,
            element: Vec::new(),
            started: false,
            done: false,
            decoded: 0,
            skipped: 0,
        })
    }

    pub fn schema(&self) -> Schema {
        self.schema
    }

    /// Number of records successfully decoded so far
    pub fn decoded(&self) -> u64 {
        self.decoded
    }

    /// Number of elements skipped because they could not be decoded
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    /// Byte offset reached in the input
    pub fn offset(&self) -> u64 {
        self.reader.offset
    }

    fn eof(&self) -> DecodeError {
        DecodeError::UnexpectedEof {
            offset: self.reader.offset,
            records: self.decoded + self.skipped,
        }
    }

    /// Buffer the next array element. Returns `false` at the end of the
    /// array.
    fn next_element(&mut self) -> Result<bool, DecodeError> {
        let mut byte = self.reader.skip_whitespace()?;
        if self.started {
            match byte {
                Some(b',') => {
                    self.reader.bump();
                    byte = self.reader.skip_whitespace()?;
                }
                Some(b']') => {}
                None => return Err(self.eof()),
                Some(_) => {
                    return Err(DecodeError::Malformed {
                        offset: self.reader.offset,
                        records: self.decoded + self.skipped,
                        found: describe_byte(byte),
                    });
                }
            }
        }
        match byte {
            None => return Err(self.eof()),
            Some(b']') => {
                self.reader.bump();
                return Ok(false);
            }
            Some(_) => {}
        }
        self.started = true;
        self.capture_value()?;
        Ok(true)
    }

    /// Copy one complete JSON value into the element buffer.
    fn capture_value(&mut self) -> Result<(), DecodeError> {
        self.element.clear();
        let start = self.reader.offset;
        let mut depth = 0usize;
        let mut in_string = false;
        let mut escaped = false;
        loop {
            let Some(b) = self.reader.peek()? else {
                return Err(self.eof());
            };
            if !in_string && depth == 0 && matches!(b, b',' | b']') && !self.element.is_empty() {
                return Ok(());
            }
            self.reader.bump();
            self.element.push(b);
            if self.element.len() > MAX_RECORD_BYTES {
                return Err(DecodeError::RecordTooLarge {
                    offset: start,
                    limit: MAX_RECORD_BYTES,
                });
            }

            if in_string {
                if escaped {
                    escaped = false;
                } else if b == b'\\' {
                    escaped = true;
                } else if b == b'"' {
                    in_string = false;
                }
                continue;
            }
            match b {
                b'"' => in_string = true,
                b'{' | b'[' => depth += 1,
                b'}' | b']' => {
                    // a stray closer at depth 0 ends the element; it will fail to decode
                    if depth <= 1 {
                        return Ok(());
                    }
                    depth -= 1;
                }
                _ => {}
            }
        }
    }
}

impl<R: BufRead> Iterator for Records<R> {
    type Item = Result<Location, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            let start = self.reader.offset;
            match self.next_element() {
                Ok(true) => {}
                Ok(false) => self.done = true,
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
            if self.done {
                break;
            }
            match self.schema.decode(&self.element) {
                Ok(location) => {
                    self.decoded += 1;
                    return Some(Ok(location));
                }
                Err(reason) => {
                    self.skipped += 1;
                    tracing::debug!(
                        record = self.decoded + self.skipped,
                        offset = start,
                        %reason,
                        "skipping undecodable record"
                    );
                }
            }
        }
        None
    }
}
