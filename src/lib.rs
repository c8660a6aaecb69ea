//! takeout2track - Convert Google location history exports into GPS tracks
//!
//! This library streams a location history export (the Takeout
//! `Records.json` "locations" layout or the newer on-device "rawSignals"
//! layout) and writes the points of a date range as GPX, KML, TCX, CSV or
//! NMEA.
//!
//! # Features
//!
//! - **Streaming**: the JSON array is decoded one element at a time, so
//!   multi-gigabyte exports run in bounded memory
//! - **Exact coordinates**: coordinates stay fixed-point digit strings from
//!   input to output, never floating point
//! - **Filtering**: inclusive date range and maximum accuracy
//! - **Tracks and segments**: split when consecutive points share too few
//!   fractional digits
//! - **Takeout bundles**: `Records.json` is read straight out of the .zip
//!
//! # Example
//!
//! ```rust
//! use takeout2track::{convert_stream, ConvertOptions, FormatWriter, NoProgress, OutputFormat};
//!
//! let input = r#"{"locations": [{"latitudeE7": 506553765, "longitudeE7": 30632229,
//!     "accuracy": 24, "timestamp": "2012-01-27T21:14:42.352Z"}]}"#;
//! let options = ConvertOptions {
//!     start_date: "2012-01-27".to_string(),
//!     end_date: "2012-01-27".to_string(),
//!     format: OutputFormat::Csv,
//!     ..Default::default()
//! };
//!
//! let mut writer = FormatWriter::new(options.format, Vec::new());
//! let stats = convert_stream(input.as_bytes(), &mut writer, &options, &mut NoProgress)?;
//! assert_eq!(stats.written, 1);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod cli;
pub mod convert;
pub mod coord;
pub mod decode;
pub mod error;
pub mod filter;
pub mod formats;
pub mod input;
pub mod inspect;
pub mod location;
pub mod segment;
pub mod writers;

// Re-export main types for convenience
pub use convert::{
    ConvertOptions, ConvertStats, NoProgress, ProgressObserver, convert_file, convert_stream,
};
pub use decode::{Records, Schema};
pub use error::{ConfigError, DecodeError, FormatError};
pub use location::Location;
pub use writers::{FormatWriter, OutputFormat, TrackWriter};
