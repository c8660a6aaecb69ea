//! Output formats
//!
//! Every format is described by a [`Layout`]: fixed header, footer and
//! boundary strings plus a function rendering one location. Formats without
//! a track/segment structure (KML, CSV, NMEA) leave the boundary strings
//! empty.

use std::fmt;
use std::io::{self, BufWriter, Write};
use std::str::FromStr;

use crate::error::ConfigError;
use crate::location::Location;

pub mod csv;
pub mod gpx;
pub mod kml;
pub mod nmea;
pub mod tcx;

/// Sink for the pipeline's output events
pub trait TrackWriter {
    fn write_header(&mut self) -> io::Result<()>;
    fn write_location(&mut self, loc: &Location) -> io::Result<()>;
    fn write_new_segment(&mut self) -> io::Result<()>;
    fn write_new_track(&mut self) -> io::Result<()>;
    fn write_footer(&mut self) -> io::Result<()>;
    fn flush(&mut self) -> io::Result<()>;
}

/// Static description of an output format
pub struct Layout {
    pub header: &'static str,
    pub new_segment: &'static str,
    pub new_track: &'static str,
    pub footer: &'static str,
    pub render: fn(&mut dyn Write, &Location) -> io::Result<()>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Gpx,
    Kml,
    Tcx,
    Csv,
    Nmea,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 5] = [
        OutputFormat::Gpx,
        OutputFormat::Kml,
        OutputFormat::Tcx,
        OutputFormat::Csv,
        OutputFormat::Nmea,
    ];

    /// File extension, also the name accepted on the command line
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Gpx => "gpx",
            OutputFormat::Kml => "kml",
            OutputFormat::Tcx => "tcx",
            OutputFormat::Csv => "csv",
            OutputFormat::Nmea => "nmea",
        }
    }

    pub fn layout(self) -> &'static Layout {
        match self {
            OutputFormat::Gpx => &gpx::LAYOUT,
            OutputFormat::Kml => &kml::LAYOUT,
            OutputFormat::Tcx => &tcx::LAYOUT,
            OutputFormat::Csv => &csv::LAYOUT,
            OutputFormat::Nmea => &nmea::LAYOUT,
        }
    }

    /// Whether the format can represent track and segment boundaries
    pub fn has_tracks(self) -> bool {
        !self.layout().new_track.is_empty()
    }
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        OutputFormat::ALL
            .into_iter()
            .find(|f| f.extension() == lower)
            .ok_or_else(|| ConfigError::UnknownFormat(s.to_string()))
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.extension())
    }
}

/// Buffered [`TrackWriter`] driven by a format [`Layout`]
pub struct FormatWriter<W: Write> {
    out: BufWriter<W>,
    layout: &'static Layout,
}

impl<W: Write> FormatWriter<W> {
    pub fn new(format: OutputFormat, out: W) -> Self {
        Self {
            out: BufWriter::new(out),
            layout: format.layout(),
        }
    }

    /// Flush and return the underlying writer.
    pub fn into_inner(self) -> io::Result<W> {
        self.out.into_inner().map_err(|e| e.into_error())
    }
}

impl<W: Write> TrackWriter for FormatWriter<W> {
    fn write_header(&mut self) -> io::Result<()> {
        self.out.write_all(self.layout.header.as_bytes())
    }

    fn write_location(&mut self, loc: &Location) -> io::Result<()> {
        (self.layout.render)(&mut self.out, loc)
    }

    fn write_new_segment(&mut self) -> io::Result<()> {
        self.out.write_all(self.layout.new_segment.as_bytes())
    }

    fn write_new_track(&mut self) -> io::Result<()> {
        self.out.write_all(self.layout.new_track.as_bytes())
    }

    fn write_footer(&mut self) -> io::Result<()> {
        self.out.write_all(self.layout.footer.as_bytes())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

#[cfg(test)]
pub(crate) fn sample_location() -> Location {
    Location {
        latitude: "506553765".into(),
        longitude: "-30632229".into(),
        accuracy: "24".into(),
        timestamp: "2012-01-27T21:14:42.352Z".into(),
    }
}

#[cfg(test)]
pub(crate) fn render_to_string(format: OutputFormat, locations: &[Location]) -> String {
    let mut writer = FormatWriter::new(format, Vec::new());
    writer.write_header().unwrap();
    for (i, loc) in locations.iter().enumerate() {
        if i == 1 {
            writer.write_new_segment().unwrap();
        } else if i == 2 {
            writer.write_new_track().unwrap();
        }
        writer.write_location(loc).unwrap();
    }
    writer.write_footer().unwrap();
    String::from_utf8(writer.into_inner().unwrap()).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_str() {
        assert_eq!("gpx".parse::<OutputFormat>().unwrap(), OutputFormat::Gpx);
        assert_eq!("KML".parse::<OutputFormat>().unwrap(), OutputFormat::Kml);
        assert_eq!("Nmea".parse::<OutputFormat>().unwrap(), OutputFormat::Nmea);
        assert_eq!(
            "geojson".parse::<OutputFormat>(),
            Err(ConfigError::UnknownFormat("geojson".into()))
        );
    }

    #[test]
    fn test_track_capable_formats() {
        assert!(OutputFormat::Gpx.has_tracks());
        assert!(OutputFormat::Tcx.has_tracks());
        assert!(!OutputFormat::Kml.has_tracks());
        assert!(!OutputFormat::Csv.has_tracks());
        assert!(!OutputFormat::Nmea.has_tracks());
    }

    #[test]
    fn test_boundaries_are_noops_without_tracks() {
        let loc = sample_location();
        let out = render_to_string(OutputFormat::Csv, &[loc.clone(), loc.clone(), loc]);
        assert_eq!(out.lines().count(), 4);
    }
}
