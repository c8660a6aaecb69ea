//! NMEA 0183: a `$GPGGA` / `$GPRMC` sentence pair per location
//!
//! Coordinates are rendered as `DDMM.mmm` from the fixed-point strings with
//! integer arithmetic only. The location history has no HDOP, so it is
//! approximated as accuracy / 4.

use std::io::{self, Write};

use super::Layout;
use crate::coord::split_fixed;
use crate::location::Location;

pub(super) const LAYOUT: Layout = Layout {
    header: "",
    new_segment: "",
    new_track: "",
    footer: "",
    render,
};

fn render(out: &mut dyn Write, loc: &Location) -> io::Result<()> {
    let sentences = sentences(loc).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("cannot build NMEA time from timestamp {:?}", loc.timestamp),
        )
    })?;
    writeln!(out, "{sentences}")
}

/// Convert a fixed-point coordinate into `DDMM.mmm` (sign kept in front).
///
/// Minutes are rounded to three decimals; a rounding up to 60 minutes
/// carries into the degrees.
pub fn degrees_to_deg_min(fixed: &str) -> String {
    let (degrees, fraction, sign) = split_fixed(fixed);
    let fraction: u64 = fraction.parse().unwrap_or(0);
    // thousandths of a minute: fraction * 60 / 10^7 * 1000
    let mut thousandths = (fraction * 60 + 5_000) / 10_000;
    let degrees = if thousandths == 60_000 {
        thousandths = 0;
        (degrees.parse::<u64>().unwrap_or(0) + 1).to_string()
    } else {
        degrees
    };
    format!("{sign}{degrees}{:02}.{:03}", thousandths / 1_000, thousandths % 1_000)
}

/// `DDMM.mmm,N` / `DDMM.mmm,S`, zero-padded to 8 characters
pub fn latitude_field(fixed: &str) -> String {
    hemisphere_field(fixed, 8, 'N', 'S')
}

/// `DDDMM.mmm,E` / `DDDMM.mmm,W`, zero-padded to 9 characters
pub fn longitude_field(fixed: &str) -> String {
    hemisphere_field(fixed, 9, 'E', 'W')
}

fn hemisphere_field(fixed: &str, width: usize, positive: char, negative: char) -> String {
    let deg_min = degrees_to_deg_min(fixed);
    match deg_min.strip_prefix('-') {
        Some(abs) => format!("{abs:0>width$},{negative}"),
        None => format!("{deg_min:0>width$},{positive}"),
    }
}

/// Approximate HDOP as accuracy / 4 with one decimal.
///
/// There is no exact conversion from an accuracy radius to HDOP. Halves are
/// rounded to even, so 5 m gives `1.2` and 7 m gives `1.8`.
pub fn accuracy_to_hdop(accuracy: &str) -> String {
    let accuracy: u64 = accuracy.parse().unwrap_or(0);
    let tenths_x4 = accuracy.saturating_mul(10);
    let mut tenths = tenths_x4 / 4;
    if tenths_x4 % 4 == 2 && tenths % 2 == 1 {
        tenths += 1;
    }
    format!("{}.{}", tenths / 10, tenths % 10)
}

/// XOR of every byte of a sentence body, as two uppercase hex digits
pub fn checksum(body: &str) -> String {
    let crc = body.bytes().fold(0u8, |acc, b| acc ^ b);
    format!("{crc:02X}")
}

/// Both sentences for one location, separated by a newline, without the
/// trailing newline. `None` if the timestamp is not `YYYY-MM-DDThh:mm:ss..`.
pub fn sentences(loc: &Location) -> Option<String> {
    let (date, time) = loc.timestamp.split_once('T')?;
    let mut ymd = date.splitn(3, '-');
    let (year, month, day) = (ymd.next()?, ymd.next()?, ymd.next()?);
    let year = year.get(year.len().checked_sub(2)?..)?;
    let date = format!("{day}{month}{year}");
    let time: String = time.chars().filter(|c| *c != ':' && *c != 'Z').collect();

    let lat = latitude_field(&loc.latitude);
    let lon = longitude_field(&loc.longitude);
    let gga = format!(
        "GPGGA,{time},{lat},{lon},1,04,{},0,M,,,,0000",
        accuracy_to_hdop(&loc.accuracy)
    );
    let rmc = format!("GPRMC,{time},A,{lat},{lon},0.0,0.0,{date},,,A");
    Some(format!("${gga}*{}\n${rmc}*{}", checksum(&gga), checksum(&rmc)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum() {
        assert_eq!(checksum("GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,"), "47");
        assert_eq!(checksum("GPRMC,000253.034,V,5038.664,N,00303.215,E,0.00,0.00,310522,,"), "1C");
        assert_eq!(checksum(""), "00");
    }

    #[test]
    fn test_degrees_to_deg_min() {
        assert_eq!(degrees_to_deg_min("485000000"), "4830.000");
        assert_eq!(degrees_to_deg_min("11310000"), "107.860");
        assert_eq!(degrees_to_deg_min("-10000000"), "-100.000");
        assert_eq!(degrees_to_deg_min("05000000"), "030.000");
        // 0.9999999° is 59.999994', which rounds up to a whole degree
        assert_eq!(degrees_to_deg_min("19999999"), "200.000");
    }

    #[test]
    fn test_latitude_field() {
        assert_eq!(latitude_field("485000000"), "4830.000,N");
        assert_eq!(latitude_field("11310000"), "0107.860,N");
        assert_eq!(latitude_field("-10000000"), "0100.000,S");
        assert_eq!(latitude_field("-05000000"), "0030.000,S");
    }

    #[test]
    fn test_longitude_field() {
        assert_eq!(longitude_field("485000000"), "04830.000,E");
        assert_eq!(longitude_field("11310000"), "00107.860,E");
        assert_eq!(longitude_field("-10000000"), "00100.000,W");
        assert_eq!(longitude_field("-1401500000"), "14009.000,W");
    }

    #[test]
    fn test_accuracy_to_hdop() {
        assert_eq!(accuracy_to_hdop("14"), "3.5");
        assert_eq!(accuracy_to_hdop("4"), "1.0");
        assert_eq!(accuracy_to_hdop("5"), "1.2");
        assert_eq!(accuracy_to_hdop("7"), "1.8");
        assert_eq!(accuracy_to_hdop("0"), "0.0");
        assert_eq!(accuracy_to_hdop(""), "0.0");
    }

    #[test]
    fn test_sentences() {
        let loc = Location {
            timestamp: "2021-05-31T00:02:53Z".into(),
            latitude: "485000000".into(),
            longitude: "11310000".into(),
            accuracy: "14".into(),
        };
        assert_eq!(
            sentences(&loc).unwrap(),
            "$GPGGA,000253,4830.000,N,00107.860,E,1,04,3.5,0,M,,,,0000*0E\n$GPRMC,000253,A,4830.000,N,00107.860,E,0.0,0.0,310521,,,A*77"
        );
    }

    #[test]
    fn test_sentences_reject_bad_timestamp() {
        let loc = Location {
            timestamp: "yesterday".into(),
            ..Default::default()
        };
        assert!(sentences(&loc).is_none());
    }

    #[test]
    fn test_nmea_writer_output() {
        use super::super::{OutputFormat, render_to_string};
        let loc = Location {
            timestamp: "2024-12-07T16:46:25Z".into(),
            latitude: "506443831".into(),
            longitude: "30536723".into(),
            accuracy: "13".into(),
        };
        let out = render_to_string(OutputFormat::Nmea, &[loc]);
        assert_eq!(
            out,
            "$GPGGA,164625,5038.663,N,00303.220,E,1,04,3.2,0,M,,,,0000*05\n$GPRMC,164625,A,5038.663,N,00303.220,E,0.0,0.0,071224,,,A*7D\n"
        );
    }
}
