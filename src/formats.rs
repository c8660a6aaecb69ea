//! Formats command - Print supported inputs and outputs

use anyhow::Result;

use crate::writers::OutputFormat;

fn describe(format: OutputFormat) -> &'static str {
    match format {
        OutputFormat::Gpx => "GPX 1.1, <trk> per track, <trkseg> per segment",
        OutputFormat::Kml => "KML 2.2, flat list of <Placemark>",
        OutputFormat::Tcx => "TCX v2, <Course> per track, <Track> per segment",
        OutputFormat::Csv => "timestamp,lat,lon,accuracy rows",
        OutputFormat::Nmea => "$GPGGA/$GPRMC sentence pair per point",
    }
}

/// Print the input schemas and output formats handled by `convert`
pub fn print_formats() -> Result<()> {
    println!("Supported inputs:");
    println!("---------------------------------------------------------------");
    println!("{:<30} {}", "Records.json (or .zip)", "\"locations\" array, E7 coordinates");
    println!("{:<30} {}", "device export .json", "\"rawSignals\" array, \"LatLng\" strings");

    println!();
    println!("Supported outputs:");
    println!("---------------------------------------------------------------");
    for format in OutputFormat::ALL {
        let tracks = if format.has_tracks() { "tracks" } else { "points" };
        println!("{:<8} {:<8} {}", format, tracks, describe(format));
    }

    Ok(())
}
