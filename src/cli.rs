use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "takeout2track",
    about = "Convert Google location history exports into GPX, KML, TCX, CSV or NMEA tracks",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract the locations of a date range into a track file
    Convert {
        /// Input file: Records.json, a device export .json, or a Takeout .zip
        input: String,
        /// Start date in YYYY-MM-DD format
        #[arg(short = 's', long = "start")]
        start: String,
        /// End date in YYYY-MM-DD format (inclusive, defaults to the start date)
        #[arg(short = 'e', long = "end")]
        end: Option<String>,
        /// Keep only locations with an accuracy up to this many meters
        #[arg(short = 'a', long = "accuracy", default_value = "40")]
        accuracy: String,
        /// New track if coordinates have fewer than this many digits in common
        #[arg(short = 't', long = "track-digits", default_value_t = 1)]
        track_digits: usize,
        /// New segment if coordinates have fewer than this many digits in common
        #[arg(short = 'g', long = "segment-digits", default_value_t = 2)]
        segment_digits: usize,
        /// Output format (gpx|kml|tcx|csv|nmea)
        #[arg(short = 'f', long = "format", default_value = "gpx")]
        format: String,
        /// Output file name [default: history_<start>_<end>.<format>]
        #[arg(short = 'o', long = "out")]
        out: Option<String>,
        /// Hide the progress spinner
        #[arg(long = "no-progress", action = ArgAction::SetTrue)]
        no_progress: bool,
    },

    /// Show the detected schema, record count and time span of an input
    Inspect {
        /// Input file (.json or .zip)
        input: String,
    },

    /// List supported input schemas and output formats
    Formats {},
}

/// `history_<start>.<ext>` for a single day, `history_<start>_<end>.<ext>`
/// otherwise
pub fn default_output_name(start: &str, end: &str, extension: &str) -> String {
    if start == end {
        format!("history_{}.{}", start, extension)
    } else {
        format!("history_{}_{}.{}", start, end, extension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_convert_defaults() {
        let cli = Cli::parse_from(["takeout2track", "convert", "-s", "2012-01-27", "takeout.zip"]);
        match cli.command {
            Commands::Convert {
                input,
                start,
                end,
                accuracy,
                track_digits,
                segment_digits,
                format,
                out,
                no_progress,
            } => {
                assert_eq!(input, "takeout.zip");
                assert_eq!(start, "2012-01-27");
                assert_eq!(end, None);
                assert_eq!(accuracy, "40");
                assert_eq!((track_digits, segment_digits), (1, 2));
                assert_eq!(format, "gpx");
                assert_eq!(out, None);
                assert!(!no_progress);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_default_output_name() {
        assert_eq!(default_output_name("2012-01-27", "2012-01-27", "gpx"), "history_2012-01-27.gpx");
        assert_eq!(
            default_output_name("2012-01-01", "2012-01-31", "kml"),
            "history_2012-01-01_2012-01-31.kml"
        );
    }
}
