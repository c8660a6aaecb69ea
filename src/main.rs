use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use takeout2track::cli::{Cli, Commands, default_output_name};
use takeout2track::{ConvertOptions, OutputFormat, convert, formats, inspect};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
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
            let format: OutputFormat = format.parse()?;
            let end = end.unwrap_or_else(|| start.clone());
            let output_path = out.unwrap_or_else(|| default_output_name(&start, &end, format.extension()));
            let options = ConvertOptions {
                input_path: input,
                output_path,
                start_date: start,
                end_date: end,
                max_accuracy: accuracy,
                track_digits,
                segment_digits,
                format,
                show_progress: !no_progress,
            };
            convert::convert_file(&options).map(|_| ())
        }
        Commands::Inspect { input } => inspect::inspect_input(&input),
        Commands::Formats {} => formats::print_formats(),
    }
}
