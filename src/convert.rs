use anyhow::{Context, Result, anyhow};
use flume::{Receiver, Sender};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use crate::decode::Records;
use crate::error::DecodeError;
use crate::filter::LocationFilter;
use crate::location::Location;
use crate::segment::{Boundary, Segmenter};
use crate::writers::{FormatWriter, OutputFormat, TrackWriter};

/// Capacity of the queue between the decoder and the writer
pub const QUEUE_CAPACITY: usize = 100;

/// Progress is reported every this many records read
pub const PROGRESS_EVERY: u64 = 0x8000;

const READ_BUFFER_BYTES: usize = 1 << 20;

/// Options for converting a location history export
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Path to the input .json or .zip file
    pub input_path: String,
    /// Path to the output file
    pub output_path: String,
    /// First day kept, YYYY-MM-DD
    pub start_date: String,
    /// Last day kept (inclusive), YYYY-MM-DD
    pub end_date: String,
    /// Keep only locations with an accuracy up to this many meters
    pub max_accuracy: String,
    /// New track when coordinates share fewer fractional digits than this
    pub track_digits: usize,
    /// New segment when coordinates share fewer fractional digits than this
    pub segment_digits: usize,
    pub format: OutputFormat,
    /// Show progress spinner
    pub show_progress: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            input_path: String::new(),
            output_path: String::new(),
            start_date: String::new(),
            end_date: String::new(),
            max_accuracy: "40".to_string(),
            track_digits: 1,
            segment_digits: 2,
            format: OutputFormat::Gpx,
            show_progress: false,
        }
    }
}

impl ConvertOptions {
    /// Check dates and accuracy and build the location filter.
    pub fn validate(&self) -> Result<LocationFilter> {
        LocationFilter::new(&self.start_date, &self.end_date, &self.max_accuracy)
            .context("invalid conversion settings")
    }
}

/// Counters maintained while converting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConvertStats {
    /// Records decoded from the input
    pub read: u64,
    /// Records passed to the writer
    pub written: u64,
    /// Input elements that could not be decoded
    pub skipped: u64,
    pub segments: u64,
    pub tracks: u64,
}

/// Receives progress from [`convert_stream`]
pub trait ProgressObserver {
    /// Called every [`PROGRESS_EVERY`] records read with the timestamp of
    /// the last one
    fn on_progress(&mut self, stats: &ConvertStats, last_timestamp: &str);

    fn on_finish(&mut self, _stats: &ConvertStats) {}
}

/// Observer that ignores progress
#[derive(Debug, Default)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_progress(&mut self, _stats: &ConvertStats, _last_timestamp: &str) {}
}

/// Terminal spinner showing the running counters
pub struct SpinnerProgress {
    pb: ProgressBar,
    started: Instant,
}

impl SpinnerProgress {
    pub fn new() -> Self {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        Self {
            pb,
            started: Instant::now(),
        }
    }
}

impl Default for SpinnerProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressObserver for SpinnerProgress {
    fn on_progress(&mut self, stats: &ConvertStats, last_timestamp: &str) {
        self.pb.set_message(format!(
            "Read {} positions in {:.2} seconds until {} | wrote {} positions in {} segments in {} tracks",
            stats.read,
            self.started.elapsed().as_secs_f64(),
            last_timestamp,
            stats.written,
            stats.segments,
            stats.tracks
        ));
        self.pb.tick();
    }

    fn on_finish(&mut self, stats: &ConvertStats) {
        self.pb.finish_and_clear();
        println!(
            "Read {} positions in {:.2} seconds ({} skipped)",
            stats.read,
            self.started.elapsed().as_secs_f64(),
            stats.skipped
        );
        println!(
            "Wrote {} positions in {} segments in {} tracks",
            stats.written, stats.segments, stats.tracks
        );
    }
}

/// Convert a location history file into the requested output format
///
/// # Example
///
/// ```rust,no_run
/// use takeout2track::{convert_file, ConvertOptions, OutputFormat};
///
/// let options = ConvertOptions {
///     input_path: "takeout.zip".to_string(),
///     output_path: "history_2012-01-27.gpx".to_string(),
///     start_date: "2012-01-27".to_string(),
///     end_date: "2012-01-27".to_string(),
///     format: OutputFormat::Gpx,
///     ..Default::default()
/// };
///
/// convert_file(&options)?;
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn convert_file(options: &ConvertOptions) -> Result<ConvertStats> {
    // settings errors must surface before any file is touched
    let filter = options.validate()?;

    let mut spinner;
    let mut quiet = NoProgress;
    let progress: &mut (dyn ProgressObserver + Send) = if options.show_progress {
        spinner = SpinnerProgress::new();
        &mut spinner
    } else {
        &mut quiet
    };

    let stats = crate::input::with_input(&options.input_path, |input| {
        let records = open_records(input)?;
        // only replace an existing output once the input is known to be usable
        let out = File::create(&options.output_path)
            .with_context(|| format!("failed to create output: {}", options.output_path))?;
        let mut writer = FormatWriter::new(options.format, out);
        run_pipeline(records, &mut writer, &filter, options, progress)
    })?;

    tracing::info!(
        output = %options.output_path,
        format = %options.format,
        read = stats.read,
        written = stats.written,
        skipped = stats.skipped,
        segments = stats.segments,
        tracks = stats.tracks,
        "conversion finished"
    );
    Ok(stats)
}

/// Run the decode -> filter -> segment -> write pipeline over `input`.
///
/// Decoding runs on the calling thread and feeds a bounded queue drained by
/// a scoped consumer thread that owns the writer. A fatal decode error stops
/// both sides and is returned; the footer is not written in that case.
pub fn convert_stream<R, W>(
    input: R,
    writer: &mut W,
    options: &ConvertOptions,
    progress: &mut (dyn ProgressObserver + Send),
) -> Result<ConvertStats>
where
    R: Read,
    W: TrackWriter + Send,
{
    let filter = options.validate()?;
    let records = open_records(input)?;
    run_pipeline(records, writer, &filter, options, progress)
}

fn open_records<R: Read>(input: R) -> Result<Records<BufReader<R>>> {
    let records = Records::open(BufReader::with_capacity(READ_BUFFER_BYTES, input))
        .context("failed to locate location records")?;
    tracing::info!(schema = %records.schema(), "detected location history schema");
    Ok(records)
}

fn run_pipeline<R, W>(
    mut records: Records<R>,
    writer: &mut W,
    filter: &LocationFilter,
    options: &ConvertOptions,
    progress: &mut (dyn ProgressObserver + Send),
) -> Result<ConvertStats>
where
    R: BufRead,
    W: TrackWriter + Send,
{
    let segmenter = Segmenter::new(options.track_digits, options.segment_digits);
    let (tx, rx) = flume::bounded::<Location>(QUEUE_CAPACITY);
    let cancel = AtomicBool::new(false);

    let (produced, consumed) = std::thread::scope(|s| {
        let consumer = s.spawn(|| consume(rx, writer, filter, segmenter, progress, &cancel));
        let produced = produce(&mut records, tx, &cancel);
        (produced, consumer.join())
    });

    let consumed = consumed.map_err(|_| anyhow!("output thread panicked"))?;
    produced.with_context(|| {
        format!(
            "aborted after {} records, output is incomplete",
            records.decoded() + records.skipped()
        )
    })?;
    let mut stats = consumed.context("failed to write output")?;
    stats.skipped = records.skipped();

    if stats.skipped > 0 {
        tracing::warn!(skipped = stats.skipped, "some records could not be decoded and were skipped");
    }
    progress.on_finish(&stats);
    Ok(stats)
}

fn produce<R: BufRead>(
    records: &mut Records<R>,
    tx: Sender<Location>,
    cancel: &AtomicBool,
) -> Result<(), DecodeError> {
    for record in records.by_ref() {
        if cancel.load(Ordering::Relaxed) {
            break;
        }
        match record {
            Ok(location) => {
                // consumer gone: it failed and reports its own error
                if tx.send(location).is_err() {
                    break;
                }
            }
            Err(e) => {
                cancel.store(true, Ordering::Relaxed);
                return Err(e);
            }
        }
    }
    Ok(())
}

fn consume<W: TrackWriter>(
    rx: Receiver<Location>,
    writer: &mut W,
    filter: &LocationFilter,
    segmenter: Segmenter,
    progress: &mut (dyn ProgressObserver + Send),
    cancel: &AtomicBool,
) -> std::io::Result<ConvertStats> {
    let result = write_locations(rx, writer, filter, segmenter, progress, cancel);
    if result.is_err() {
        cancel.store(true, Ordering::Relaxed);
    }
    result
}

fn write_locations<W: TrackWriter>(
    rx: Receiver<Location>,
    writer: &mut W,
    filter: &LocationFilter,
    mut segmenter: Segmenter,
    progress: &mut (dyn ProgressObserver + Send),
    cancel: &AtomicBool,
) -> std::io::Result<ConvertStats> {
    let mut stats = ConvertStats::default();
    writer.write_header()?;

    for loc in rx.iter() {
        stats.read += 1;
        if filter.accept(&loc) {
            match segmenter.observe(&loc.latitude, &loc.longitude) {
                Boundary::NewTrack => writer.write_new_track()?,
                Boundary::NewSegment => writer.write_new_segment()?,
                Boundary::First | Boundary::Continue => {}
            }
            writer.write_location(&loc)?;
            stats.written += 1;
        }
        if stats.read % PROGRESS_EVERY == 0 {
            stats.segments = segmenter.segments();
            stats.tracks = segmenter.tracks();
            progress.on_progress(&stats, &loc.timestamp);
        }
    }

    stats.segments = segmenter.segments();
    stats.tracks = segmenter.tracks();
    // the decoder aborted: leave the document unterminated
    if !cancel.load(Ordering::Relaxed) {
        writer.write_footer()?;
    }
    writer.flush()?;
    Ok(stats)
}
