//! Annotate an SQM brightness log with night averages, roughness and sky geometry.
//!
//! Usage:
//! ```text
//! sqm_attributes <INPUT.csv> <LATITUDE> <LONGITUDE> <HALF_RANGE> [OPTIONS]
//! ```
//!
//! The half range sets the roughness window to `2·HALF_RANGE + 1` samples; with a 5 minute
//! cadence a half range of 9 spans 90 minutes.

use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::Parser;
use log::{error, info};
use skyglow::{
    constants::{DEFAULT_GAP_MAX_MINUTES, DEFAULT_NIGHT_SAMPLE_CAP, DEFAULT_RSE_SCALE},
    params::RunParams,
    pipeline::{Pipeline, RunSummary},
    sqm_csv::{default_output_path, SqmCsvWriter, SqmReader},
    SkyglowError,
};

/// Command line arguments for the SQM attribute tool
#[derive(Parser, Debug)]
#[command(
    name = "sqm_attributes",
    about = "Adds night averages, roughness and galactic coordinates to an SQM CSV export",
    long_about = None
)]
struct Args {
    /// Edited UDM export to read
    input: Utf8PathBuf,

    /// Site latitude in degrees
    #[arg(allow_negative_numbers = true)]
    latitude: f64,

    /// Site longitude in degrees, east positive
    #[arg(allow_negative_numbers = true)]
    longitude: f64,

    /// Samples on each side of the centre of the roughness window
    half_range: usize,

    /// Output CSV path (defaults to <INPUT>_SQM_Attr3.csv)
    #[arg(short, long)]
    output: Option<Utf8PathBuf>,

    /// Largest spacing between samples, in minutes, before the night is cut
    #[arg(long, default_value_t = DEFAULT_GAP_MAX_MINUTES)]
    gap_minutes: i32,

    /// Multiplier applied to the residual standard error
    #[arg(long, default_value_t = DEFAULT_RSE_SCALE)]
    rse_scale: f64,

    /// Samples a single night may hold before the run is aborted
    #[arg(long, default_value_t = DEFAULT_NIGHT_SAMPLE_CAP)]
    max_samples: usize,
}

fn run(args: Args) -> Result<RunSummary, SkyglowError> {
    let params = RunParams::builder()
        .latitude(args.latitude)
        .longitude(args.longitude)
        .half_range(args.half_range)
        .gap_max_minutes(args.gap_minutes)
        .rse_scale(args.rse_scale)
        .night_sample_cap(args.max_samples)
        .build()?;

    let output = args
        .output
        .unwrap_or_else(|| default_output_path(&args.input));
    info!("Reading {} and writing {}", args.input, output);

    let reader = SqmReader::from_path(&args.input)?;
    let writer = SqmCsvWriter::create(&output, &params)?;

    let (summary, writer) = Pipeline::new(params, writer).run_reader(reader)?;
    writer.into_inner()?;

    Ok(summary)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    match run(args) {
        Ok(summary) => {
            info!("Done: {summary}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("Premature end of processing: {err}");
            ExitCode::FAILURE
        }
    }
}
