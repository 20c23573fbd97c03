//! # SQM CSV input and output
//!
//! Reading
//! -------
//! [`SqmReader`] iterates over an edited UDM export. The first line is a header and is skipped;
//! every other line is expected to carry 21 comma-separated fields:
//!
//! ```text
//! location, UTC y, m, d, h, min, sec, local y, m, d, h, min, sec,
//! celsius, volts, msas, status, moon phase, moon elevation, moon illumination, sun elevation
//! ```
//!
//! Rows that are short, unparsable, carry a NaN or infinite reading, carry an impossible
//! calendar date, or predate 2018 are skipped with a warning and counted
//! ([`SqmReader::rows_dropped`]). Only I/O failures are reported as errors.
//!
//! Writing
//! -------
//! [`SqmCsvWriter`] is a [`NightSink`] that writes one row per annotated sample, with the
//! column layout and numeric formatting downstream plotting tools expect.
use std::{fs::File, io};

use camino::{Utf8Path, Utf8PathBuf};
use csv::{QuoteStyle, ReaderBuilder, StringRecord, Trim, WriterBuilder};
use log::warn;
use serde::Deserialize;
use thiserror::Error;

use crate::{
    annotate::AnnotatedSample,
    constants::NIGHT_INDEX_EPOCH_YEAR,
    params::RunParams,
    pipeline::NightSink,
    sample::{RawSample, Timestamp},
    skyglow_errors::SkyglowError,
};

/// Number of fields in an input row.
pub const SQM_FIELD_COUNT: usize = 21;

/// Suffix appended to the input path when no output path is given.
pub const OUTPUT_SUFFIX: &str = "_SQM_Attr3.csv";

pub const OUTPUT_HEADER: [&str; 23] = [
    "Location",
    "Lat",
    "Long",
    "UTC_Date",
    "UTC_Time",
    "Local_Date",
    "Local_Time",
    "Celsius",
    "Volts",
    "Msas",
    "Status",
    "MoonPhase",
    "MoonElev",
    "MoonIllum",
    "SunElev",
    "MinSince3pmStdTime",
    "Msas_Avg",
    "NightsSince_1118",
    "RightAscensionHr",
    "Galactic_Lat",
    "Galactic_Long",
    "J2000days",
    "ResidStdErr",
];

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseRowError {
    #[error("expected {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },

    #[error("unparsable field: {0}")]
    Unparsable(String),

    #[error("non-finite value in field {0}")]
    NonFinite(&'static str),

    #[error("invalid calendar date or time {0}")]
    InvalidDate(String),

    #[error("{0} is before the 2018-01-01 night index epoch")]
    BeforeEpoch(String),
}

/// Positional layout of one input row.
#[derive(Debug, Deserialize)]
struct SqmRow {
    location: String,
    utc_year: i32,
    utc_month: u32,
    utc_day: u32,
    utc_hour: u32,
    utc_minute: u32,
    utc_second: f64,
    local_year: i32,
    local_month: u32,
    local_day: u32,
    local_hour: u32,
    local_minute: u32,
    local_second: f64,
    celsius: f64,
    volts: f64,
    msas: f64,
    status: i32,
    moon_phase: f64,
    moon_elevation: f64,
    moon_illumination: f64,
    sun_elevation: f64,
}

impl SqmRow {
    /// Name of the first floating point field holding NaN or an infinity.
    fn non_finite_field(&self) -> Option<&'static str> {
        [
            ("utc_second", self.utc_second),
            ("local_second", self.local_second),
            ("celsius", self.celsius),
            ("volts", self.volts),
            ("msas", self.msas),
            ("moon_phase", self.moon_phase),
            ("moon_elevation", self.moon_elevation),
            ("moon_illumination", self.moon_illumination),
            ("sun_elevation", self.sun_elevation),
        ]
        .into_iter()
        .find_map(|(name, value)| (!value.is_finite()).then_some(name))
    }
}

impl From<SqmRow> for RawSample {
    fn from(row: SqmRow) -> Self {
        RawSample {
            location: row.location,
            utc: Timestamp::new(
                row.utc_year,
                row.utc_month,
                row.utc_day,
                row.utc_hour,
                row.utc_minute,
                row.utc_second,
            ),
            local: Timestamp::new(
                row.local_year,
                row.local_month,
                row.local_day,
                row.local_hour,
                row.local_minute,
                row.local_second,
            ),
            celsius: row.celsius,
            volts: row.volts,
            msas: row.msas,
            status: row.status,
            moon_phase: row.moon_phase,
            moon_elevation: row.moon_elevation,
            moon_illumination: row.moon_illumination,
            sun_elevation: row.sun_elevation,
        }
    }
}

/// Parse and validate one input record.
///
/// Fields past the 21st are ignored.
pub fn parse_row(record: &StringRecord) -> Result<RawSample, ParseRowError> {
    if record.len() < SQM_FIELD_COUNT {
        return Err(ParseRowError::FieldCount {
            expected: SQM_FIELD_COUNT,
            found: record.len(),
        });
    }
    let fields: StringRecord = record.iter().take(SQM_FIELD_COUNT).collect();

    let row: SqmRow = fields
        .deserialize(None)
        .map_err(|err| ParseRowError::Unparsable(err.to_string()))?;
    if let Some(field) = row.non_finite_field() {
        return Err(ParseRowError::NonFinite(field));
    }
    let sample = RawSample::from(row);

    for ts in [&sample.utc, &sample.local] {
        if !ts.is_valid() {
            return Err(ParseRowError::InvalidDate(format!(
                "{:04}-{:02}-{:02} {:02}:{:02}:{}",
                ts.year, ts.month, ts.day, ts.hour, ts.minute, ts.second
            )));
        }
        if ts.year < NIGHT_INDEX_EPOCH_YEAR {
            return Err(ParseRowError::BeforeEpoch(ts.to_string()));
        }
    }
    Ok(sample)
}

/// Streaming reader over an SQM CSV export.
pub struct SqmReader<R: io::Read> {
    reader: csv::Reader<R>,
    record: StringRecord,
    rows_dropped: usize,
}

impl SqmReader<File> {
    pub fn from_path(path: &Utf8Path) -> Result<Self, SkyglowError> {
        let file = File::open(path)?;
        Ok(Self::from_reader(file))
    }
}

impl<R: io::Read> SqmReader<R> {
    pub fn from_reader(rdr: R) -> Self {
        let reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(rdr);

        SqmReader {
            reader,
            record: StringRecord::new(),
            rows_dropped: 0,
        }
    }

    /// Number of rows skipped so far.
    pub fn rows_dropped(&self) -> usize {
        self.rows_dropped
    }

    fn skip(&mut self, reason: impl std::fmt::Display) {
        let line = self.record.position().map_or(0, |p| p.line());
        warn!("Skipping input line {line}: {reason}");
        self.rows_dropped += 1;
    }
}

impl<R: io::Read> Iterator for SqmReader<R> {
    type Item = Result<RawSample, SkyglowError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.reader.read_record(&mut self.record) {
                Ok(false) => return None,
                Ok(true) => {}
                Err(err) if err.is_io_error() => return Some(Err(err.into())),
                Err(err) => {
                    self.skip(err);
                    continue;
                }
            }

            match parse_row(&self.record) {
                Ok(sample) => return Some(Ok(sample)),
                Err(reason) => self.skip(reason),
            }
        }
    }
}

/// `<input>_SQM_Attr3.csv`
pub fn default_output_path(input: &Utf8Path) -> Utf8PathBuf {
    Utf8PathBuf::from(format!("{input}{OUTPUT_SUFFIX}"))
}

/// Fields of one output row, formatted.
pub fn format_row(annotated: &AnnotatedSample, params: &RunParams) -> Vec<String> {
    let s = &annotated.sample;
    let stats = &annotated.stats;
    let date = |t: &Timestamp| format!("{:04}-{:02}-{:02}", t.year, t.month, t.day);
    let time = |t: &Timestamp| {
        format!(
            "{:02}:{:02}:{:02}",
            t.hour,
            t.minute,
            t.whole_second() as i64
        )
    };

    vec![
        s.location.clone(),
        format!("{:12.7}", params.latitude),
        format!("{:12.7}", params.longitude),
        date(&s.utc),
        time(&s.utc),
        date(&s.local),
        time(&s.local),
        format!("{:.1}", s.celsius),
        format!("{:.2}", s.volts),
        format!("{:.2}", s.msas),
        format!("{}", s.status),
        format!("{:.1}", s.moon_phase),
        format!("{:.3}", s.moon_elevation),
        format!("{:.1}", s.moon_illumination),
        format!("{:.3}", s.sun_elevation),
        format!("{:04}", stats.minutes_since_3pm),
        format!("{:.6}", stats.night_average.to_legacy()),
        format!("{:04}", stats.night_index),
        format!("{:12.7}", stats.right_ascension),
        format!("{:12.7}", stats.galactic.latitude),
        format!("{:10.5}", stats.galactic.longitude),
        format!("{:.6}", stats.j2000_days),
        format!("{:.6}", stats.roughness.to_legacy(params.rse_scale)),
    ]
}

/// CSV [`NightSink`] producing the annotated SQM file.
pub struct SqmCsvWriter<W: io::Write> {
    writer: csv::Writer<W>,
    params: RunParams,
}

impl SqmCsvWriter<File> {
    pub fn create(path: &Utf8Path, params: &RunParams) -> Result<Self, SkyglowError> {
        let file = File::create(path)?;
        Self::new(file, params)
    }
}

impl<W: io::Write> SqmCsvWriter<W> {
    /// Wrap `out` and write the header line.
    pub fn new(out: W, params: &RunParams) -> Result<Self, SkyglowError> {
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .quote_style(QuoteStyle::Necessary)
            .from_writer(out);
        writer.write_record(OUTPUT_HEADER)?;

        Ok(SqmCsvWriter {
            writer,
            params: params.clone(),
        })
    }

    /// Flush and hand back the underlying writer.
    pub fn into_inner(self) -> Result<W, SkyglowError> {
        self.writer
            .into_inner()
            .map_err(|err| SkyglowError::IoError(err.into_error()))
    }
}

impl<W: io::Write> NightSink for SqmCsvWriter<W> {
    fn emit(&mut self, night: &[AnnotatedSample]) -> Result<(), SkyglowError> {
        for annotated in night {
            self.writer.write_record(format_row(annotated, &self.params))?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
