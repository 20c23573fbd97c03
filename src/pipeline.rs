//! # Streaming pipeline
//!
//! [`Pipeline`] drives the whole computation for one input stream:
//!
//! 1. every parsed sample is handed to the [`NightSegmenter`],
//! 2. each night the segmenter closes is annotated with [`annotate_night`],
//! 3. the annotated night is passed to a [`NightSink`] (the CSV writer, or a plain `Vec`).
//!
//! Nights are processed as soon as they close, so memory stays bounded by one night. A night
//! overflow aborts the run; nights already emitted stay emitted.
//!
//! [`Pipeline::run_reader`] drains an [`SqmReader`] and carries its count of skipped rows into
//! the [`RunSummary`]; [`Pipeline::run`] takes already parsed samples.
//!
//! ```rust
//! use skyglow::{params::RunParams, pipeline::Pipeline};
//! use skyglow::{annotate::AnnotatedSample, sample::RawSample, SkyglowError};
//!
//! let params = RunParams::builder().longitude(-105.0).half_range(1).build().unwrap();
//! let pipeline = Pipeline::new(params, Vec::<AnnotatedSample>::new());
//! let samples = std::iter::empty::<Result<RawSample, SkyglowError>>();
//! let (summary, annotated) = pipeline.run(samples).unwrap();
//! assert_eq!(summary.nights, 0);
//! assert!(annotated.is_empty());
//! ```
use std::{fmt, io};

use itertools::{Itertools, MinMaxResult};
use log::{debug, error, info};

use crate::{
    annotate::{annotate_night, AnnotatedSample},
    night::Night,
    params::RunParams,
    sample::RawSample,
    segmenter::NightSegmenter,
    skyglow_errors::SkyglowError,
    sqm_csv::SqmReader,
};

/// Receives annotated nights, one at a time and in input order.
pub trait NightSink {
    fn emit(&mut self, night: &[AnnotatedSample]) -> Result<(), SkyglowError>;
}

impl NightSink for Vec<AnnotatedSample> {
    fn emit(&mut self, night: &[AnnotatedSample]) -> Result<(), SkyglowError> {
        self.extend_from_slice(night);
        Ok(())
    }
}

/// Counters reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Nights emitted, leading segment included
    pub nights: usize,
    /// Samples emitted
    pub samples: usize,
    /// Input rows skipped by the reader, zero when fed parsed samples
    pub rows_dropped: usize,
    /// Gaps that cut a night short
    pub gaps: usize,
    /// Nights too short for a single roughness window
    pub short_nights: usize,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} nights, {} samples written, {} rows dropped, {} gaps, {} short nights",
            self.nights, self.samples, self.rows_dropped, self.gaps, self.short_nights
        )
    }
}

pub struct Pipeline<S: NightSink> {
    params: RunParams,
    segmenter: NightSegmenter,
    sink: S,
    summary: RunSummary,
}

impl<S: NightSink> Pipeline<S> {
    pub fn new(params: RunParams, sink: S) -> Self {
        info!("Starting SQM attribute run with\n{params:#}");
        Pipeline {
            segmenter: NightSegmenter::new(&params),
            params,
            sink,
            summary: RunSummary::default(),
        }
    }

    pub fn params(&self) -> &RunParams {
        &self.params
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Feed one sample, emitting a night if the sample closed one.
    pub fn push(&mut self, sample: RawSample) -> Result<(), SkyglowError> {
        match self.segmenter.push(sample) {
            Ok(Some(night)) => emit_night(night, &self.params, &mut self.sink, &mut self.summary),
            Ok(None) => Ok(()),
            Err(err) => {
                error!("{err}");
                Err(err)
            }
        }
    }

    /// Flush the last night and return the run counters with the sink.
    pub fn finish(self) -> Result<(RunSummary, S), SkyglowError> {
        let Pipeline {
            params,
            segmenter,
            mut sink,
            mut summary,
        } = self;

        summary.gaps = segmenter.gaps_detected();
        if let Some(night) = segmenter.finish() {
            emit_night(night, &params, &mut sink, &mut summary)?;
        }

        debug!("Pipeline drained: {summary}");
        Ok((summary, sink))
    }

    /// Push every sample of `samples`, then [`Pipeline::finish`].
    ///
    /// The first error, from the source or from segmentation, aborts the run.
    pub fn run<I>(mut self, samples: I) -> Result<(RunSummary, S), SkyglowError>
    where
        I: IntoIterator<Item = Result<RawSample, SkyglowError>>,
    {
        self.drain(samples)?;
        self.finish()
    }

    /// Push every row `reader` yields, then [`Pipeline::finish`].
    ///
    /// The summary reports the rows the reader skipped.
    pub fn run_reader<R: io::Read>(
        mut self,
        mut reader: SqmReader<R>,
    ) -> Result<(RunSummary, S), SkyglowError> {
        self.drain(reader.by_ref())?;
        self.summary.rows_dropped = reader.rows_dropped();
        self.finish()
    }

    fn drain<I>(&mut self, samples: I) -> Result<(), SkyglowError>
    where
        I: IntoIterator<Item = Result<RawSample, SkyglowError>>,
    {
        for sample in samples {
            self.push(sample?)?;
        }
        Ok(())
    }
}

fn emit_night<S: NightSink>(
    night: Night,
    params: &RunParams,
    sink: &mut S,
    summary: &mut RunSummary,
) -> Result<(), SkyglowError> {
    if night.len() < params.window_width() {
        summary.short_nights += 1;
    }
    match night.brightness().minmax_by(f64::total_cmp) {
        MinMaxResult::MinMax(lo, hi) => debug!(
            "Annotating night #{} ({} samples, msas {lo:.2}..{hi:.2})",
            night.ordinal(),
            night.len()
        ),
        _ => debug!("Annotating night #{} ({} samples)", night.ordinal(), night.len()),
    }

    let annotated = annotate_night(night, params);
    sink.emit(&annotated)?;

    summary.nights += 1;
    summary.samples += annotated.len();
    Ok(())
}
