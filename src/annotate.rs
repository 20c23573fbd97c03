//! # Per-sample annotation of a closed night
//!
//! Once the segmenter closes a [`Night`], [`annotate_night`] turns every [`RawSample`] into an
//! [`AnnotatedSample`]: the sample itself plus a [`WindowStat`] with
//!
//! - minutes since 3pm local *standard* time (the regression abscissa),
//! - the night-average brightness ([`crate::aggregate`]),
//! - the roughness score ([`crate::roughness`]),
//! - the folded night index,
//! - zenith right ascension, galactic coordinates, and J2000 day number
//!   ([`crate::geometry`], [`crate::time`]).
//!
//! ## Minutes since 3pm
//!
//! Local clock time jumps by an hour at daylight-saving changes, which would tear the
//! regression abscissa apart. Instead, the UTC hour is shifted by the site's whole-hour
//! longitude offset ([`RunParams::hour_offset`]) and the shifted hour is used:
//!
//! ```text
//! shifted > 14 : (shifted − 15)·60 + minute + round(second / 60)
//! otherwise    : 540 + shifted·60 + minute + round(second / 60)
//! ```
//!
//! The shifted hour is not wrapped into `0..24`; negative values land on the morning branch.
//!
//! ## Night index
//!
//! The local calendar date gives a day count since 2018-01-01. Post-midnight samples are folded
//! back onto the evening they belong to by subtracting one day once minutes-since-3pm reaches
//! 540 (midnight, standard time). When the shifted hour differs from the local hour the sample
//! is taken to be on daylight-saving time and the threshold drops to 480. The test is made per
//! sample, so samples near the threshold can fold differently from their neighbours.
use itertools::izip;
use log::warn;

use crate::{
    aggregate::{night_averages, NightAverage},
    constants::{Hour, J2000Days, NightIndex, MIDNIGHT_MINUTES, MIDNIGHT_MINUTES_DST},
    geometry::{galactic_coordinates, right_ascension_of_zenith, GalacticCoordinates},
    night::Night,
    params::RunParams,
    roughness::{roughness_profile, Roughness},
    sample::{RawSample, Timestamp},
    time::{day_index_since_epoch, julian_day_j2000},
};

/// Derived attributes of one sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowStat {
    pub minutes_since_3pm: i32,
    pub night_average: NightAverage,
    pub roughness: Roughness,
    pub night_index: NightIndex,
    pub right_ascension: Hour,
    pub galactic: GalacticCoordinates,
    pub j2000_days: J2000Days,
}

/// A raw sample together with its derived attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedSample {
    pub sample: RawSample,
    pub stats: WindowStat,
}

/// Minutes since 3pm local standard time, computed from the UTC clock.
///
/// Arguments
/// ---------
/// * `utc`: UTC timestamp of the sample
/// * `hour_offset`: whole-hour longitude offset, see [`RunParams::hour_offset`]
pub fn minutes_since_3pm(utc: &Timestamp, hour_offset: i32) -> i32 {
    let shifted_hour = utc.hour as i32 + hour_offset;
    let rounded_minute = (utc.second / 60.0).round() as i32;

    if shifted_hour > 14 {
        (shifted_hour - 15) * 60 + utc.minute as i32 + rounded_minute
    } else {
        MIDNIGHT_MINUTES + shifted_hour * 60 + utc.minute as i32 + rounded_minute
    }
}

/// `true` when the local hour matches the longitude-shifted UTC hour.
pub fn is_standard_time(sample: &RawSample, hour_offset: i32) -> bool {
    sample.utc.hour as i32 + hour_offset == sample.local.hour as i32
}

/// Night index of a sample: local day count since 2018-01-01, folded after midnight.
pub fn night_index(sample: &RawSample, minutes_since_3pm: i32, hour_offset: i32) -> NightIndex {
    let days = day_index_since_epoch(sample.local.month, sample.local.day, sample.local.year);

    let fold_at = if is_standard_time(sample, hour_offset) {
        MIDNIGHT_MINUTES
    } else {
        MIDNIGHT_MINUTES_DST
    };

    if minutes_since_3pm >= fold_at {
        days - 1
    } else {
        days
    }
}

/// Geometry of the zenith at the sample's UTC time (seconds truncated).
fn zenith_geometry(utc: &Timestamp, params: &RunParams) -> (Hour, GalacticCoordinates, J2000Days) {
    let second = utc.whole_second();
    let ra = right_ascension_of_zenith(
        utc.year,
        utc.month,
        utc.day,
        utc.hour,
        utc.minute,
        second,
        params.longitude,
    );
    let galactic = galactic_coordinates(ra, params.latitude);
    let j2000 = julian_day_j2000(utc.year, utc.month, utc.day, utc.hour, utc.minute, second);
    (ra, galactic, j2000)
}

/// Annotate every sample of a closed night, preserving order.
pub fn annotate_night(night: Night, params: &RunParams) -> Vec<AnnotatedSample> {
    let hour_offset = params.hour_offset();
    let ordinal = night.ordinal();
    let samples = night.into_samples();

    let minutes: Vec<i32> = samples
        .iter()
        .map(|s| minutes_since_3pm(&s.utc, hour_offset))
        .collect();
    let averages = night_averages(&samples);

    if samples.len() < params.window_width() {
        warn!(
            "Night #{ordinal} only has {} samples, fewer than the {} needed for a roughness window",
            samples.len(),
            params.window_width()
        );
    }
    let xs: Vec<f64> = minutes.iter().map(|&m| m as f64).collect();
    let ys: Vec<f64> = samples.iter().map(|s| s.msas).collect();
    let roughness = roughness_profile(&xs, &ys, params.half_range, params.rse_scale);

    izip!(samples, minutes, averages, roughness)
        .map(|(sample, minutes, night_average, roughness)| {
            let (right_ascension, galactic, j2000_days) = zenith_geometry(&sample.utc, params);
            let stats = WindowStat {
                minutes_since_3pm: minutes,
                night_average,
                roughness,
                night_index: night_index(&sample, minutes, hour_offset),
                right_ascension,
                galactic,
                j2000_days,
            };
            AnnotatedSample { sample, stats }
        })
        .collect()
}
