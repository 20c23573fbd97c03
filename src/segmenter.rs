//! # Night segmentation
//!
//! [`NightSegmenter`] consumes the time-ordered sample stream one sample at a time and cuts it
//! into [`Night`]s. A night opens on the first sample of the local 15:00 hour and runs until
//! the next afternoon's 15:00 hour, unless a data gap cuts it short.
//!
//! ## States
//!
//! | State                                      | Meaning                                                    |
//! |--------------------------------------------|------------------------------------------------------------|
//! | [`SegmenterState::AwaitingNightStart`]     | accumulating; the next 15:xx sample closes the night       |
//! | [`SegmenterState::InNight`]                | the night just opened and we are still in its 15:xx hour   |
//! | [`SegmenterState::InPartialNight`]         | reopened after a gap before 15:00; closes on the next 15:xx |
//!
//! ## Transitions (per incoming sample, local hour `h`)
//!
//! 1. Room check: a night already holding `cap` samples is a fatal error.
//! 2. Gap check: if the spacing to the previous sample exceeds the configured maximum, the
//!    current night is closed immediately. The state becomes `InPartialNight` when `h < 15`,
//!    otherwise `InNight`.
//! 3. `InNight` and `h > 15` → `AwaitingNightStart`.
//! 4. `InPartialNight` and `h == 15` → `AwaitingNightStart`.
//! 5. `AwaitingNightStart` and `h == 15` → close the night, state becomes `InNight`.
//!
//! The sample that triggers a close seeds the next night, so nothing is dropped or
//! duplicated across a boundary. Samples seen before the first 15:00 form a leading segment of
//! their own.
use std::mem;

use log::{debug, warn};

use crate::{
    constants::{MINUTES_PER_DAY, NIGHT_START_HOUR},
    night::Night,
    params::RunParams,
    sample::{RawSample, Timestamp},
    skyglow_errors::SkyglowError,
    time::day_index_since_epoch,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmenterState {
    AwaitingNightStart,
    InNight,
    InPartialNight,
}

/// Absolute spacing in minutes between two local timestamps, seconds ignored.
///
/// The calendar dates are compared as day indices, so one full day of minutes is added per
/// elapsed day: the 23:55 → 00:05 rollover reads as 10 minutes and an outage that lands on the
/// same day of a later month reads as the whole month.
pub fn local_gap_minutes(previous: &Timestamp, current: &Timestamp) -> i32 {
    let elapsed_days = day_index_since_epoch(current.month, current.day, current.year)
        - day_index_since_epoch(previous.month, previous.day, previous.year);

    (elapsed_days * MINUTES_PER_DAY + current.minute_of_day() - previous.minute_of_day()).abs()
}

#[derive(Debug)]
pub struct NightSegmenter {
    state: SegmenterState,
    current: Night,
    gap_max_minutes: i32,
    cap: usize,
    gaps_detected: usize,
}

impl NightSegmenter {
    pub fn new(params: &RunParams) -> Self {
        NightSegmenter {
            state: SegmenterState::AwaitingNightStart,
            current: Night::new(0),
            gap_max_minutes: params.gap_max_minutes,
            cap: params.night_sample_cap,
            gaps_detected: 0,
        }
    }

    pub fn state(&self) -> SegmenterState {
        self.state
    }

    pub fn gaps_detected(&self) -> usize {
        self.gaps_detected
    }

    /// The night being filled.
    pub fn current(&self) -> &Night {
        &self.current
    }

    /// Feed the next sample.
    ///
    /// Return
    /// ------
    /// * `Ok(Some(night))` when this sample closed a non-empty night; the sample itself now
    ///   opens the next one
    /// * `Ok(None)` when the sample was appended to the current night
    /// * `Err(SkyglowError::NightOverflow)` when the current night is already full
    pub fn push(&mut self, sample: RawSample) -> Result<Option<Night>, SkyglowError> {
        self.current.ensure_room(self.cap, &sample)?;

        let hour = sample.local.hour;

        if let Some(previous) = self.current.last() {
            let gap = local_gap_minutes(&previous.local, &sample.local);
            if gap > self.gap_max_minutes {
                warn!(
                    "Found a {gap} minute gap in the data just after {}",
                    previous.local
                );
                self.gaps_detected += 1;
                self.state = if hour < NIGHT_START_HOUR {
                    SegmenterState::InPartialNight
                } else {
                    SegmenterState::InNight
                };
                return Ok(self.close_with(sample));
            }
        }

        match self.state {
            SegmenterState::InNight if hour > NIGHT_START_HOUR => {
                self.state = SegmenterState::AwaitingNightStart;
            }
            SegmenterState::InPartialNight if hour == NIGHT_START_HOUR => {
                self.state = SegmenterState::AwaitingNightStart;
            }
            _ => {}
        }

        if self.state == SegmenterState::AwaitingNightStart && hour == NIGHT_START_HOUR {
            self.state = SegmenterState::InNight;
            return Ok(self.close_with(sample));
        }

        self.current.push(sample);
        Ok(None)
    }

    /// End of stream: hand over whatever is left.
    pub fn finish(self) -> Option<Night> {
        (!self.current.is_empty()).then_some(self.current)
    }

    fn close_with(&mut self, seed: RawSample) -> Option<Night> {
        let ordinal = if self.current.is_empty() {
            self.current.ordinal()
        } else {
            self.current.ordinal() + 1
        };
        let closed = mem::replace(&mut self.current, Night::starting_with(ordinal, seed));

        if closed.is_empty() {
            return None;
        }
        debug!(
            "Closed night #{} with {} samples, next state {:?}",
            closed.ordinal(),
            closed.len(),
            self.state
        );
        Some(closed)
    }
}

#[cfg(test)]
mod segmenter_test {
    use super::*;

    fn at(day: u32, hour: u32, minute: u32) -> RawSample {
        RawSample {
            location: "seg".into(),
            utc: Timestamp::new(2022, 6, day, (hour + 7) % 24, minute, 0.0),
            local: Timestamp::new(2022, 6, day, hour, minute, 0.0),
            celsius: 15.0,
            volts: 5.0,
            msas: 20.5,
            status: 0,
            moon_phase: 0.0,
            moon_elevation: -30.0,
            moon_illumination: 0.0,
            sun_elevation: -30.0,
        }
    }

    fn params() -> RunParams {
        RunParams::builder()
            .latitude(40.0)
            .longitude(-105.0)
            .half_range(1)
            .build()
            .unwrap()
    }

    fn run(samples: Vec<RawSample>, params: &RunParams) -> Vec<Night> {
        let mut segmenter = NightSegmenter::new(params);
        let mut nights = Vec::new();
        for s in samples {
            if let Some(n) = segmenter.push(s).unwrap() {
                nights.push(n);
            }
        }
        nights.extend(segmenter.finish());
        nights
    }

    /// Samples every `step` minutes from (day, hour:minute) for `count` samples.
    fn stream(day: u32, hour: u32, minute: u32, step: u32, count: u32) -> Vec<RawSample> {
        (0..count)
            .map(|i| {
                let total = hour * 60 + minute + i * step;
                at(day + total / 1440, (total / 60) % 24, total % 60)
            })
            .collect()
    }

    #[test]
    fn test_local_gap_minutes() {
        let t = |d, h, m| Timestamp::new(2022, 6, d, h, m, 0.0);
        assert_eq!(local_gap_minutes(&t(1, 20, 0), &t(1, 20, 16)), 16);
        assert_eq!(local_gap_minutes(&t(1, 23, 55), &t(2, 0, 5)), 10);
        assert_eq!(local_gap_minutes(&t(1, 23, 55), &t(2, 1, 5)), 70);
        assert_eq!(local_gap_minutes(&t(1, 20, 30), &t(1, 20, 0)), 30);

        let month_end = Timestamp::new(2022, 6, 30, 23, 58, 0.0);
        let month_start = Timestamp::new(2022, 7, 1, 0, 3, 0.0);
        assert_eq!(local_gap_minutes(&month_end, &month_start), 5);
    }

    #[test]
    fn test_gap_spanning_same_day_of_later_month() {
        let before = Timestamp::new(2022, 6, 1, 20, 0, 0.0);
        let month_later = Timestamp::new(2022, 7, 1, 20, 5, 0.0);
        let year_later = Timestamp::new(2023, 6, 1, 20, 5, 0.0);

        assert_eq!(local_gap_minutes(&before, &month_later), 30 * 1440 + 5);
        assert_eq!(local_gap_minutes(&before, &year_later), 365 * 1440 + 5);
        assert_eq!(local_gap_minutes(&month_later, &before), 30 * 1440 + 5);
    }

    #[test]
    fn test_month_long_outage_splits_the_night() {
        let mut samples = stream(1, 20, 0, 5, 3);
        let mut resumed = at(1, 20, 15);
        resumed.local.month = 7;
        resumed.utc.month = 7;
        samples.push(resumed);

        let params = params();
        let mut segmenter = NightSegmenter::new(&params);
        let mut closed = Vec::new();
        for s in samples {
            closed.extend(segmenter.push(s).unwrap());
        }

        assert_eq!(segmenter.gaps_detected(), 1);
        assert_eq!(closed.len(), 1);
        assert_eq!(closed[0].len(), 3);
        assert_eq!(segmenter.state(), SegmenterState::InNight);
    }

    #[test]
    fn test_two_full_nights_split_at_fifteen_hundred() {
        // 2022-06-01 15:00 → 2022-06-03 14:55, 5 minute cadence
        let samples = stream(1, 15, 0, 5, 2 * 288);
        let nights = run(samples, &params());

        assert_eq!(nights.len(), 2);
        assert_eq!(nights[0].len(), 288);
        assert_eq!(nights[1].len(), 288);
        assert_eq!(nights[0].ordinal(), 0);
        assert_eq!(nights[1].ordinal(), 1);
        assert_eq!(nights[1].samples()[0].local, Timestamp::new(2022, 6, 2, 15, 0, 0.0));
    }

    #[test]
    fn test_leading_partial_segment_before_first_night() {
        let mut samples = stream(1, 14, 0, 5, 12);
        samples.extend(stream(1, 15, 0, 5, 30));
        let nights = run(samples, &params());

        assert_eq!(nights.len(), 2);
        assert_eq!(nights[0].len(), 12);
        assert_eq!(nights[1].len(), 30);
        assert_eq!(nights[1].samples()[0].local.hour, 15);
    }

    #[test]
    fn test_gap_of_seventeen_minutes_splits() {
        let mut samples = stream(1, 20, 0, 1, 10);
        samples.extend(stream(1, 20, 9 + 17, 1, 10));
        let nights = run(samples, &params());

        assert_eq!(nights.len(), 2);
        assert_eq!(nights[0].len(), 10);
        assert_eq!(nights[1].len(), 10);
    }

    #[test]
    fn test_gap_of_sixteen_minutes_does_not_split() {
        let mut samples = stream(1, 20, 0, 1, 10);
        samples.extend(stream(1, 20, 9 + 16, 1, 10));
        let nights = run(samples, &params());

        assert_eq!(nights.len(), 1);
        assert_eq!(nights[0].len(), 20);
    }

    #[test]
    fn test_gap_before_fifteen_reopens_partial_night() {
        let params = params();
        let mut segmenter = NightSegmenter::new(&params);

        // Evening, then a gap until the next morning
        for s in stream(1, 15, 0, 5, 24) {
            assert!(segmenter.push(s).unwrap().is_none());
        }
        let closed = segmenter.push(at(2, 9, 0)).unwrap().unwrap();
        assert_eq!(closed.len(), 24);
        assert_eq!(segmenter.state(), SegmenterState::InPartialNight);
        assert_eq!(segmenter.gaps_detected(), 1);

        // Morning data accumulates until the next 15:xx sample
        for s in stream(2, 9, 5, 5, 71) {
            assert!(segmenter.push(s).unwrap().is_none());
        }
        let partial = segmenter.push(at(2, 15, 0)).unwrap().unwrap();
        assert_eq!(partial.len(), 72);
        assert_eq!(partial.samples()[0].local.hour, 9);
        assert_eq!(segmenter.state(), SegmenterState::InNight);
    }

    #[test]
    fn test_gap_after_fifteen_keeps_fifteen_hour_samples_together() {
        let params = params();
        let mut segmenter = NightSegmenter::new(&params);

        for s in stream(1, 22, 0, 5, 3) {
            segmenter.push(s).unwrap();
        }
        // gap lands inside the 15:xx hour of the next day
        let closed = segmenter.push(at(2, 15, 20)).unwrap().unwrap();
        assert_eq!(closed.len(), 3);
        assert_eq!(segmenter.state(), SegmenterState::InNight);

        // remaining 15:xx samples stay in the new night
        for s in stream(2, 15, 25, 5, 7) {
            assert!(segmenter.push(s).unwrap().is_none());
        }
        assert_eq!(segmenter.state(), SegmenterState::InNight);

        // leaving the 15:xx hour arms the next close
        assert!(segmenter.push(at(2, 16, 0)).unwrap().is_none());
        assert_eq!(segmenter.state(), SegmenterState::AwaitingNightStart);
        assert_eq!(segmenter.current().len(), 9);
    }

    #[test]
    fn test_overflow_is_fatal() {
        let params = RunParams::builder()
            .longitude(-105.0)
            .half_range(1)
            .night_sample_cap(10)
            .build()
            .unwrap();
        let mut segmenter = NightSegmenter::new(&params);

        let samples = stream(1, 16, 0, 1, 11);
        let mut result = Ok(None);
        for s in samples {
            result = segmenter.push(s);
            if result.is_err() {
                break;
            }
        }
        assert_eq!(
            result.unwrap_err(),
            SkyglowError::NightOverflow {
                night: 0,
                cap: 10,
                at: "2022-06-01 16:10:00".into()
            }
        );
    }

    #[test]
    fn test_no_sample_lost_or_duplicated() {
        let mut samples = stream(1, 12, 0, 5, 700);
        // punch a gap
        samples.drain(300..310);
        let expected = samples.len();
        let nights = run(samples, &params());

        assert_eq!(nights.iter().map(Night::len).sum::<usize>(), expected);
    }
}
