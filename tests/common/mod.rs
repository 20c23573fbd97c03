#![allow(dead_code)]

use hifitime::{Epoch, Unit};
use skyglow::{
    params::RunParams,
    sample::{RawSample, Timestamp},
};

/// Pacific standard time, the offset of every synthetic site below.
pub const PST_OFFSET_HOURS: i64 = -8;

pub fn sunriver_params(half_range: usize) -> RunParams {
    RunParams::builder()
        .latitude(43.8842)
        .longitude(-121.4382)
        .half_range(half_range)
        .build()
        .unwrap()
}

fn timestamp(epoch: Epoch) -> Timestamp {
    let (y, m, d, h, mi, s, _) = epoch.to_gregorian_utc();
    Timestamp::new(y, m as u32, d as u32, h as u32, mi as u32, s as f64)
}

/// A PST sample taken at the given local time; dark sky when `dark` is set.
pub fn sample_at(local: Epoch, msas: f64, dark: bool) -> RawSample {
    let utc = local - Unit::Hour * PST_OFFSET_HOURS;
    RawSample {
        location: "Sunriver".into(),
        utc: timestamp(utc),
        local: timestamp(local),
        celsius: -2.0,
        volts: 5.0,
        msas,
        status: 0,
        moon_phase: 100.0,
        moon_elevation: -25.0,
        moon_illumination: 10.0,
        sun_elevation: if dark { -35.0 } else { -5.0 },
    }
}

/// Local wall-clock time, carried in an `Epoch` so that minute arithmetic rolls dates over.
pub fn local(year: i32, month: u8, day: u8, hour: u8, minute: u8) -> Epoch {
    Epoch::from_gregorian_utc(year, month, day, hour, minute, 0, 0)
}

/// `count` samples every `step_minutes` from `start`, dark between 19:00 and 05:00.
pub fn stream(
    start: Epoch,
    step_minutes: i64,
    count: usize,
    msas: impl Fn(usize) -> f64,
) -> Vec<RawSample> {
    (0..count)
        .map(|i| {
            let at = start + Unit::Minute * (step_minutes * i as i64);
            let hour = timestamp(at).hour;
            sample_at(at, msas(i), !(5..19).contains(&hour))
        })
        .collect()
}
