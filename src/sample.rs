//! # Raw SQM samples
//!
//! [`RawSample`] is one instrument reading as it comes out of the CSV reader: a UTC and a
//! local [`Timestamp`], the sky brightness, instrument housekeeping, and the sun/moon
//! ephemeris columns added by the acquisition software. Samples are immutable once parsed.
use std::fmt;

use crate::{
    constants::{Degree, Msas, DARK_MOON_ELEVATION, DARK_SUN_ELEVATION},
    time::is_valid_calendar_date,
};

/// A civil timestamp split into calendar and clock fields.
///
/// Seconds are kept fractional, as the instrument writes them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timestamp {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: f64,
}

impl Timestamp {
    pub fn new(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: f64) -> Self {
        Timestamp {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    /// Seconds truncated to a whole number, as used by the sidereal computations.
    pub fn whole_second(&self) -> f64 {
        self.second.trunc()
    }

    /// Minutes elapsed since local midnight, ignoring seconds.
    pub fn minute_of_day(&self) -> i32 {
        self.hour as i32 * 60 + self.minute as i32
    }

    /// `true` when the date exists and the clock fields are within range.
    pub fn is_valid(&self) -> bool {
        is_valid_calendar_date(self.year, self.month, self.day)
            && self.hour < 24
            && self.minute < 60
            && (0.0..61.0).contains(&self.second)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second as u32
        )
    }
}

/// One sky-quality-meter reading.
///
/// # Fields
///
/// * `location` - Free-form site label carried through to the output
/// * `utc` - UTC timestamp of the reading
/// * `local` - Local civil timestamp of the reading (may follow daylight-saving time)
/// * `celsius` - Housing temperature
/// * `volts` - Battery voltage
/// * `msas` - Sky brightness in magnitudes per square arcsecond
/// * `status` - Instrument status code
/// * `moon_phase` - Moon phase angle, degrees
/// * `moon_elevation` - Moon elevation above the horizon, degrees
/// * `moon_illumination` - Illuminated fraction of the moon, percent
/// * `sun_elevation` - Sun elevation above the horizon, degrees
#[derive(Debug, Clone, PartialEq)]
pub struct RawSample {
    pub location: String,
    pub utc: Timestamp,
    pub local: Timestamp,
    pub celsius: f64,
    pub volts: f64,
    pub msas: Msas,
    pub status: i32,
    pub moon_phase: Degree,
    pub moon_elevation: Degree,
    pub moon_illumination: f64,
    pub sun_elevation: Degree,
}

impl RawSample {
    /// Astronomically dark: sun below −18° and moon below −10°.
    pub fn is_dark_sky(&self) -> bool {
        self.sun_elevation < DARK_SUN_ELEVATION && self.moon_elevation < DARK_MOON_ELEVATION
    }
}
