//! # Zenith geometry for a fixed-pointing sky-quality meter
//!
//! The instrument points straight up, so its line of sight is the local zenith: declination
//! equals the site latitude and right ascension equals the local sidereal time. This module
//! computes, per sample:
//!
//! - [`right_ascension_of_zenith`]: low-precision local sidereal time, in hours `[0, 24)`,
//! - [`galactic_coordinates`]: equatorial → galactic rotation of the zenith direction,
//!   latitude in degrees `[-90, 90]`, longitude in degrees `[0, 360)`.
//!
//! ## Conventions
//!
//! - Longitudes are east-positive (negative = west of Greenwich).
//! - The sidereal model is `100.46 + 0.985647·d + λ + 15·UT` degrees, `d` being days since
//!   J2000.0. It is accurate to a fraction of a degree over the decades this pipeline targets.
//! - The galactic pole constants are the classic B1950-derived values quoted in
//!   [`crate::constants`].
use crate::{
    constants::{
        Degree, Hour, DEC_NGP, DEG_PER_HOUR, GAL_LONG_NCP, RA_NGP, SIDEREAL_ANGLE_J2000,
        SIDEREAL_RATE,
    },
    time::{julian_day_j2000, universal_time_fraction},
};

/// Galactic latitude/longitude of a direction, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GalacticCoordinates {
    pub latitude: Degree,
    pub longitude: Degree,
}

/// Bring an angle into `[0, 360)` by removing whole turns.
///
/// The whole-turn count is truncated toward zero, then a single turn is added back to negative
/// remainders. A remainder that rounds up to exactly 360 is folded to 0.
pub(crate) fn normalize_degrees(angle: Degree) -> Degree {
    let turns = (angle / 360.).trunc();
    let mut reduced = angle - turns * 360.;
    if reduced < 0. {
        reduced += 360.;
    }
    if reduced >= 360. {
        reduced -= 360.;
    }
    reduced
}

/// Right ascension of the local zenith, in hours.
///
/// Arguments
/// ---------
/// * `year`, `month`, `day`, `hour`, `minute`, `second`: UTC timestamp of the sample
/// * `longitude`: site longitude in degrees, east-positive
///
/// Return
/// ------
/// * right ascension in hours, in `[0, 24)`
pub fn right_ascension_of_zenith(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: f64,
    longitude: Degree,
) -> Hour {
    let days = julian_day_j2000(year, month, day, hour, minute, second);
    let ut = universal_time_fraction(hour, minute, second);

    let sidereal = SIDEREAL_ANGLE_J2000 + SIDEREAL_RATE * days + longitude + DEG_PER_HOUR * ut;

    normalize_degrees(sidereal) / DEG_PER_HOUR
}

/// Galactic coordinates of the equatorial direction (`right_ascension`, `declination`).
///
/// Arguments
/// ---------
/// * `right_ascension`: right ascension in hours
/// * `declination`: declination in degrees; for the zenith this is the site latitude
///
/// Return
/// ------
/// * [`GalacticCoordinates`] with longitude normalized to `[0, 360)`
pub fn galactic_coordinates(right_ascension: Hour, declination: Degree) -> GalacticCoordinates {
    let ra = (right_ascension * DEG_PER_HOUR).to_radians();
    let dec = declination.to_radians();
    let ra_ngp = RA_NGP.to_radians();
    let dec_ngp = DEC_NGP.to_radians();

    let (sin_dec, cos_dec) = dec.sin_cos();
    let (sin_dec_ngp, cos_dec_ngp) = dec_ngp.sin_cos();
    let (sin_dra, cos_dra) = (ra - ra_ngp).sin_cos();

    let sin_b = sin_dec * sin_dec_ngp + cos_dec * cos_dec_ngp * cos_dra;
    let latitude = sin_b.clamp(-1., 1.).asin();

    let y = cos_dec * sin_dra;
    let x = sin_dec * cos_dec_ngp - cos_dec * sin_dec_ngp * cos_dra;
    let mut longitude = GAL_LONG_NCP - y.atan2(x).to_degrees();
    if longitude < 0. {
        longitude += 360.;
    }
    if longitude >= 360. {
        longitude -= 360.;
    }

    GalacticCoordinates {
        latitude: latitude.to_degrees(),
        longitude,
    }
}
