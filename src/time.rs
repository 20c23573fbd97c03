//! # Calendar and time utilities
//!
//! Pure functions for the calendar arithmetic the pipeline depends on:
//!
//! - [`day_index_since_epoch`]: day count from 2018-01-01 (the night-index calendar),
//! - [`universal_time_fraction`]: UT as fractional hours,
//! - [`julian_day_j2000`]: low-precision day number since the J2000.0 epoch,
//! - [`is_valid_calendar_date`]: Gregorian date validation through `hifitime`.
//!
//! None of these functions hold state. The day index is only defined for dates on or after
//! 2018-01-01; the CSV reader rejects earlier rows before they reach this module.
use hifitime::Epoch;

use crate::constants::{J2000Days, J2000_DAY_OFFSET, NIGHT_INDEX_EPOCH_YEAR};

/// Cumulative day count at the start of each month, indexed by `[leap][month]`.
const DAYS_BEFORE_MONTH: [[i32; 13]; 2] = [
    [0, 0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334],
    [0, 0, 31, 60, 91, 121, 152, 182, 213, 244, 274, 305, 335],
];

/// Gregorian leap-year rule.
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Day count since 2018-01-01, where 2018-01-01 itself is day 1.
///
/// Arguments
/// ---------
/// * `month`: calendar month, 1–12
/// * `day`: day of month
/// * `year`: calendar year, must be ≥ 2018
///
/// Return
/// ------
/// * the number of days elapsed in complete years since 2018 plus the ordinal day of `year`
///
/// Note
/// ----
/// * The result is meaningless for years before 2018; callers must filter such dates first.
///
/// Panics
/// ------
/// * if `month` is outside 1–12. Timestamps accepted by the CSV reader always pass.
pub fn day_index_since_epoch(month: u32, day: u32, year: i32) -> i32 {
    assert!((1..=12).contains(&month), "month out of range: {month}");
    debug_assert!(year >= NIGHT_INDEX_EPOCH_YEAR, "year before epoch: {year}");

    let leap = is_leap_year(year) as usize;
    let days_this_year = DAYS_BEFORE_MONTH[leap][month as usize] + day as i32;

    let days_previous_years: i32 = (NIGHT_INDEX_EPOCH_YEAR..year)
        .map(|y| if is_leap_year(y) { 366 } else { 365 })
        .sum();

    days_previous_years + days_this_year
}

/// Universal time of day in fractional hours, in `[0, 24)` for valid clock readings.
pub fn universal_time_fraction(hour: u32, minute: u32, second: f64) -> f64 {
    hour as f64 + minute as f64 / 60. + second / 3600.
}

/// Days since the J2000.0 epoch (2000-01-01 12:00 UT).
///
/// Uses the classic low-precision day-number polynomial, valid from 1901 to 2099:
/// `367·y − ⌊7·(y + ⌊(m + 9)/12⌋)/4⌋ + ⌊275·m/9⌋ + d − 730531.5`, all divisions being
/// integer divisions, plus the UT fraction of the day.
///
/// Arguments
/// ---------
/// * `year`, `month`, `day`: UTC calendar date
/// * `hour`, `minute`, `second`: UTC clock time
///
/// Return
/// ------
/// * days since J2000.0, fractional
pub fn julian_day_j2000(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: f64,
) -> J2000Days {
    let month = month as i32;
    let whole_days = 367 * year - (7 * (year + (month + 9) / 12)) / 4 + (275 * month) / 9
        + day as i32;
    let day_fraction = universal_time_fraction(hour, minute, second) / 24.;

    whole_days as f64 - J2000_DAY_OFFSET + day_fraction
}

/// Check that a calendar date exists in the Gregorian calendar.
pub fn is_valid_calendar_date(year: i32, month: u32, day: u32) -> bool {
    let (Ok(month), Ok(day)) = (u8::try_from(month), u8::try_from(day)) else {
        return false;
    };
    Epoch::maybe_from_gregorian_utc(year, month, day, 0, 0, 0, 0).is_ok()
}

#[cfg(test)]
mod time_test {
    use super::*;
    use approx::assert_abs_diff_eq;
    use hifitime::Epoch;

    #[test]
    #[should_panic(expected = "month out of range: 13")]
    fn test_day_index_rejects_month_thirteen() {
        day_index_since_epoch(13, 1, 2021);
    }

    #[test]
    #[should_panic(expected = "month out of range: 0")]
    fn test_day_index_rejects_month_zero() {
        day_index_since_epoch(0, 1, 2021);
    }

    #[test]
    fn test_leap_years() {
        assert!(is_leap_year(2020));
        assert!(is_leap_year(2000));
        assert!(!is_leap_year(2100));
        assert!(!is_leap_year(2021));
    }

    #[test]
    fn test_day_index_anchors() {
        assert_eq!(day_index_since_epoch(1, 1, 2018), 1);
        assert_eq!(day_index_since_epoch(12, 31, 2018), 365);
        assert_eq!(day_index_since_epoch(1, 1, 2019), 366);
        assert_eq!(day_index_since_epoch(2, 29, 2020), 790);
        assert_eq!(day_index_since_epoch(3, 1, 2020), 791);
        assert_eq!(day_index_since_epoch(1, 1, 2021), 1097);
    }

    #[test]
    fn test_day_index_is_contiguous_across_years() {
        let mut previous = day_index_since_epoch(1, 1, 2018);
        for year in 2018..2026 {
            for month in 1..=12u32 {
                for day in 1..=31u32 {
                    if !is_valid_calendar_date(year, month, day) {
                        continue;
                    }
                    let current = day_index_since_epoch(month, day, year);
                    if (year, month, day) != (2018, 1, 1) {
                        assert_eq!(current, previous + 1, "{year}-{month}-{day}");
                    }
                    previous = current;
                }
            }
        }
    }

    #[test]
    fn test_calendar_validation() {
        assert!(is_valid_calendar_date(2020, 2, 29));
        assert!(!is_valid_calendar_date(2021, 2, 29));
        assert!(!is_valid_calendar_date(2021, 13, 1));
        assert!(!is_valid_calendar_date(2021, 4, 31));
    }

    #[test]
    fn test_universal_time_fraction() {
        assert_eq!(universal_time_fraction(0, 0, 0.0), 0.0);
        assert_eq!(universal_time_fraction(15, 30, 0.0), 15.5);
        assert_abs_diff_eq!(
            universal_time_fraction(23, 59, 59.0),
            23.999722222222222,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_julian_day_j2000() {
        assert_eq!(julian_day_j2000(2000, 1, 1, 12, 0, 0.0), 0.0);
        assert_abs_diff_eq!(
            julian_day_j2000(2008, 4, 4, 15, 30, 0.0),
            3016.1458333333335,
            epsilon = 1e-9
        );
        assert_abs_diff_eq!(
            julian_day_j2000(2021, 5, 28, 6, 15, 0.0),
            7817.760416666667,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_julian_day_j2000_against_hifitime() {
        // J2000.0 as a Julian date
        const JD_J2000: f64 = 2_451_545.0;

        for (y, m, d, h, mi, s) in [
            (2018, 1, 1, 0, 0, 0),
            (2019, 3, 10, 10, 5, 30),
            (2020, 2, 29, 23, 59, 59),
            (2023, 11, 9, 13, 16, 2),
        ] {
            let epoch = Epoch::from_gregorian_utc_hms(y, m, d, h, mi, s);
            let expected = epoch.to_jde_utc_days() - JD_J2000;
            let actual =
                julian_day_j2000(y, m as u32, d as u32, h as u32, mi as u32, s as f64);
            assert_abs_diff_eq!(actual, expected, epsilon = 1e-4);
        }
    }
}
