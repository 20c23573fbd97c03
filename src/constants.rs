//! # Constants and type definitions for skyglow
//!
//! This module centralizes the **astronomical constants**, **pipeline defaults**, and
//! **common type aliases** used throughout the crate.
//!
//! ## Overview
//!
//! - Hour-angle conversion and the galactic pole constants used by [`crate::geometry`]
//! - Calendar anchors (the 2018-01-01 night-index epoch, the J2000 day-number offset)
//! - Default run parameters (gap threshold, roughness scale, night sample cap)
//! - Dark-sky elevation limits used by [`crate::aggregate`]
//! - Legacy sentinel values written by [`crate::sqm_csv`]

// -------------------------------------------------------------------------------------------------
// Angles
// -------------------------------------------------------------------------------------------------

/// Degrees of hour angle per hour
pub const DEG_PER_HOUR: f64 = 15.0;

// -------------------------------------------------------------------------------------------------
// Galactic frame (equatorial coordinates of the north galactic pole)
// -------------------------------------------------------------------------------------------------

/// Right ascension of the north galactic pole, degrees
pub const RA_NGP: Degree = 192.85948;

/// Declination of the north galactic pole, degrees
pub const DEC_NGP: Degree = 27.12825;

/// Galactic longitude of the north celestial pole, degrees
pub const GAL_LONG_NCP: Degree = 122.93192;

// -------------------------------------------------------------------------------------------------
// Low-precision sidereal model
// -------------------------------------------------------------------------------------------------

/// Local sidereal angle at J2000.0 (degrees) in the low-precision zenith RA formula
pub const SIDEREAL_ANGLE_J2000: Degree = 100.46;

/// Daily advance of the sidereal angle (degrees per day) in the same formula
pub const SIDEREAL_RATE: f64 = 0.985647;

/// Constant term of the whole-day J2000 day-number polynomial
pub const J2000_DAY_OFFSET: f64 = 730_531.5;

// -------------------------------------------------------------------------------------------------
// Calendar
// -------------------------------------------------------------------------------------------------

/// First year of the night-index calendar (day 1 is 2018-01-01)
pub const NIGHT_INDEX_EPOCH_YEAR: i32 = 2018;

/// Local hour at which a night starts
pub const NIGHT_START_HOUR: u32 = 15;

/// Minutes-since-3pm value of local midnight (standard time)
pub const MIDNIGHT_MINUTES: i32 = 540;

/// Fold threshold used when the sample looks like daylight-saving time
pub const MIDNIGHT_MINUTES_DST: i32 = 480;

/// Minutes in a civil day
pub const MINUTES_PER_DAY: i32 = 24 * 60;

// -------------------------------------------------------------------------------------------------
// Pipeline defaults
// -------------------------------------------------------------------------------------------------

/// Largest tolerated spacing between consecutive samples before a night is cut (minutes)
pub const DEFAULT_GAP_MAX_MINUTES: i32 = 16;

/// Multiplier applied to the residual standard error for readability
pub const DEFAULT_RSE_SCALE: f64 = 1000.0;

/// Maximum number of samples in one night (one per minute for 24 hours)
pub const DEFAULT_NIGHT_SAMPLE_CAP: usize = 1500;

/// Sun must be lower than this for a sample to count as astronomically dark
pub const DARK_SUN_ELEVATION: Degree = -18.0;

/// Moon must be lower than this for a sample to count as astronomically dark
pub const DARK_MOON_ELEVATION: Degree = -10.0;

// -------------------------------------------------------------------------------------------------
// Legacy output sentinels
// -------------------------------------------------------------------------------------------------

/// Night average written when no dark-sky sample contributes
pub const NIGHT_AVERAGE_NOT_APPLICABLE: f64 = -1.0;

/// Roughness written for samples without a full window, as a multiple of the RSE scale
pub const NO_WINDOW_FACTOR: f64 = 999.0;

/// Roughness written for numerically degenerate windows, as a multiple of the RSE scale
pub const DEGENERATE_FACTOR: f64 = 888.0;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Right ascension expressed in hours
pub type Hour = f64;
/// Sky brightness in magnitudes per square arcsecond
pub type Msas = f64;
/// Days elapsed since the J2000.0 epoch
pub type J2000Days = f64;
/// Signed day count since 2018-01-01, folded so that post-midnight samples join the evening
pub type NightIndex = i32;
