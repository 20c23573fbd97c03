//! # Run parameters
//!
//! [`RunParams`] gathers everything the pipeline needs besides the samples themselves:
//! the site position, the roughness window half-range, and the tunable constants
//! (gap threshold, roughness scale, night sample cap).
//!
//! Build it through [`RunParams::builder`], which validates ranges:
//!
//! ```rust
//! use skyglow::params::RunParams;
//!
//! let params = RunParams::builder()
//!     .latitude(43.7916667)
//!     .longitude(-120.23422)
//!     .half_range(9)
//!     .gap_max_minutes(20)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(params.window_width(), 19);
//! ```
use std::cmp::Ordering::{Equal, Greater, Less};
use std::fmt;

use crate::{
    constants::{
        Degree, DEFAULT_GAP_MAX_MINUTES, DEFAULT_NIGHT_SAMPLE_CAP, DEFAULT_RSE_SCALE,
        DEG_PER_HOUR,
    },
    skyglow_errors::SkyglowError,
};

#[derive(Debug, Clone, PartialEq)]
pub struct RunParams {
    // --- Site ---
    pub latitude: Degree,
    pub longitude: Degree,

    // --- Roughness window ---
    pub half_range: usize,
    pub rse_scale: f64,

    // --- Segmentation ---
    pub gap_max_minutes: i32,
    pub night_sample_cap: usize,
}

impl RunParams {
    pub fn builder() -> RunParamsBuilder {
        RunParamsBuilder::new()
    }

    /// Number of samples in a full regression window, `2r + 1`.
    pub fn window_width(&self) -> usize {
        2 * self.half_range + 1
    }

    /// Whole hours between UTC and local mean standard time for this longitude.
    ///
    /// The magnitude is truncated toward zero and carries the longitude's sign, so a site at
    /// −120.2° gets −8 and a site at 97.5° gets +6.
    pub fn hour_offset(&self) -> i32 {
        let magnitude = (self.longitude.abs() / DEG_PER_HOUR).trunc() as i32;
        if self.longitude < 0.0 {
            -magnitude
        } else {
            magnitude
        }
    }
}

impl Default for RunParams {
    fn default() -> Self {
        RunParams {
            latitude: 0.0,
            longitude: 0.0,
            half_range: 9,
            rse_scale: DEFAULT_RSE_SCALE,
            gap_max_minutes: DEFAULT_GAP_MAX_MINUTES,
            night_sample_cap: DEFAULT_NIGHT_SAMPLE_CAP,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RunParamsBuilder {
    params: RunParams,
}

impl RunParamsBuilder {
    pub fn new() -> Self {
        Self {
            params: RunParams::default(),
        }
    }

    pub fn latitude(mut self, v: Degree) -> Self {
        self.params.latitude = v;
        self
    }
    pub fn longitude(mut self, v: Degree) -> Self {
        self.params.longitude = v;
        self
    }
    pub fn half_range(mut self, v: usize) -> Self {
        self.params.half_range = v;
        self
    }
    pub fn rse_scale(mut self, v: f64) -> Self {
        self.params.rse_scale = v;
        self
    }
    pub fn gap_max_minutes(mut self, v: i32) -> Self {
        self.params.gap_max_minutes = v;
        self
    }
    pub fn night_sample_cap(mut self, v: usize) -> Self {
        self.params.night_sample_cap = v;
        self
    }

    // NaN never passes these checks
    #[inline]
    fn gt0(x: f64) -> bool {
        x.partial_cmp(&0.0) == Some(Greater)
    }

    #[inline]
    fn within(x: f64, bound: f64) -> bool {
        matches!(x.partial_cmp(&-bound), Some(Greater) | Some(Equal))
            && matches!(x.partial_cmp(&bound), Some(Less) | Some(Equal))
    }

    pub fn build(self) -> Result<RunParams, SkyglowError> {
        let p = &self.params;

        if !Self::within(p.latitude, 90.0) {
            return Err(SkyglowError::InvalidRunParameter(
                "latitude must lie in [-90, 90] degrees".into(),
            ));
        }
        if !Self::within(p.longitude, 180.0) {
            return Err(SkyglowError::InvalidRunParameter(
                "longitude must lie in [-180, 180] degrees".into(),
            ));
        }
        if p.half_range < 1 {
            return Err(SkyglowError::InvalidRunParameter(
                "half_range must be >= 1".into(),
            ));
        }
        if !Self::gt0(p.rse_scale) || !p.rse_scale.is_finite() {
            return Err(SkyglowError::InvalidRunParameter(
                "rse_scale must be finite and > 0".into(),
            ));
        }
        if p.gap_max_minutes < 1 {
            return Err(SkyglowError::InvalidRunParameter(
                "gap_max_minutes must be >= 1".into(),
            ));
        }
        if p.night_sample_cap < 1 {
            return Err(SkyglowError::InvalidRunParameter(
                "night_sample_cap must be >= 1".into(),
            ));
        }

        Ok(self.params)
    }
}

impl fmt::Display for RunParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            const PARAM_COL: usize = 40;
            writeln!(f, "SQM Attribute Run Parameters")?;
            writeln!(f, "----------------------------")?;

            macro_rules! line {
                ($fmt:expr, $val:expr, $comment:expr) => {{
                    let s = format!($fmt, $val);
                    let pad = if s.len() < PARAM_COL {
                        " ".repeat(PARAM_COL - s.len())
                    } else {
                        " ".to_string()
                    };
                    writeln!(f, "  {}{}# {}", s, pad, $comment)
                }};
            }

            line!("latitude         = {:.7}°", self.latitude, "Site latitude, zenith declination")?;
            line!("longitude        = {:.7}°", self.longitude, "Site longitude, east-positive")?;
            line!("half_range       = {}", self.half_range, "Regression window radius (samples)")?;
            line!("window_width     = {}", self.window_width(), "Samples per regression window")?;
            line!("rse_scale        = {:.1}", self.rse_scale, "Multiplier on residual std error")?;
            line!("gap_max_minutes  = {}", self.gap_max_minutes, "Largest spacing before a night cut")?;
            line!("night_sample_cap = {}", self.night_sample_cap, "Fatal when a night grows past this")?;
            Ok(())
        } else {
            write!(
                f,
                "RunParams(lat={:.4}, long={:.4}, r={}, gap={}min, scale={}, cap={})",
                self.latitude,
                self.longitude,
                self.half_range,
                self.gap_max_minutes,
                self.rse_scale,
                self.night_sample_cap
            )
        }
    }
}
