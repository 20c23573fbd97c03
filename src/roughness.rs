//! # Roughness: sliding-window residual standard error
//!
//! Cloud passages make the SQM brightness curve jagged, while a clear night drifts smoothly.
//! Roughness measures that jaggedness: around every sample, fit an ordinary least-squares line
//! of brightness against minutes-since-3pm over a centred window of `N = 2r + 1` samples,
//! and report the residual standard error
//!
//! ```text
//! RSE = sqrt( Σ (y − ŷ)² / (N − 2) ) × scale
//! ```
//!
//! `N − 2` are the degrees of freedom left after estimating slope and intercept.
//!
//! ## Outcomes
//!
//! - [`Roughness::Value`]: interior sample with a full symmetric window.
//! - [`Roughness::NoWindow`]: one of the first/last `r` samples, or a night shorter than `N`.
//! - [`Roughness::Degenerate`]: the window has no spread in time (or produced a non-finite
//!   statistic), so no line can be fitted.
//!
//! Every window is fitted independently; there is no running update between neighbours.
use crate::constants::{DEGENERATE_FACTOR, NO_WINDOW_FACTOR};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Roughness {
    Value(f64),
    NoWindow,
    Degenerate,
}

impl Roughness {
    pub fn value(&self) -> Option<f64> {
        match self {
            Roughness::Value(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric form written to the legacy CSV: the statistic itself, or `999·scale` /
    /// `888·scale` for the two sentinel outcomes.
    pub fn to_legacy(&self, scale: f64) -> f64 {
        match self {
            Roughness::Value(v) => *v,
            Roughness::NoWindow => NO_WINDOW_FACTOR * scale,
            Roughness::Degenerate => DEGENERATE_FACTOR * scale,
        }
    }
}

/// Least-squares line `y = slope·x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LineFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Ordinary least-squares fit of `ys` against `xs`.
///
/// Return
/// ------
/// * `None` when the inputs are empty or `xs` has zero variance
pub fn fit_line(xs: &[f64], ys: &[f64]) -> Option<LineFit> {
    debug_assert_eq!(xs.len(), ys.len());
    if xs.is_empty() {
        return None;
    }

    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let (sxx, sxy) = xs
        .iter()
        .zip(ys)
        .fold((0.0, 0.0), |(sxx, sxy), (&x, &y)| {
            let dx = x - mean_x;
            (sxx + dx * dx, sxy + dx * (y - mean_y))
        });

    if sxx == 0.0 {
        return None;
    }

    let slope = sxy / sxx;
    Some(LineFit {
        slope,
        intercept: mean_y - slope * mean_x,
    })
}

/// Scaled residual standard error of a single window.
///
/// Arguments
/// ---------
/// * `xs`: minutes since 3pm for the window's samples
/// * `ys`: brightness for the window's samples
/// * `scale`: multiplier applied to the statistic
///
/// Return
/// ------
/// * [`Roughness::Value`] with a non-negative statistic, or [`Roughness::Degenerate`]
pub fn window_roughness(xs: &[f64], ys: &[f64], scale: f64) -> Roughness {
    let dof = xs.len() as f64 - 2.0;
    let Some(line) = fit_line(xs, ys) else {
        return Roughness::Degenerate;
    };
    if dof <= 0.0 {
        return Roughness::Degenerate;
    }

    let sum_squared_residuals: f64 = xs
        .iter()
        .zip(ys)
        .map(|(&x, &y)| {
            let residual = y - line.predict(x);
            residual * residual
        })
        .sum();

    // abs() folds a -0.0 result back to 0.0
    let rse = ((sum_squared_residuals / dof).sqrt() * scale).abs();
    if rse.is_finite() {
        Roughness::Value(rse)
    } else {
        Roughness::Degenerate
    }
}

/// Roughness for every sample of a night.
///
/// Arguments
/// ---------
/// * `xs`: minutes since 3pm, one per sample, in night order
/// * `ys`: brightness, one per sample, in night order
/// * `half_range`: window radius `r` (≥ 1)
/// * `scale`: multiplier applied to the statistic
///
/// Return
/// ------
/// * one [`Roughness`] per sample. Nights with fewer than `2r + 1` samples are all
///   [`Roughness::NoWindow`]; otherwise the first and last `r` samples are
///   [`Roughness::NoWindow`] and every interior sample gets its own window fit.
pub fn roughness_profile(xs: &[f64], ys: &[f64], half_range: usize, scale: f64) -> Vec<Roughness> {
    debug_assert_eq!(xs.len(), ys.len());
    let len = xs.len();
    let width = 2 * half_range + 1;

    if len < width {
        return vec![Roughness::NoWindow; len];
    }

    (0..len)
        .map(|i| {
            if i < half_range || i + half_range >= len {
                Roughness::NoWindow
            } else {
                let window = i - half_range..=i + half_range;
                window_roughness(&xs[window.clone()], &ys[window], scale)
            }
        })
        .collect()
}
