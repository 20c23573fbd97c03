//! # Night-average sky brightness
//!
//! The night average is the mean brightness over the samples taken under an astronomically
//! dark sky (sun below −18°, moon below −10°). It is a night-level statistic: every dark
//! sample of the night carries the same value, and every other sample carries
//! [`NightAverage::NotApplicable`].
use crate::{
    constants::{Msas, NIGHT_AVERAGE_NOT_APPLICABLE},
    sample::RawSample,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NightAverage {
    /// Mean brightness of the night's dark-sky samples
    Value(Msas),
    /// Sample is not dark, or the night has no dark sample at all
    NotApplicable,
}

impl NightAverage {
    pub fn value(&self) -> Option<Msas> {
        match self {
            NightAverage::Value(v) => Some(*v),
            NightAverage::NotApplicable => None,
        }
    }

    /// Numeric form written to the legacy CSV (`-1` when not applicable).
    pub fn to_legacy(&self) -> f64 {
        self.value().unwrap_or(NIGHT_AVERAGE_NOT_APPLICABLE)
    }
}

/// Mean brightness over the dark-sky samples, `None` if there are none.
pub fn dark_sky_mean(samples: &[RawSample]) -> Option<Msas> {
    let (sum, count) = samples
        .iter()
        .filter(|s| s.is_dark_sky())
        .fold((0.0, 0usize), |(sum, count), s| (sum + s.msas, count + 1));

    (count > 0).then(|| sum / count as f64)
}

/// Per-sample night average, in sample order.
pub fn night_averages(samples: &[RawSample]) -> Vec<NightAverage> {
    let Some(mean) = dark_sky_mean(samples) else {
        return vec![NightAverage::NotApplicable; samples.len()];
    };

    samples
        .iter()
        .map(|s| {
            if s.is_dark_sky() {
                NightAverage::Value(mean)
            } else {
                NightAverage::NotApplicable
            }
        })
        .collect()
}

#[cfg(test)]
mod aggregate_test {
    use super::*;
    use crate::sample::Timestamp;
    use approx::assert_relative_eq;

    fn sample(msas: f64, sun: f64, moon: f64) -> RawSample {
        RawSample {
            location: "agg".into(),
            utc: Timestamp::new(2023, 1, 10, 5, 0, 0.0),
            local: Timestamp::new(2023, 1, 9, 21, 0, 0.0),
            celsius: -3.0,
            volts: 5.1,
            msas,
            status: 0,
            moon_phase: 90.0,
            moon_elevation: moon,
            moon_illumination: 50.0,
            sun_elevation: sun,
        }
    }

    #[test]
    fn test_average_only_stamped_on_dark_samples() {
        let night = vec![
            sample(18.0, -5.0, -20.0),
            sample(21.0, -25.0, -20.0),
            sample(21.5, -40.0, -30.0),
            sample(19.0, -40.0, 5.0),
        ];

        let avgs = night_averages(&night);
        assert_eq!(avgs.len(), 4);
        assert_eq!(avgs[0], NightAverage::NotApplicable);
        assert_relative_eq!(avgs[1].value().unwrap(), 21.25);
        assert_relative_eq!(avgs[2].value().unwrap(), 21.25);
        assert_eq!(avgs[3], NightAverage::NotApplicable);
        assert_eq!(avgs[3].to_legacy(), -1.0);
    }

    #[test]
    fn test_night_without_dark_samples() {
        let night = vec![
            sample(18.0, -10.0, -20.0),
            sample(19.0, -30.0, -9.0),
            sample(20.0, -18.0, -30.0),
        ];

        assert_eq!(dark_sky_mean(&night), None);
        assert!(night_averages(&night)
            .iter()
            .all(|a| a.to_legacy() == NIGHT_AVERAGE_NOT_APPLICABLE));
    }

    #[test]
    fn test_empty_night() {
        assert!(night_averages(&[]).is_empty());
    }
}
