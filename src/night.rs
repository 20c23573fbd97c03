//! # Night buffer
//!
//! A [`Night`] is the unit of segmentation: an ordered run of samples from one local 15:00 to
//! the next (or to a data gap). It owns its samples while the segmenter fills it, is closed
//! when a boundary is detected, and is then consumed by the annotation stage.
//!
//! Capacity is dynamic but capped. Growing past the cap is fatal for the whole run.
use crate::{constants::Msas, sample::RawSample, skyglow_errors::SkyglowError};

#[derive(Debug, Clone, PartialEq)]
pub struct Night {
    ordinal: usize,
    samples: Vec<RawSample>,
}

impl Night {
    /// Open an empty night. `ordinal` is its 0-based position in the run.
    pub fn new(ordinal: usize) -> Self {
        Night {
            ordinal,
            samples: Vec::new(),
        }
    }

    /// Open a night seeded with the sample that closed the previous one.
    pub fn starting_with(ordinal: usize, first: RawSample) -> Self {
        Night {
            ordinal,
            samples: vec![first],
        }
    }

    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[RawSample] {
        &self.samples
    }

    pub fn last(&self) -> Option<&RawSample> {
        self.samples.last()
    }

    pub fn into_samples(self) -> Vec<RawSample> {
        self.samples
    }

    /// Fail with [`SkyglowError::NightOverflow`] if one more sample would exceed `cap`.
    ///
    /// The check is made before the incoming sample is examined for boundaries, so a full
    /// night rejects even the sample that would have closed it.
    pub fn ensure_room(&self, cap: usize, incoming: &RawSample) -> Result<(), SkyglowError> {
        if self.samples.len() >= cap {
            return Err(SkyglowError::NightOverflow {
                night: self.ordinal,
                cap,
                at: incoming.local.to_string(),
            });
        }
        Ok(())
    }

    pub(crate) fn push(&mut self, sample: RawSample) {
        self.samples.push(sample);
    }

    /// Brightness values in sample order.
    pub fn brightness(&self) -> impl Iterator<Item = Msas> + '_ {
        self.samples.iter().map(|s| s.msas)
    }
}

#[cfg(test)]
mod night_test {
    use super::*;
    use crate::sample::Timestamp;

    fn sample(minute: u32) -> RawSample {
        RawSample {
            location: "bench".into(),
            utc: Timestamp::new(2022, 3, 2, 3, minute, 0.0),
            local: Timestamp::new(2022, 3, 1, 19, minute, 0.0),
            celsius: 2.0,
            volts: 4.9,
            msas: 20.0 + minute as f64,
            status: 0,
            moon_phase: 0.0,
            moon_elevation: -20.0,
            moon_illumination: 0.0,
            sun_elevation: -30.0,
        }
    }

    #[test]
    fn test_capacity_is_enforced_before_push() {
        let mut night = Night::starting_with(4, sample(0));
        night.push(sample(1));
        assert!(night.ensure_room(3, &sample(2)).is_ok());
        night.push(sample(2));

        let err = night.ensure_room(3, &sample(3)).unwrap_err();
        assert_eq!(
            err,
            SkyglowError::NightOverflow {
                night: 4,
                cap: 3,
                at: "2022-03-01 19:03:00".into()
            }
        );
        assert_eq!(night.len(), 3);
    }

    #[test]
    fn test_brightness_follows_sample_order() {
        let mut night = Night::new(0);
        assert!(night.is_empty());
        for m in 0..3 {
            night.push(sample(m));
        }
        assert_eq!(night.brightness().collect::<Vec<_>>(), vec![20.0, 21.0, 22.0]);
        assert_eq!(night.last().map(|s| s.local.minute), Some(2));
    }
}
