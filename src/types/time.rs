// Copyright (c) 2024 Mike Tsao

//! Handles digital-audio and wall-clock time.

use derivative::Derivative;
use serde::{Deserialize, Serialize};
use synonym::Synonym;

/// Represents the [seconds](https://en.wikipedia.org/wiki/Second) unit of time.
#[derive(Synonym, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Seconds(pub f64);
impl Seconds {
    /// Zero seconds.
    pub const fn zero() -> Seconds {
        Seconds(0.0)
    }
}

/// Samples per second. Always a positive integer; cannot be zero.
#[derive(Synonym, Serialize, Deserialize, Derivative)]
#[derivative(Default)]
#[synonym(skip(Default))]
#[serde(rename_all = "kebab-case")]
pub struct SampleRate(#[derivative(Default(value = "44100"))] pub usize);
#[allow(missing_docs)]
impl SampleRate {
    pub const DEFAULT_SAMPLE_RATE: usize = 44100;
    pub const DEFAULT: SampleRate = SampleRate::new(Self::DEFAULT_SAMPLE_RATE);

    pub const fn new(value: usize) -> Self {
        if value != 0 {
            Self(value)
        } else {
            Self(Self::DEFAULT_SAMPLE_RATE)
        }
    }

    /// The number of frames that fit in the given duration, rounded to the
    /// nearest frame. Negative durations yield zero frames.
    pub fn frames_in(&self, duration: Seconds) -> usize {
        (self.0 as f64 * duration.0).round().max(0.0) as usize
    }

    /// The wall-clock length of the given number of frames.
    pub fn seconds_of(&self, frames: usize) -> Seconds {
        Seconds(frames as f64 / self.0 as f64)
    }
}
impl From<SampleRate> for f64 {
    fn from(value: SampleRate) -> Self {
        value.0 as f64
    }
}
impl From<SampleRate> for u32 {
    fn from(value: SampleRate) -> Self {
        value.0 as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_rate_default_is_sane() {
        let sr = SampleRate::default();
        assert_eq!(sr.0, 44100);
        assert_eq!(SampleRate::new(0), SampleRate::DEFAULT);
    }

    #[test]
    fn frames_round_to_nearest() {
        let sr = SampleRate::new(22050);
        assert_eq!(sr.frames_in(Seconds(0.1)), 2205);
        assert_eq!(sr.frames_in(Seconds(1.0 / 1.5)), 14700);
        assert_eq!(sr.frames_in(Seconds(-0.5)), 0);
        assert_eq!(sr.seconds_of(22050), Seconds(1.0));
    }
}
