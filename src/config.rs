// Copyright (c) 2024 Mike Tsao

//! The validated description of a stimulation session. Everything downstream
//! reads a [Configuration] and never checks bounds again.

use crate::prelude::*;
use core::ops::RangeInclusive;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// A parameter fell outside its documented bounds. Raised before any audio is
/// generated.
#[allow(missing_docs)]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ConfigurationError {
    #[error("sample rate {0} Hz is outside 1000..=44100 Hz")]
    SampleRate(usize),
    #[error("amplitude {0} is outside 1..=32767")]
    Amplitude(i16),
    #[error("jitter {0} is outside 0..=0.235")]
    Jitter(f64),
    #[error("duration {0} s is outside 1..=14400 s")]
    Duration(f64),
    #[error("channel count {0} is not 4 or 6")]
    ChannelCount(usize),
    #[error("intro {0} s is outside 0..=30 s")]
    Intro(f64),
    #[error("CR frequency {0} Hz is outside 0.5..=10 Hz")]
    CrFrequency(f64),
    #[error("tone frequency {0} Hz is outside 20 Hz..=Nyquist ({1} Hz)")]
    ToneFrequency(f64, f64),
    #[error("tone duration {0} s is outside 0.01 s..=one quarter of the CR period ({1} s)")]
    ToneDuration(f64, f64),
    #[error("{0} ON bars per block is outside 1..=16")]
    BlocksOn(usize),
    #[error("{0} OFF bars per block is outside 0..=16")]
    BlocksOff(usize),
    #[error("jitter of {jitter} would shrink the gap after each {tone_duration} s tone below zero")]
    NegativeGap { jitter: f64, tone_duration: f64 },
    #[error("incomplete configuration: {0}")]
    Incomplete(String),
    #[error("couldn't read configuration: {0}")]
    Unreadable(String),
}

/// Everything needed to render one session. Immutable once built.
#[derive(Clone, Debug, Builder, PartialEq, Serialize, Deserialize)]
#[builder(default, build_fn(private, name = "build_from_builder"))]
#[serde(rename_all = "kebab-case", default)]
pub struct Configuration {
    /// Output frames per second.
    pub sample_rate: SampleRate,

    /// Peak sample value of each tone burst.
    pub amplitude: i16,

    /// Maximum timing jitter, as a fraction of a quarter CR period. The
    /// drawn jitter spans half of this on either side of zero.
    pub jitter: f64,

    /// How long the stimulation pattern should run, not counting the intro.
    pub duration: Seconds,

    /// 4 or 6.
    pub channel_count: usize,

    /// Declare the rear pair as side speakers instead of back speakers.
    pub use_side_channels: bool,

    /// Length of each channel's identification tone before the pattern
    /// starts. Zero disables the intro.
    pub intro: Seconds,

    /// The coordinated-reset bar rate.
    pub cr_frequency: FrequencyHz,

    /// The vibrotactile carrier.
    pub tone_frequency: FrequencyHz,

    /// Length of each burst.
    pub tone_duration: Seconds,

    /// Stimulation bars per block.
    pub blocks_on: usize,

    /// Silent bars per block.
    pub blocks_off: usize,

    /// Seeds the pattern source for reproducible output.
    pub seed: Option<u64>,
}
impl Default for Configuration {
    fn default() -> Self {
        Self {
            sample_rate: SampleRate::new(44100),
            amplitude: 32760,
            jitter: 0.0,
            duration: Seconds(7200.0),
            channel_count: 4,
            use_side_channels: false,
            intro: Seconds(0.0),
            cr_frequency: FrequencyHz(1.5),
            tone_frequency: FrequencyHz(250.0),
            tone_duration: Seconds(0.1),
            blocks_on: 3,
            blocks_off: 2,
            seed: None,
        }
    }
}
impl ConfigurationBuilder {
    /// Builds and validates the [Configuration].
    pub fn build(&self) -> Result<Configuration, ConfigurationError> {
        let configuration = self
            .build_from_builder()
            .map_err(|e| ConfigurationError::Incomplete(e.to_string()))?;
        configuration.validate()?;
        Ok(configuration)
    }
}
#[allow(missing_docs)]
impl Configuration {
    pub const SAMPLE_RATE_RANGE: RangeInclusive<usize> = 1000..=44100;
    pub const AMPLITUDE_RANGE: RangeInclusive<i16> = 1..=i16::MAX;
    pub const JITTER_RANGE: RangeInclusive<f64> = 0.0..=0.235;
    pub const DURATION_RANGE: RangeInclusive<f64> = 1.0..=14400.0;
    pub const INTRO_RANGE: RangeInclusive<f64> = 0.0..=30.0;
    pub const CR_FREQUENCY_RANGE: RangeInclusive<f64> = 0.5..=10.0;
    pub const MIN_TONE_FREQUENCY: f64 = 20.0;
    pub const MIN_TONE_DURATION: f64 = 0.01;
    pub const BLOCKS_ON_RANGE: RangeInclusive<usize> = 1..=16;
    pub const BLOCKS_OFF_RANGE: RangeInclusive<usize> = 0..=16;

    /// Reads a JSON configuration. Missing fields take their defaults; the
    /// result is validated like any other.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigurationError> {
        let file = std::fs::File::open(path)
            .map_err(|e| ConfigurationError::Unreadable(format!("{}: {e}", path.display())))?;
        let configuration: Self = serde_json::from_reader(std::io::BufReader::new(file))
            .map_err(|e| ConfigurationError::Unreadable(format!("{}: {e}", path.display())))?;
        configuration.validate()?;
        Ok(configuration)
    }

    /// Checks every bound. Float bounds reject NaN.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !Self::SAMPLE_RATE_RANGE.contains(&self.sample_rate.0) {
            return Err(ConfigurationError::SampleRate(self.sample_rate.0));
        }
        if !Self::AMPLITUDE_RANGE.contains(&self.amplitude) {
            return Err(ConfigurationError::Amplitude(self.amplitude));
        }
        if !Self::JITTER_RANGE.contains(&self.jitter) {
            return Err(ConfigurationError::Jitter(self.jitter));
        }
        if !Self::DURATION_RANGE.contains(&self.duration.0) {
            return Err(ConfigurationError::Duration(self.duration.0));
        }
        if ChannelLayout::from_channel_count(self.channel_count).is_none() {
            return Err(ConfigurationError::ChannelCount(self.channel_count));
        }
        if !Self::INTRO_RANGE.contains(&self.intro.0) {
            return Err(ConfigurationError::Intro(self.intro.0));
        }
        if !Self::CR_FREQUENCY_RANGE.contains(&self.cr_frequency.0) {
            return Err(ConfigurationError::CrFrequency(self.cr_frequency.0));
        }
        let nyquist = self.sample_rate.0 as f64 / 2.0;
        if !(Self::MIN_TONE_FREQUENCY..=nyquist).contains(&self.tone_frequency.0) {
            return Err(ConfigurationError::ToneFrequency(
                self.tone_frequency.0,
                nyquist,
            ));
        }
        let quarter_period = self.quarter_period().0;
        if !(Self::MIN_TONE_DURATION..=quarter_period).contains(&self.tone_duration.0) {
            return Err(ConfigurationError::ToneDuration(
                self.tone_duration.0,
                quarter_period,
            ));
        }
        if !Self::BLOCKS_ON_RANGE.contains(&self.blocks_on) {
            return Err(ConfigurationError::BlocksOn(self.blocks_on));
        }
        if !Self::BLOCKS_OFF_RANGE.contains(&self.blocks_off) {
            return Err(ConfigurationError::BlocksOff(self.blocks_off));
        }
        if self.nominal_gap().0 - self.jitter_max().0 / 2.0 < 0.0 {
            return Err(ConfigurationError::NegativeGap {
                jitter: self.jitter,
                tone_duration: self.tone_duration.0,
            });
        }
        Ok(())
    }

    /// The channel layout. Falls back to [ChannelLayout::Quad] for
    /// configurations that haven't been validated.
    pub fn layout(&self) -> ChannelLayout {
        ChannelLayout::from_channel_count(self.channel_count).unwrap_or_default()
    }

    /// The speaker mask written to the WAV header.
    pub fn channel_mask(&self) -> ChannelMask {
        self.layout().channel_mask(self.use_side_channels)
    }

    /// One bar: four note slots.
    pub fn cr_period(&self) -> Seconds {
        self.cr_frequency.period()
    }

    /// One note slot: a tone plus the gap that follows it.
    pub fn quarter_period(&self) -> Seconds {
        Seconds(self.cr_period().0 / 4.0)
    }

    /// The full width of the jitter interval.
    pub fn jitter_max(&self) -> Seconds {
        Seconds(self.jitter * self.quarter_period().0)
    }

    /// The gap after each tone before jitter is applied.
    pub fn nominal_gap(&self) -> Seconds {
        Seconds(self.quarter_period().0 - self.tone_duration.0)
    }

    /// The length of one phrase: ON bars followed by OFF bars.
    pub fn phrase_period(&self) -> Seconds {
        Seconds(self.cr_period().0 * (self.blocks_on + self.blocks_off) as f64)
    }

    /// The number of phrases the header estimate assumes.
    pub fn phrase_count(&self) -> usize {
        (self.duration.0 / self.phrase_period().0).round() as usize
    }

    /// The total intro length: one identification tone per channel.
    pub fn intro_length(&self) -> Seconds {
        Seconds(self.intro.0 * self.channel_count as f64)
    }

    /// The duration the WAV header declares up front.
    pub fn declared_duration(&self) -> Seconds {
        Seconds(self.intro_length().0 + self.phrase_count() as f64 * self.phrase_period().0)
    }

    /// The frame count the WAV header declares up front.
    pub fn declared_frames(&self) -> usize {
        self.sample_rate.frames_in(self.declared_duration())
    }
}
