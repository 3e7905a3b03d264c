// Copyright (c) 2024 Mike Tsao

use crate::prelude::*;
use core::f64::consts::PI;
use derivative::Derivative;
use derive_builder::Builder;
use kahan::KahanSum;

/// A fixed-length burst of PCM16 sine samples. Built once per distinct
/// frequency/duration pair and then borrowed wherever the burst plays.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ToneTable {
    samples: Vec<i16>,
}
impl ToneTable {
    /// The burst's samples, in playback order.
    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    /// The burst's length in frames.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the burst has no samples at all.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Produces [ToneTable]s: sine bursts at a given frequency, peak amplitude,
/// and sample rate.
#[derive(Clone, Builder, Debug, Derivative)]
#[derivative(Default)]
#[builder(default)]
pub struct ToneGenerator {
    /// Hertz. 250 Hz sits near the peak sensitivity of fingertip
    /// mechanoreceptors.
    #[derivative(Default(value = "FrequencyHz(250.0)"))]
    pub frequency: FrequencyHz,

    /// Peak sample value, 1..=i16::MAX.
    #[derivative(Default(value = "i16::MAX"))]
    pub amplitude: i16,

    /// Frames per second of the generated table.
    pub sample_rate: SampleRate,
}
impl ToneGenerator {
    /// Renders `duration` worth of sine wave. The phase advances by one step
    /// before each sample is taken, so the first sample is `sin(step)` rather
    /// than zero.
    pub fn generate(&self, duration: Seconds) -> ToneTable {
        let frames = self.sample_rate.frames_in(duration);
        let step = 2.0 * PI * self.frequency.0 / f64::from(self.sample_rate);
        let amplitude = self.amplitude as f64;

        // Kahan summation keeps long intro tones from drifting in phase.
        let mut phase = KahanSum::new_with_value(0.0);
        let samples = (0..frames)
            .map(|_| {
                phase += step;
                // `as` saturates out-of-range floats.
                (amplitude * phase.sum().sin()).round() as i16
            })
            .collect();
        ToneTable { samples }
    }
}
