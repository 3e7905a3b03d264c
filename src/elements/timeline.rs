// Copyright (c) 2024 Mike Tsao

use super::ToneTable;
use crate::types::{SampleRate, Seconds};

/// Per-channel sample accumulators that sit between the pattern generator and
/// the interleaver. Each channel grows independently; whoever fills them must
/// give every channel the same number of samples before the next drain.
///
/// The buffers are cleared, not reallocated, after each drain, so memory stays
/// bounded by the largest phrase ever accumulated.
#[derive(Clone, Debug, Default)]
pub struct ChannelTimelines {
    sample_rate: SampleRate,
    channels: Vec<Vec<i16>>,
}
impl ChannelTimelines {
    /// Creates `channel_count` empty timelines.
    pub fn new(channel_count: usize, sample_rate: SampleRate) -> Self {
        Self::new_with_capacity(channel_count, sample_rate, 0)
    }

    /// Creates empty timelines with room for `frames` samples each.
    pub fn new_with_capacity(
        channel_count: usize,
        sample_rate: SampleRate,
        frames: usize,
    ) -> Self {
        Self {
            sample_rate,
            channels: (0..channel_count)
                .map(|_| Vec::with_capacity(frames))
                .collect(),
        }
    }

    /// The rate used to convert durations to frame counts.
    pub fn sample_rate(&self) -> SampleRate {
        self.sample_rate
    }

    /// The number of channels.
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Appends one sample to a channel.
    pub fn append(&mut self, channel: usize, sample: i16) {
        self.channels[channel].push(sample);
    }

    /// Appends `duration` worth of zero samples to a channel.
    pub fn append_silence(&mut self, channel: usize, duration: Seconds) {
        self.append_silent_frames(channel, self.sample_rate.frames_in(duration));
    }

    /// Appends `frames` zero samples to a channel.
    pub fn append_silent_frames(&mut self, channel: usize, frames: usize) {
        let buffer = &mut self.channels[channel];
        buffer.resize(buffer.len() + frames, 0);
    }

    /// Appends `frames` zero samples to every channel.
    pub fn append_silent_frames_to_all(&mut self, frames: usize) {
        self.channels
            .iter_mut()
            .for_each(|c| c.resize(c.len() + frames, 0));
    }

    /// Appends every sample of `tone`, in order, to a channel.
    pub fn append_tone(&mut self, channel: usize, tone: &ToneTable) {
        self.channels[channel].extend_from_slice(tone.samples());
    }

    /// The samples accumulated on a channel since the last clear.
    pub fn channel(&self, channel: usize) -> &[i16] {
        &self.channels[channel]
    }

    /// The number of samples accumulated on a channel since the last clear.
    pub fn len(&self, channel: usize) -> usize {
        self.channels[channel].len()
    }

    /// True if no channel holds any samples.
    pub fn is_empty(&self) -> bool {
        self.channels.iter().all(|c| c.is_empty())
    }

    /// Returns the common length of all channels, or the first channel whose
    /// length disagrees with channel 0 along with both lengths.
    pub fn aligned_len(&self) -> Result<usize, (usize, usize, usize)> {
        let expected = self.channels.first().map_or(0, |c| c.len());
        match self
            .channels
            .iter()
            .enumerate()
            .find(|(_, c)| c.len() != expected)
        {
            Some((index, c)) => Err((index, expected, c.len())),
            None => Ok(expected),
        }
    }

    /// Empties every channel, keeping the allocations.
    pub fn clear(&mut self) {
        self.channels.iter_mut().for_each(|c| c.clear());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::*;

    #[test]
    fn appends_advance_only_their_channel() {
        let mut t = ChannelTimelines::new(4, SampleRate::new(1000));
        assert_eq!(t.sample_rate(), SampleRate::new(1000));
        t.append(0, 7);
        t.append_silence(1, Seconds(0.003));
        assert_eq!(t.channel(0), &[7]);
        assert_eq!(t.channel(1), &[0, 0, 0]);
        assert_eq!(t.len(2), 0);
        assert_eq!(t.aligned_len(), Err((1, 1, 3)));
    }

    #[test]
    fn tone_and_matching_silence_stay_aligned() {
        let tone = ToneGeneratorBuilder::default()
            .sample_rate(SampleRate::new(1000))
            .build()
            .unwrap()
            .generate(Seconds(0.01));
        let mut t = ChannelTimelines::new_with_capacity(2, SampleRate::new(1000), 64);
        t.append_tone(0, &tone);
        t.append_silent_frames(1, tone.len());
        t.append_silent_frames_to_all(5);
        assert_eq!(t.aligned_len(), Ok(15));
        assert_eq!(&t.channel(0)[..10], tone.samples());
        assert!(t.channel(1).iter().all(|s| *s == 0));

        t.clear();
        assert!(t.is_empty());
        assert_eq!(t.aligned_len(), Ok(0));
        assert_eq!(t.channel_count(), 2);
    }
}
