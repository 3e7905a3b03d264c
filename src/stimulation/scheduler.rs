// Copyright (c) 2024 Mike Tsao

use super::{BarRecord, PatternLog};
use crate::prelude::*;
use std::io::Write;

/// Generates coordinated-reset stimulation one phrase at a time.
///
/// A phrase is `blocks_on` stimulation bars followed by `blocks_off` silent
/// bars. Each stimulation bar has four note slots; a freshly drawn
/// [Permutation] decides which finger fires in each slot, so every finger
/// fires exactly once per bar in an order that changes from bar to bar. After
/// each slot, every channel gets the same jittered gap, which keeps the
/// channels sample-aligned while moving the beat off a strict grid.
///
/// Channels that aren't fingers (center and LFE in 5.1) only ever receive
/// silence.
#[derive(Debug)]
pub struct PatternScheduler<S: PatternSource> {
    configuration: Configuration,
    layout: ChannelLayout,
    source: S,
    tone: ToneTable,
    timelines: ChannelTimelines,

    /// Phrases started so far.
    cycle: usize,
    /// Bars completed so far. The nominal clock is derived from this rather
    /// than accumulated, so it can't drift.
    bars_elapsed: usize,
    /// Frames already handed to the writer.
    frames_drained: u64,
}
impl<S: PatternSource> PatternScheduler<S> {
    /// Tolerance when comparing the nominal clock against the target duration.
    const CLOCK_EPSILON: f64 = 1e-9;

    /// Prepares a scheduler. The stimulation tone is rendered once here and
    /// reused for every note.
    pub fn new_with(configuration: &Configuration, source: S) -> Self {
        let tone = Self::tone_generator(configuration).generate(configuration.tone_duration);
        let layout = configuration.layout();
        // One phrase of stimulation plus headroom for positive jitter.
        let phrase_frames = configuration
            .sample_rate
            .frames_in(configuration.phrase_period())
            + configuration
                .sample_rate
                .frames_in(configuration.jitter_max())
                * configuration.blocks_on
                * Permutation::FINGER_COUNT;
        Self {
            configuration: configuration.clone(),
            layout,
            source,
            tone,
            timelines: ChannelTimelines::new_with_capacity(
                layout.channel_count(),
                configuration.sample_rate,
                phrase_frames,
            ),
            cycle: 0,
            bars_elapsed: 0,
            frames_drained: 0,
        }
    }

    fn tone_generator(configuration: &Configuration) -> ToneGenerator {
        ToneGenerator {
            frequency: configuration.tone_frequency,
            amplitude: configuration.amplitude,
            sample_rate: configuration.sample_rate,
        }
    }

    /// Plays the channel-identification intro, if the configuration asks for
    /// one, and drains it. Each finger channel in turn plays an `intro`-long
    /// tone while every other channel is silent. Returns the frames written.
    pub fn play_intro<W: Write>(
        &mut self,
        writer: &mut WavWriter<W>,
    ) -> Result<usize, RenderError> {
        if self.configuration.intro.0 <= 0.0 {
            return Ok(0);
        }
        let intro_tone =
            Self::tone_generator(&self.configuration).generate(self.configuration.intro);
        for sounding in 0..self.layout.channel_count() {
            for channel in 0..self.layout.channel_count() {
                if channel == sounding && !self.layout.is_silent_channel(channel) {
                    self.timelines.append_tone(channel, &intro_tone);
                } else {
                    self.timelines.append_silent_frames(channel, intro_tone.len());
                }
            }
        }
        self.drain(writer)
    }

    /// Accumulates one full phrase in the channel timelines without draining
    /// them, logging one row per bar.
    pub fn fill_phrase<L: Write>(&mut self, log: &mut PatternLog<L>) -> Result<(), RenderError> {
        self.cycle += 1;
        for bar in 1..=self.configuration.blocks_on {
            let permutation = self.next_permutation();
            log.record(&self.bar_record(bar, Some(permutation)))?;
            self.fill_stimulation_bar(permutation);
            self.bars_elapsed += 1;
        }
        let cr_period_frames = self
            .configuration
            .sample_rate
            .frames_in(self.configuration.cr_period());
        for bar in self.configuration.blocks_on + 1
            ..=self.configuration.blocks_on + self.configuration.blocks_off
        {
            log.record(&self.bar_record(bar, None))?;
            self.timelines.append_silent_frames_to_all(cr_period_frames);
            self.bars_elapsed += 1;
        }
        Ok(())
    }

    /// Generates one phrase and drains it to `writer`. Returns the frames
    /// written.
    pub fn play_phrase<W: Write, L: Write>(
        &mut self,
        writer: &mut WavWriter<W>,
        log: &mut PatternLog<L>,
    ) -> Result<usize, RenderError> {
        self.fill_phrase(log)?;
        let frames = self.drain(writer)?;
        log::debug!(
            "phrase {} drained {frames} frames (nominal time {:.3} s)",
            self.cycle,
            self.elapsed().0
        );
        Ok(frames)
    }

    /// Plays the intro and then whole phrases until the nominal clock reaches
    /// the target duration. Returns the total frames written.
    pub fn run<W: Write, L: Write>(
        &mut self,
        writer: &mut WavWriter<W>,
        log: &mut PatternLog<L>,
    ) -> Result<u64, RenderError> {
        self.play_intro(writer)?;
        while !self.is_finished() {
            self.play_phrase(writer, log)?;
        }
        Ok(self.frames_drained)
    }

    /// Whether the nominal clock has reached the target duration.
    pub fn is_finished(&self) -> bool {
        self.elapsed().0 + Self::CLOCK_EPSILON >= self.configuration.duration.0
    }

    /// Nominal elapsed stimulation time, excluding the intro and jitter.
    pub fn elapsed(&self) -> Seconds {
        Seconds(self.bars_elapsed as f64 * self.configuration.cr_period().0)
    }

    /// Phrases started so far.
    pub fn cycle(&self) -> usize {
        self.cycle
    }

    /// Frames handed to the writer so far.
    pub fn frames_drained(&self) -> u64 {
        self.frames_drained
    }

    /// What has accumulated since the last drain.
    pub fn timelines(&self) -> &ChannelTimelines {
        &self.timelines
    }

    /// The stimulation burst.
    pub fn tone(&self) -> &ToneTable {
        &self.tone
    }

    fn next_permutation(&mut self) -> Permutation {
        let index = self.source.next_permutation();
        // A source handing out indexes past the table would be a bug in the
        // source; wrap rather than crash mid-session.
        Permutation::from_index(index % Permutation::COUNT).unwrap_or_default()
    }

    fn fill_stimulation_bar(&mut self, permutation: Permutation) {
        let sample_rate = self.configuration.sample_rate;
        let nominal_gap = self.configuration.nominal_gap().0;
        let half_jitter = self.configuration.jitter_max().0 / 2.0;

        for slot in 0..Permutation::FINGER_COUNT {
            let mut finger = 0;
            for channel in 0..self.layout.channel_count() {
                if self.layout.is_silent_channel(channel) {
                    self.timelines.append_silent_frames(channel, self.tone.len());
                    continue;
                }
                finger += 1;
                if finger == permutation.finger_at(slot) {
                    self.timelines.append_tone(channel, &self.tone);
                } else {
                    self.timelines.append_silent_frames(channel, self.tone.len());
                }
            }

            // One draw per slot, applied to every channel.
            let jitter = self.source.next_jitter(half_jitter);
            let gap_frames = sample_rate.frames_in(Seconds(nominal_gap + jitter));
            self.timelines.append_silent_frames_to_all(gap_frames);
        }
    }

    fn bar_record(&self, bar: usize, pattern: Option<Permutation>) -> BarRecord {
        let frames = self.frames_drained + self.timelines.len(0) as u64;
        BarRecord {
            cycle: self.cycle,
            bar,
            pattern,
            sample_time: self.timelines.sample_rate().seconds_of(frames as usize),
            prog_time: self.elapsed(),
        }
    }

    fn drain<W: Write>(&mut self, writer: &mut WavWriter<W>) -> Result<usize, RenderError> {
        let frames = writer.drain(&mut self.timelines)?;
        self.frames_drained += frames as u64;
        Ok(frames)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::io::Cursor;

    /// Replays fixed permutation indexes and jitter fractions. Jitter values
    /// are multiplied by the requested half-range.
    #[derive(Debug, Default)]
    struct ScriptedSource {
        permutations: VecDeque<usize>,
        jitters: VecDeque<f64>,
    }
    impl PatternSource for ScriptedSource {
        fn next_permutation(&mut self) -> usize {
            let p = self.permutations.pop_front().unwrap_or(0);
            self.permutations.push_back(p);
            p
        }

        fn next_jitter(&mut self, half_range: f64) -> f64 {
            let j = self.jitters.pop_front().unwrap_or(0.0);
            self.jitters.push_back(j);
            j * half_range
        }
    }

    fn configuration(channel_count: usize, jitter: f64) -> Configuration {
        ConfigurationBuilder::default()
            .sample_rate(SampleRate::new(22050))
            .duration(Seconds(10.0))
            .channel_count(channel_count)
            .jitter(jitter)
            .build()
            .unwrap()
    }

    fn scheduler(
        channel_count: usize,
        jitter: f64,
        permutations: &[usize],
        jitters: &[f64],
    ) -> PatternScheduler<ScriptedSource> {
        PatternScheduler::new_with(
            &configuration(channel_count, jitter),
            ScriptedSource {
                permutations: permutations.iter().copied().collect(),
                jitters: jitters.iter().copied().collect(),
            },
        )
    }

    fn discard_log() -> PatternLog<std::io::Sink> {
        PatternLog::new(std::io::sink()).unwrap()
    }

    #[test]
    fn one_finger_per_slot_in_permutation_order() {
        // 4321 then 1234 then 2143.
        let mut s = scheduler(4, 0.0, &[23, 0, 7], &[]);
        s.fill_phrase(&mut discard_log()).unwrap();

        let tone_len = s.tone().len();
        let slot_len = 22050 / 6; // quarter period at 1.5 Hz
        assert_eq!(tone_len, 2205);
        let t = s.timelines();
        for (bar, permutation) in [23, 0, 7].into_iter().enumerate() {
            let fingers = Permutation::from_index(permutation).unwrap();
            for slot in 0..4 {
                let start = (bar * 4 + slot) * slot_len;
                let sounding: Vec<_> = (0..4)
                    .filter(|c| {
                        t.channel(*c)[start..start + tone_len]
                            .iter()
                            .any(|v| *v != 0)
                    })
                    .collect();
                assert_eq!(sounding, vec![fingers.finger_at(slot) as usize - 1]);
                for c in 0..4 {
                    assert!(t.channel(c)[start + tone_len..start + slot_len]
                        .iter()
                        .all(|s| *s == 0));
                }
            }
        }
        // Two silent bars.
        for c in 0..4 {
            assert!(t.channel(c)[3 * 4 * slot_len..].iter().all(|s| *s == 0));
        }
        assert_eq!(t.aligned_len(), Ok(5 * 14700));
    }

    #[test]
    fn center_and_lfe_never_sound() {
        let mut s = scheduler(6, 0.0, &[0, 5, 11, 17, 23], &[]);
        s.fill_phrase(&mut discard_log()).unwrap();
        let t = s.timelines();
        assert!(t.channel(2).iter().all(|s| *s == 0));
        assert!(t.channel(3).iter().all(|s| *s == 0));
        for finger_channel in [0, 1, 4, 5] {
            assert!(t.channel(finger_channel).iter().any(|s| *s != 0));
        }
        assert!(t.aligned_len().is_ok());
    }

    #[test]
    fn jitter_moves_every_channel_equally() {
        // Extreme draws on both ends of the interval.
        let mut s = scheduler(4, 0.235, &[3], &[1.0, -1.0, 0.5, -0.25]);
        s.fill_phrase(&mut discard_log()).unwrap();
        let t = s.timelines();
        let len = t.aligned_len().unwrap();

        let half = 0.235 * (1.0 / 6.0) / 2.0;
        let gap = 1.0 / 6.0 - 0.1;
        let gaps: usize = [1.0, -1.0, 0.5, -0.25]
            .iter()
            .map(|j| SampleRate::new(22050).frames_in(Seconds(gap + j * half)))
            .sum();
        assert_eq!(len, 3 * (4 * 2205 + gaps) + 2 * 14700);
    }

    #[test]
    fn log_rows_track_cycle_bar_and_clock() {
        let mut s = scheduler(4, 0.0, &[5, 6, 7], &[]);
        let mut log = PatternLog::new(Vec::new()).unwrap();
        s.fill_phrase(&mut log).unwrap();
        let mut w = WavWriter::new(
            Cursor::new(Vec::new()),
            WavHeaderDescriptor::new_with(&configuration(4, 0.0)),
        )
        .unwrap();
        s.drain(&mut w).unwrap();
        s.fill_phrase(&mut log).unwrap();
        assert_eq!(log.rows(), 10);

        let text = String::from_utf8(log.into_inner().unwrap()).unwrap();
        let rows: Vec<_> = text.lines().collect();
        assert_eq!(rows[0], PatternLog::<Vec<u8>>::HEADER);
        assert_eq!(rows[1], "1,1,5,0.000000,0.000000");
        assert_eq!(rows[2], "1,2,6,0.666667,0.666667");
        assert_eq!(rows[4], "1,4,-1,2.000000,2.000000");
        assert_eq!(rows[5], "1,5,-1,2.666667,2.666667");
        assert_eq!(rows[6], "2,1,5,3.333333,3.333333");
    }

    #[test]
    fn run_stops_when_nominal_clock_reaches_duration() {
        let c = configuration(4, 0.0);
        let mut s = PatternScheduler::new_with(&c, Rng::new_with_seed(3));
        let mut w =
            WavWriter::new(Cursor::new(Vec::new()), WavHeaderDescriptor::new_with(&c)).unwrap();
        let frames = s.run(&mut w, &mut discard_log()).unwrap();
        assert_eq!(s.cycle(), 3);
        assert_eq!(frames, 220500);
        assert_eq!(w.frames_written(), frames);
        assert!(s.is_finished());
        assert!(s.timelines().is_empty());
    }

    #[test]
    fn intro_gives_each_channel_its_own_window() {
        let c = ConfigurationBuilder::default()
            .sample_rate(SampleRate::new(1000))
            .duration(Seconds(10.0))
            .intro(Seconds(2.0))
            .build()
            .unwrap();
        let mut s = PatternScheduler::new_with(&c, Rng::new_with_seed(1));
        let mut w =
            WavWriter::new(Cursor::new(Vec::new()), WavHeaderDescriptor::new_with(&c)).unwrap();
        assert_eq!(s.play_intro(&mut w).unwrap(), 8000);
        assert_eq!(s.frames_drained(), 8000);
        assert_eq!(s.elapsed(), Seconds(0.0));
    }
}
