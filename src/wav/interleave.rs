// Copyright (c) 2024 Mike Tsao

use super::RenderError;
use crate::elements::ChannelTimelines;
use byteorder::{ByteOrder, LittleEndian};
use std::io::Write;

/// Turns per-channel timelines into interleaved little-endian PCM16 bytes.
/// The byte buffer is reused across drains so it only grows to the size of
/// the largest phrase.
#[derive(Debug, Default)]
pub struct Interleaver {
    buffer: Vec<u8>,
}
impl Interleaver {
    /// Writes every accumulated frame to `sink`, channels in order 0..N within
    /// each frame, then clears the timelines. Returns the number of frames
    /// written.
    ///
    /// Fails without writing anything if the timelines aren't aligned.
    pub fn drain<W: Write>(
        &mut self,
        timelines: &mut ChannelTimelines,
        sink: &mut W,
    ) -> Result<usize, RenderError> {
        let frames = timelines
            .aligned_len()
            .map_err(|(channel, expected, actual)| RenderError::AlignmentDrift {
                channel,
                expected,
                actual,
            })?;
        let channel_count = timelines.channel_count();

        self.buffer.clear();
        self.buffer.resize(frames * channel_count * 2, 0);
        for channel in 0..channel_count {
            self.buffer
                .chunks_exact_mut(channel_count * 2)
                .zip(timelines.channel(channel))
                .for_each(|(frame, sample)| {
                    LittleEndian::write_i16(&mut frame[channel * 2..channel * 2 + 2], *sample)
                });
        }
        sink.write_all(&self.buffer)?;

        timelines.clear();
        Ok(frames)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::*;

    #[test]
    fn frames_interleave_in_channel_order() {
        let mut t = ChannelTimelines::new(3, SampleRate::new(1000));
        for (channel, samples) in [[1, 2], [-1, -2], [0x1234, 0x7fff]].iter().enumerate() {
            samples.iter().for_each(|s| t.append(channel, *s));
        }
        let mut out = Vec::new();
        let frames = Interleaver::default().drain(&mut t, &mut out).unwrap();
        assert_eq!(frames, 2);
        assert_eq!(
            out,
            vec![
                0x01, 0x00, 0xff, 0xff, 0x34, 0x12, // frame 0
                0x02, 0x00, 0xfe, 0xff, 0xff, 0x7f, // frame 1
            ]
        );
        assert!(t.is_empty());
    }

    #[test]
    fn misaligned_timelines_fail_loudly() {
        let mut t = ChannelTimelines::new(4, SampleRate::new(1000));
        t.append_silent_frames_to_all(10);
        t.append(2, 5);
        let mut out = Vec::new();
        let r = Interleaver::default().drain(&mut t, &mut out);
        assert!(matches!(
            r,
            Err(RenderError::AlignmentDrift {
                channel: 2,
                expected: 10,
                actual: 11
            })
        ));
        assert!(out.is_empty());
        assert!(!t.is_empty(), "a failed drain leaves the evidence in place");
    }

    #[test]
    fn buffer_is_reused_across_drains() {
        let mut t = ChannelTimelines::new(4, SampleRate::new(1000));
        let mut interleaver = Interleaver::default();
        let mut out = Vec::new();
        t.append_silent_frames_to_all(100);
        interleaver.drain(&mut t, &mut out).unwrap();
        let capacity = interleaver.buffer.capacity();
        t.append_silent_frames_to_all(50);
        assert_eq!(interleaver.drain(&mut t, &mut out).unwrap(), 50);
        assert_eq!(interleaver.buffer.capacity(), capacity);
        assert_eq!(out.len(), 150 * 4 * 2);
    }
}
