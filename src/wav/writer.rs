// Copyright (c) 2024 Mike Tsao

use super::{Interleaver, RenderError, WavHeaderDescriptor};
use crate::elements::ChannelTimelines;
use std::io::{Seek, SeekFrom, Write};

/// Owns the output sink for one session. Writes the header on creation,
/// appends drained frames, and corrects the header's sizes when finished.
#[derive(Debug)]
pub struct WavWriter<W: Write> {
    sink: W,
    descriptor: WavHeaderDescriptor,
    interleaver: Interleaver,
    frames_written: u64,
}
impl<W: Write> WavWriter<W> {
    /// Writes `descriptor`'s header to `sink`.
    pub fn new(mut sink: W, descriptor: WavHeaderDescriptor) -> Result<Self, RenderError> {
        if !descriptor.fits_riff() {
            log::warn!(
                "{} bytes of audio exceed what RIFF can declare; header sizes will saturate",
                descriptor.data_len()
            );
        }
        descriptor.write_header(&mut sink)?;
        Ok(Self {
            sink,
            descriptor,
            interleaver: Interleaver::default(),
            frames_written: 0,
        })
    }

    /// Interleaves and writes everything accumulated in `timelines`, leaving
    /// them empty. Returns the number of frames written.
    pub fn drain(&mut self, timelines: &mut ChannelTimelines) -> Result<usize, RenderError> {
        let frames = self.interleaver.drain(timelines, &mut self.sink)?;
        self.frames_written += frames as u64;
        Ok(frames)
    }

    /// Frames written so far.
    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    /// The header as originally declared.
    pub fn descriptor(&self) -> &WavHeaderDescriptor {
        &self.descriptor
    }

    /// Flushes and gives back the sink without touching the header. Use this
    /// for sinks that can't seek.
    pub fn into_inner(mut self) -> Result<W, RenderError> {
        self.sink.flush()?;
        Ok(self.sink)
    }
}
impl<W: Write + Seek> WavWriter<W> {
    /// Rewrites the header if the frames actually written differ from what
    /// it declared, then flushes and returns the sink.
    pub fn finalize(mut self) -> Result<W, RenderError> {
        let declared = self.descriptor().frame_count;
        if self.frames_written != declared {
            log::warn!(
                "declared {declared} frames but wrote {}; rewriting header",
                self.frames_written
            );
            let actual = self.descriptor().with_frame_count(self.frames_written);
            self.sink.seek(SeekFrom::Start(0))?;
            actual.write_header(&mut self.sink)?;
            self.sink.seek(SeekFrom::End(0))?;
            self.descriptor = actual;
        }
        self.into_inner()
    }
}
