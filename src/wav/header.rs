// Copyright (c) 2024 Mike Tsao

use crate::prelude::*;
use byteorder::{LittleEndian, WriteBytesExt};
use std::io::{self, Write};

/// Everything a WAV header states about the stream that follows it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WavHeaderDescriptor {
    /// Frames (one sample per channel) in the data chunk.
    pub frame_count: u64,
    /// Interleaved channels per frame.
    pub channel_count: u16,
    /// Frames per second.
    pub sample_rate: u32,
    /// Speaker positions. Only written in the extensible format.
    pub channel_mask: ChannelMask,
}
impl WavHeaderDescriptor {
    /// Always PCM16.
    pub const BYTES_PER_SAMPLE: u16 = 2;
    /// Length of the canonical PCM header.
    pub const CANONICAL_HEADER_LEN: usize = 44;
    /// Length of the WAVE_FORMAT_EXTENSIBLE header.
    pub const EXTENSIBLE_HEADER_LEN: usize = 68;

    const WAVE_FORMAT_PCM: u16 = 0x0001;
    const WAVE_FORMAT_EXTENSIBLE: u16 = 0xFFFE;
    const CANONICAL_FMT_LEN: u32 = 16;
    const EXTENSIBLE_FMT_LEN: u32 = 40;
    // cbSize: the bytes after the canonical fmt fields.
    const EXTENSION_LEN: u16 = 22;
    // KSDATAFORMAT_SUBTYPE_PCM, 00000001-0000-0010-8000-00aa00389b71.
    const PCM_SUBFORMAT_GUID: [u8; 16] = [
        0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x10, 0x00, 0x80, 0x00, 0x00, 0xaa, 0x00, 0x38, 0x9b,
        0x71,
    ];

    /// Describes a session's output, declaring its up-front frame estimate.
    pub fn new_with(configuration: &Configuration) -> Self {
        Self {
            frame_count: configuration.declared_frames() as u64,
            channel_count: configuration.channel_count as u16,
            sample_rate: configuration.sample_rate.into(),
            channel_mask: configuration.channel_mask(),
        }
    }

    /// The same stream with a different frame count.
    pub fn with_frame_count(&self, frame_count: u64) -> Self {
        Self {
            frame_count,
            ..*self
        }
    }

    /// More than two channels need the extensible format to say which
    /// speaker each one feeds.
    pub fn is_extensible(&self) -> bool {
        self.channel_count > 2
    }

    /// Bytes in the header this descriptor produces.
    pub fn header_len(&self) -> usize {
        if self.is_extensible() {
            Self::EXTENSIBLE_HEADER_LEN
        } else {
            Self::CANONICAL_HEADER_LEN
        }
    }

    /// Bytes per frame.
    pub fn block_align(&self) -> u16 {
        self.channel_count * Self::BYTES_PER_SAMPLE
    }

    /// The true size of the data chunk, which may not fit in RIFF's 32 bits.
    pub fn data_len(&self) -> u64 {
        self.frame_count * self.block_align() as u64
    }

    /// Whether the RIFF size fields can represent this stream exactly.
    pub fn fits_riff(&self) -> bool {
        self.riff_len() <= u32::MAX as u64
    }

    fn riff_len(&self) -> u64 {
        // Everything after the RIFF chunk's own id and size.
        (self.header_len() - 8) as u64 + self.data_len()
    }

    /// Serializes the header into a new buffer.
    pub fn build_header(&self) -> io::Result<Vec<u8>> {
        let mut header = Vec::with_capacity(self.header_len());
        self.write_header(&mut header)?;
        Ok(header)
    }

    /// Writes the header to `w`. Sizes too large for RIFF saturate at
    /// `u32::MAX`.
    pub fn write_header<W: Write>(&self, w: &mut W) -> io::Result<()> {
        let saturate = |len: u64| len.min(u32::MAX as u64) as u32;
        let bits_per_sample = Self::BYTES_PER_SAMPLE * 8;

        w.write_all(b"RIFF")?;
        w.write_u32::<LittleEndian>(saturate(self.riff_len()))?;
        w.write_all(b"WAVE")?;

        w.write_all(b"fmt ")?;
        if self.is_extensible() {
            w.write_u32::<LittleEndian>(Self::EXTENSIBLE_FMT_LEN)?;
            w.write_u16::<LittleEndian>(Self::WAVE_FORMAT_EXTENSIBLE)?;
        } else {
            w.write_u32::<LittleEndian>(Self::CANONICAL_FMT_LEN)?;
            w.write_u16::<LittleEndian>(Self::WAVE_FORMAT_PCM)?;
        }
        w.write_u16::<LittleEndian>(self.channel_count)?;
        w.write_u32::<LittleEndian>(self.sample_rate)?;
        w.write_u32::<LittleEndian>(self.sample_rate * self.block_align() as u32)?;
        w.write_u16::<LittleEndian>(self.block_align())?;
        w.write_u16::<LittleEndian>(bits_per_sample)?;
        if self.is_extensible() {
            w.write_u16::<LittleEndian>(Self::EXTENSION_LEN)?;
            w.write_u16::<LittleEndian>(bits_per_sample)?;
            w.write_u32::<LittleEndian>(self.channel_mask.0)?;
            w.write_all(&Self::PCM_SUBFORMAT_GUID)?;
        }

        w.write_all(b"data")?;
        w.write_u32::<LittleEndian>(saturate(self.data_len()))?;
        Ok(())
    }
}
