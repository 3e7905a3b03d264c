// Copyright (c) 2024 Mike Tsao

//! Serializes channel timelines into a RIFF/WAVE container: the header, the
//! interleaved PCM16 data that follows it, and the size fix-up at the end.

/// The most commonly used imports.
pub mod prelude {
    pub use super::{Interleaver, RenderError, WavHeaderDescriptor, WavWriter};
}

pub use header::WavHeaderDescriptor;
pub use interleave::Interleaver;
pub use writer::WavWriter;

mod header;
mod interleave;
mod writer;

use thiserror::Error;

/// Failures while serializing audio. Both are fatal to the run.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The sink refused a write or seek.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Channel timelines held different sample counts at drain time. This is
    /// a bug in whatever filled them, not a runtime condition.
    #[error("channel {channel} holds {actual} samples but channel 0 holds {expected}")]
    AlignmentDrift {
        /// The first channel whose length disagreed.
        channel: usize,
        /// Channel 0's length.
        expected: usize,
        /// The disagreeing channel's length.
        actual: usize,
    },
}
