// Copyright (c) 2024 Mike Tsao

//! Building blocks for stimulation patterns: tone bursts, the per-channel
//! sample accumulators they are written into, and finger orderings.

/// The most commonly used imports.
pub mod prelude {
    pub use super::{
        permutation::Permutation,
        timeline::ChannelTimelines,
        tone::{ToneGenerator, ToneGeneratorBuilder, ToneTable},
    };
}

pub use permutation::Permutation;
pub use timeline::ChannelTimelines;
pub use tone::{ToneGenerator, ToneGeneratorBuilder, ToneTable};

mod permutation;
mod timeline;
mod tone;
