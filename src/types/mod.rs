// Copyright (c) 2024 Mike Tsao

//! Common data types used throughout the system.

/// The most commonly used imports.
pub mod prelude {
    pub use super::{ChannelLayout, ChannelMask, FrequencyHz, SampleRate, Seconds};
}

pub use {
    channels::{ChannelLayout, ChannelMask},
    numbers::FrequencyHz,
    time::{SampleRate, Seconds},
};

mod channels;
mod numbers;
mod time;
