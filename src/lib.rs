// Copyright (c) 2024 Mike Tsao

#![deny(missing_docs, unused_imports, unused_variables)]
#![allow(rustdoc::private_intra_doc_links)]

//! crtone renders coordinated-reset (CR) vibrotactile stimulation as
//! multichannel WAV audio.
//!
//! Each output channel drives one stimulation site (a "finger"). Within every
//! bar, each finger receives exactly one short tone burst, in an order drawn
//! at random per bar, with the beats nudged off a strict grid by a small
//! random jitter. Groups of stimulation bars alternate with silent bars.
//!
//! * *Easiest*: build a [Configuration] with [ConfigurationBuilder], wrap it
//! in a [Session], and call
//! [Session::render_to_path()](orchestration::Session::render_to_path()).
//! * *More control*: drive a [PatternScheduler](stimulation::PatternScheduler)
//! yourself, supplying your own [PatternSource](util::PatternSource), a
//! [WavWriter](wav::WavWriter) over any sink, and a
//! [PatternLog](stimulation::PatternLog).
//! * *Building blocks*: [ToneGenerator](elements::ToneGenerator),
//! [ChannelTimelines](elements::ChannelTimelines), and
//! [WavHeaderDescriptor](wav::WavHeaderDescriptor) work on their own.

/// A collection of imports that are useful to users of this crate. `use
/// crtone::prelude::*;` for easier onboarding.
pub mod prelude {
    pub use super::{
        config::{Configuration, ConfigurationBuilder, ConfigurationError},
        elements::prelude::*,
        orchestration::prelude::*,
        stimulation::prelude::*,
        types::prelude::*,
        util::prelude::*,
        wav::prelude::*,
    };
}

// Fundamental structures that are important enough to re-export at top level.
pub use {
    config::{Configuration, ConfigurationBuilder, ConfigurationError},
    orchestration::Session,
    version::app_version,
};

pub mod config;
pub mod elements;
pub mod orchestration;
pub mod stimulation;
pub mod types;
pub mod util;
pub mod wav;

mod version;
