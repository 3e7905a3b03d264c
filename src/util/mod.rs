// Copyright (c) 2024 Mike Tsao

//! System utilities.

/// Commonly used imports.
pub mod prelude {
    pub use super::rng::{PatternSource, Rng};
}

pub use rng::{PatternSource, Rng};

mod rng;
