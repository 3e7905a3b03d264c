// Copyright (c) 2024 Mike Tsao

//! Support for rendering a whole session from a [Configuration](crate::Configuration).

/// The most commonly used imports.
pub mod prelude {
    pub use super::{RenderSummary, Session};
}

pub use session::{RenderSummary, Session};

mod session;
