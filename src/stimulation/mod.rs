// Copyright (c) 2024 Mike Tsao

//! The coordinated-reset pattern: which finger fires on each beat, when, and
//! the audit trail of those choices.

/// The most commonly used imports.
pub mod prelude {
    pub use super::{BarRecord, PatternLog, PatternScheduler};
}

pub use pattern_log::{BarRecord, PatternLog};
pub use scheduler::PatternScheduler;

mod pattern_log;
mod scheduler;
