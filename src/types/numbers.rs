// Copyright (c) 2024 Mike Tsao

//! Numeric types used throughout the system.

use super::Seconds;
use serde::{Deserialize, Serialize};
use synonym::Synonym;

/// Cycles per second.
#[derive(Synonym, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FrequencyHz(pub f64);
impl FrequencyHz {
    /// The length of one cycle. A zero frequency has no period, so we return
    /// zero rather than infinity.
    pub fn period(&self) -> Seconds {
        if self.0 > 0.0 {
            Seconds(1.0 / self.0)
        } else {
            Seconds::zero()
        }
    }
}
