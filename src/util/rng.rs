// Copyright (c) 2024 Mike Tsao

//! Provides the random-number generator that drives stimulation patterns.

use crate::elements::Permutation;
use byteorder::{BigEndian, ByteOrder};
use delegate::delegate;

/// The source of every random decision a stimulation pattern makes. [Rng]
/// is the production implementation; tests substitute scripted sequences.
pub trait PatternSource {
    /// Returns an index in `0..Permutation::COUNT`, uniformly distributed.
    fn next_permutation(&mut self) -> usize;

    /// Returns a value uniformly distributed in `[-half_range, +half_range]`.
    fn next_jitter(&mut self, half_range: f64) -> f64;
}

/// A pseudorandom number generator (PRNG) for applications such as
/// digital-audio libraries that don't require cryptographically secure random
/// numbers.
#[derive(Debug)]
pub struct Rng(oorandom::Rand64);
impl Default for Rng {
    fn default() -> Self {
        Self::new_with_seed(Self::generate_seed().unwrap_or_else(|e| {
            log::warn!("couldn't get an OS seed ({e}); falling back to a fixed seed");
            Self::FALLBACK_SEED
        }))
    }
}
#[allow(missing_docs)]
impl Rng {
    const FALLBACK_SEED: u128 = 0x9E37_79B9_7F4A_7C15;

    /// Pass the same number to [Rng::new_with_seed()] to get the same stream
    /// back again. Good for reproducing a session exactly.
    pub fn new_with_seed(seed: u128) -> Self {
        Self(oorandom::Rand64::new(seed))
    }

    /// Create a sufficiently high-quality random number that's suitable for
    /// [Rng].
    pub fn generate_seed() -> anyhow::Result<u128> {
        let mut bytes = [0u8; 16];

        getrandom::getrandom(&mut bytes)?;
        Ok(BigEndian::read_u128(&bytes))
    }

    delegate! {
        to self.0 {
            pub fn rand_u64(&mut self) -> u64;
            pub fn rand_float(&mut self) -> f64;
            pub fn rand_range(&mut self, range: core::ops::Range<u64>) -> u64;
        }
    }
}
impl PatternSource for Rng {
    fn next_permutation(&mut self) -> usize {
        self.rand_range(0..Permutation::COUNT as u64) as usize
    }

    fn next_jitter(&mut self, half_range: f64) -> f64 {
        (self.rand_float() * 2.0 - 1.0) * half_range
    }
}
