//! Pseudo-random capability handed to the simulation
//!
//! The generator is an explicit object owned by the caller of `tick`, never
//! module-level state.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Random integers for spawning logic
pub trait RandomSource {
    /// Uniform integer in `[minimum, maximum]`, both ends inclusive.
    /// Returns `minimum` for an empty range.
    fn random_integer(&mut self, minimum: i32, maximum: i32) -> i32;
}

/// Seeded PCG generator, reproducible across runs
#[derive(Debug, Clone)]
pub struct PcgRandom {
    seed: u64,
    rng: Pcg32,
}

impl PcgRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Seed the sequence started from
    pub fn current_seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for PcgRandom {
    fn random_integer(&mut self, minimum: i32, maximum: i32) -> i32 {
        if maximum <= minimum {
            return minimum;
        }
        self.rng.random_range(minimum..=maximum)
    }
}

/// Replays a fixed list of values, clamped into the requested range.
/// Falls back to the range minimum once exhausted.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub(crate) struct ScriptedRandom {
    values: std::collections::VecDeque<i32>,
}

#[cfg(test)]
impl ScriptedRandom {
    pub(crate) fn new(values: &[i32]) -> Self {
        Self {
            values: values.iter().copied().collect(),
        }
    }
}

#[cfg(test)]
impl RandomSource for ScriptedRandom {
    fn random_integer(&mut self, minimum: i32, maximum: i32) -> i32 {
        self.values
            .pop_front()
            .map(|v| v.clamp(minimum, maximum.max(minimum)))
            .unwrap_or(minimum)
    }
}
