//! Load-time generators — the boarding-duration oracle bound to each platform.
//!
//! # Determinism strategy
//!
//! Each platform gets its own independent `SmallRng` seeded by:
//!
//!   seed = (src XOR (dst rotated)) * MIXING_CONSTANT XOR popularity
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads adjacent station pairs uniformly across the seed space.
//! This means:
//!
//! - Platforms never share generator state, so the durations a platform
//!   hands out depend only on its own call sequence — which the phase
//!   protocol fixes — and never on how stations are partitioned.
//! - The same scenario produces the same durations at any process count.
//!
//! The boarding train's id perturbs each draw without consuming extra RNG
//! state, so two trains boarding in swapped order still see stable streams.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::{StationId, TrainId};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

// ── LoadTimeGen ───────────────────────────────────────────────────────────────

/// The per-platform boarding-duration oracle.
///
/// Implementations must return a duration ≥ 1; the engine treats 0 as a
/// fatal protocol violation.  One generator instance is bound to each
/// platform at construction and queried once per train boarded.
pub trait LoadTimeGen {
    /// Next load duration in ticks for `train` boarding at this platform.
    fn next_load_time(&mut self, train: TrainId) -> u64;
}

// ── PopularityLoadGen ─────────────────────────────────────────────────────────

/// Default oracle: durations in `1..=popularity + 1`, drawn from a
/// platform-local deterministic stream.
///
/// Busier stations (higher popularity) produce longer and more variable
/// boarding times, which is what drives holding-queue contention in
/// realistic scenarios.
pub struct PopularityLoadGen {
    rng:        SmallRng,
    popularity: u64,
}

impl PopularityLoadGen {
    /// Seed deterministically from the platform's directed edge and the
    /// source station's popularity.
    pub fn new(src: StationId, dst: StationId, popularity: u64) -> Self {
        let edge = (src.0 as u64) ^ (dst.0 as u64).rotate_left(32);
        let seed = edge.wrapping_mul(MIXING_CONSTANT) ^ popularity;
        PopularityLoadGen {
            rng: SmallRng::seed_from_u64(seed),
            popularity,
        }
    }
}

impl LoadTimeGen for PopularityLoadGen {
    fn next_load_time(&mut self, train: TrainId) -> u64 {
        let draw: u64 = self.rng.gen_range(0..=self.popularity);
        // Fold the train id in without consuming stream state.
        let jitter = (train.0 as u64).wrapping_mul(MIXING_CONSTANT) >> 61;
        1 + (draw + jitter) % (self.popularity + 1)
    }
}

// ── FixedLoadGen ──────────────────────────────────────────────────────────────

/// Oracle that always returns the same duration.  Used by the reference
/// scenarios and anywhere a test needs hand-computable timelines.
#[derive(Copy, Clone)]
pub struct FixedLoadGen(pub u64);

impl LoadTimeGen for FixedLoadGen {
    fn next_load_time(&mut self, _train: TrainId) -> u64 {
        self.0
    }
}
