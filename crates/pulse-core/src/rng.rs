//! Random draws for the simulation.
//!
//! Every random decision in the engine reduces to a uniform draw in `[0, 1)`
//! scaled and floored, so a `RandomSource` only has to produce that draw.
//! `SimRng` is the seeded production source; tests can script exact draws.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub trait RandomSource {
    /// Uniform draw in `[0, 1)`.
    fn next_unit(&mut self) -> f64;

    /// `floor(draw * span)`, always `< span` for a non-zero span.
    fn floor_scaled(&mut self, span: u64) -> u64 {
        if span == 0 {
            return 0;
        }
        let scaled = (self.next_unit() * span as f64).floor() as u64;
        scaled.min(span - 1)
    }

    /// Uniform index into a collection of `len` items.
    fn pick_index(&mut self, len: usize) -> usize {
        self.floor_scaled(len as u64) as usize
    }

    /// `floor(draw * span) - span / 2`, a delta roughly centred on zero.
    fn centred_delta(&mut self, span: u64) -> i64 {
        self.floor_scaled(span) as i64 - (span / 2) as i64
    }
}

#[derive(Debug, Clone)]
pub struct SimRng {
    inner: ChaCha8Rng,
}

impl SimRng {
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SimRng {
    fn next_unit(&mut self) -> f64 {
        self.inner.gen::<f64>()
    }
}

/// Replays a fixed list of draws, then repeats the last one.
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    draws: Vec<f64>,
    cursor: usize,
}

impl ScriptedRandom {
    pub fn new(draws: impl Into<Vec<f64>>) -> Self {
        Self {
            draws: draws.into(),
            cursor: 0,
        }
    }
}

impl RandomSource for ScriptedRandom {
    fn next_unit(&mut self) -> f64 {
        let Some(last) = self.draws.last().copied() else {
            return 0.0;
        };
        let draw = self.draws.get(self.cursor).copied().unwrap_or(last);
        self.cursor = self.cursor.saturating_add(1);
        draw.clamp(0.0, 0.999_999_999)
    }
}
