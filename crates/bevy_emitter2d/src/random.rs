//! Uniform random source used when spawning particles.

use bevy::prelude::*;

/// Uniform float generator in `[0, 1)` plus derived samplers.
///
/// The emitter never reaches for a global generator; callers hand one in so
/// a seeded source replays the exact same spawn sequence.
pub trait RandomSource {
    /// Next uniform float in `[0, 1)`.
    fn next_f32(&mut self) -> f32;

    /// Linearly scaled sample between `min` and `max`. Inverted ranges are
    /// sampled as-is.
    fn range(&mut self, min: f32, max: f32) -> f32 {
        min + (max - min) * self.next_f32()
    }

    /// `true` with probability `p`.
    fn chance(&mut self, p: f32) -> bool {
        self.next_f32() < p
    }

    /// Uniform index in `0..n`; `0` when `n == 0`.
    fn index(&mut self, n: usize) -> usize {
        if n == 0 {
            return 0;
        }
        ((self.next_f32() * n as f32) as usize).min(n - 1)
    }
}

impl RandomSource for fastrand::Rng {
    fn next_f32(&mut self) -> f32 {
        self.f32()
    }
}

/// Shared generator driving every emitter the plugin updates.
#[derive(Resource)]
pub struct ParticleRng(pub fastrand::Rng);

impl ParticleRng {
    pub fn with_seed(seed: u64) -> Self {
        Self(fastrand::Rng::with_seed(seed))
    }
}

impl Default for ParticleRng {
    fn default() -> Self {
        Self(fastrand::Rng::new())
    }
}
