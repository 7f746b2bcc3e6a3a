//! RNG module - deterministic randomness for refill and special items
//!
//! The engine never calls a global RNG. Everything random (refill colours,
//! rocket directions, `rand` level cells) is drawn through [`RandomSource`],
//! so tests and replays can substitute a scripted or seeded source.
//!
//! [`SimpleRng`] is a small LCG that makes identical seeds produce identical games.

use crate::types::{CubeColor, RocketDirection};

/// Uniform selection among cube colours and rocket directions.
pub trait RandomSource {
    /// Random value in `[0, max)`. `max` is never zero.
    fn next_range(&mut self, max: u32) -> u32;

    fn cube_color(&mut self) -> CubeColor {
        let idx = self.next_range(CubeColor::ALL.len() as u32) as usize;
        CubeColor::ALL[idx]
    }

    fn rocket_direction(&mut self) -> RocketDirection {
        let idx = self.next_range(RocketDirection::ALL.len() as u32) as usize;
        RocketDirection::ALL[idx]
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_range(&mut self, max: u32) -> u32 {
        (**self).next_range(max)
    }
}

/// Seeded linear congruential generator (Numerical Recipes constants).
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Seed 0 is remapped to 1.
    pub fn new(seed: u32) -> Self {
        Self { state: seed.max(1) }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Current state, usable as a seed to replay from this point.
    pub fn state(&self) -> u32 {
        self.state
    }
}

impl RandomSource for SimpleRng {
    fn next_range(&mut self, max: u32) -> u32 {
        // High bits of an LCG are far better distributed than the low ones.
        (self.next_u32() >> 16) % max
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new(1)
    }
}
