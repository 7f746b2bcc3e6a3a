use std::env;

use crate::types::{Anchor, MIN_MATCH_CUBES, ROCKET_MATCH_THRESHOLD};

pub const SEED_ENV: &str = "CUBE_BLAST_SEED";
pub const ROCKET_THRESHOLD_ENV: &str = "CUBE_BLAST_ROCKET_THRESHOLD";

/// Engine tunables.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Seed for [`crate::core::SimpleRng`]
    pub seed: u32,
    /// Matched cube count that synthesizes a rocket
    pub rocket_threshold: usize,
    /// World-space centre of the grid
    pub grid_center: Anchor,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            rocket_threshold: ROCKET_MATCH_THRESHOLD,
            grid_center: Anchor::default(),
        }
    }
}

impl EngineConfig {
    /// Defaults overridden by `CUBE_BLAST_SEED` and `CUBE_BLAST_ROCKET_THRESHOLD`.
    ///
    /// Unparseable values are ignored with a warning.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(mut lookup: impl FnMut(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();

        if let Some(raw) = lookup(SEED_ENV) {
            match raw.trim().parse::<u32>() {
                Ok(seed) => cfg.seed = seed,
                Err(_) => log::warn!("ignoring {SEED_ENV}={raw:?}: not a u32"),
            }
        }

        if let Some(raw) = lookup(ROCKET_THRESHOLD_ENV) {
            match raw.trim().parse::<usize>() {
                Ok(threshold) => cfg.rocket_threshold = threshold,
                Err(_) => log::warn!("ignoring {ROCKET_THRESHOLD_ENV}={raw:?}: not a count"),
            }
        }

        cfg.with_rocket_threshold(cfg.rocket_threshold)
    }

    /// Set the rocket threshold, never below the minimum match size.
    pub fn with_rocket_threshold(mut self, threshold: usize) -> Self {
        self.rocket_threshold = threshold.max(MIN_MATCH_CUBES);
        self
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.rocket_threshold, 4);
        assert_eq!(cfg.seed, 1);
    }

    #[test]
    fn reads_overrides() {
        let cfg = EngineConfig::from_lookup(|key| match key {
            SEED_ENV => Some("42".to_string()),
            ROCKET_THRESHOLD_ENV => Some(" 5 ".to_string()),
            _ => None,
        });
        assert_eq!(cfg.seed, 42);
        assert_eq!(cfg.rocket_threshold, 5);
    }

    #[test]
    fn bad_values_fall_back() {
        let cfg = EngineConfig::from_lookup(|key| match key {
            SEED_ENV => Some("seven".to_string()),
            ROCKET_THRESHOLD_ENV => Some("1".to_string()),
            _ => None,
        });
        assert_eq!(cfg.seed, 1);
        assert_eq!(cfg.rocket_threshold, MIN_MATCH_CUBES);
    }
}
