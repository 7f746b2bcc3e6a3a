//! Special-item policy
//!
//! Decides from a match's cube count whether a special item is synthesized.
//! Kept separate from the cascade engine so new thresholds and kinds can be
//! added without touching it.

use crate::grid::GridState;
use crate::matching::{find_matches, same_kind};
use crate::rng::RandomSource;
use crate::types::{Coord, ElementKind, SpecialItemKind, ROCKET_MATCH_THRESHOLD};

/// Turns an abstract special item into a concrete element variant.
pub trait SpecialItemRoll {
    fn roll<R: RandomSource + ?Sized>(self, rng: &mut R) -> ElementKind;
}

impl SpecialItemRoll for SpecialItemKind {
    fn roll<R: RandomSource + ?Sized>(self, rng: &mut R) -> ElementKind {
        match self {
            SpecialItemKind::Rocket => ElementKind::Rocket(rng.rocket_direction()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecialItemPolicy {
    /// Minimum matched cube count that yields a rocket
    pub rocket_threshold: usize,
}

impl SpecialItemPolicy {
    pub fn new(rocket_threshold: usize) -> Self {
        Self { rocket_threshold }
    }

    pub fn decide(&self, matched_cube_count: usize) -> Option<SpecialItemKind> {
        if matched_cube_count >= self.rocket_threshold {
            Some(SpecialItemKind::Rocket)
        } else {
            None
        }
    }
}

impl Default for SpecialItemPolicy {
    fn default() -> Self {
        Self::new(ROCKET_MATCH_THRESHOLD)
    }
}

/// Recompute the "would become a special item" indicator of every cube.
///
/// Only the indicator flags change; occupancy is untouched.
pub fn refresh_indicators(grid: &mut GridState, policy: &SpecialItemPolicy) {
    let coords: Vec<_> = grid.coords().collect();
    for &coord in &coords {
        grid.set_indicator(coord, None);
    }

    let mut visited = vec![false; grid.width() * grid.height()];
    let width = grid.width();
    let slot = move |c: Coord| c.y as usize * width + c.x as usize;

    for &coord in &coords {
        if visited[slot(coord)] {
            continue;
        }
        match grid.element(coord) {
            Some(element) if element.is_cube() && element.is_active() => {}
            _ => continue,
        }

        let Ok(group) = find_matches(grid, coord, same_kind) else {
            continue;
        };
        for &member in group.coords() {
            visited[slot(member)] = true;
        }

        if let Some(kind) = policy.decide(group.len()) {
            for &member in group.coords() {
                grid.set_indicator(member, Some(kind));
            }
        }
    }
}
