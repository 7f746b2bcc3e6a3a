//! Match finder - breadth-first connectivity search over the grid
//!
//! A match is the maximal set of cells reachable from a start cell by
//! repeatedly stepping to an orthogonal neighbour that is present, active, and
//! accepted by an adjacency predicate evaluated between the cell being expanded
//! and the candidate. The start cell is always part of the result; callers
//! decide pass/fail from the set's size or contents.

use std::collections::VecDeque;

use crate::element::GridElement;
use crate::error::GridError;
use crate::grid::GridState;
use crate::types::Coord;

/// Connected cells in breadth-first discovery order (start first).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSet {
    coords: Vec<Coord>,
}

impl MatchSet {
    pub fn coords(&self) -> &[Coord] {
        &self.coords
    }

    pub fn start(&self) -> Coord {
        self.coords[0]
    }

    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    pub fn contains(&self, coord: Coord) -> bool {
        self.coords.contains(&coord)
    }

    /// Number of active cubes in the set.
    pub fn cube_count(&self, grid: &GridState) -> usize {
        self.coords
            .iter()
            .filter(|&&c| matches!(grid.element(c), Some(e) if e.is_cube() && e.is_active()))
            .count()
    }
}

/// Breadth-first search from `start` under `predicate(current, candidate)`.
///
/// Inactive or empty neighbours are skipped without ending the search. An
/// empty start cell yields a set containing only the start.
pub fn find_matches<P>(grid: &GridState, start: Coord, mut predicate: P) -> Result<MatchSet, GridError>
where
    P: FnMut(&GridElement, &GridElement) -> bool,
{
    grid.get(start)?;

    let mut visited = vec![false; grid.width() * grid.height()];
    let slot = |c: Coord| c.y as usize * grid.width() + c.x as usize;

    let mut coords = vec![start];
    let mut queue = VecDeque::from([start]);
    visited[slot(start)] = true;

    while let Some(current) = queue.pop_front() {
        let Some(current_element) = grid.element(current) else {
            continue;
        };

        for neighbor in grid.neighbors(current) {
            if visited[slot(neighbor)] {
                continue;
            }
            let Some(candidate) = grid.element(neighbor) else {
                continue;
            };
            if !candidate.is_active() || !predicate(current_element, candidate) {
                continue;
            }

            visited[slot(neighbor)] = true;
            coords.push(neighbor);
            queue.push_back(neighbor);
        }
    }

    Ok(MatchSet { coords })
}

/// "Can these two be cleared together by a player tap".
pub fn player_match(current: &GridElement, candidate: &GridElement) -> bool {
    current.can_match_with(candidate)
}

/// Same-colour cubes only; used for special-item indicators.
pub fn same_kind(current: &GridElement, candidate: &GridElement) -> bool {
    current.is_same_with(candidate)
}

/// Rockets touching rockets; used to detect rocket combos.
pub fn rocket_link(current: &GridElement, candidate: &GridElement) -> bool {
    current.is_rocket() && candidate.is_rocket()
}
