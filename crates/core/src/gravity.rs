//! Gravity and refill
//!
//! Columns are processed independently in a single bottom-up pass:
//!
//! 1. Each fall-capable element drops by the number of empty cells below it,
//!    counted down to the nearest non-falling element (stone) or the floor.
//!    Elements below have already settled, so nothing moves twice.
//! 2. Empty cells counted from the top of the column down to the first
//!    non-falling element are refilled with new random elements.
//!
//! Stones never move and nothing passes through them: cells below a stone are
//! neither compacted into nor refilled.

use crate::element::{ElementId, GridElement};
use crate::error::GridError;
use crate::grid::GridState;
use crate::types::Coord;

/// An existing element that fell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementMove {
    pub id: ElementId,
    pub from: Coord,
    pub to: Coord,
}

/// A refilled element, already placed at `coord`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnedElement {
    pub id: ElementId,
    pub coord: Coord,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GravityOutcome {
    pub moves: Vec<ElementMove>,
    pub spawned: Vec<SpawnedElement>,
    /// Cells the spawner could not fill; left empty for a later pass
    pub unfilled: Vec<Coord>,
}

/// Empty cells in column `x` strictly below `below_y` (or from the top when
/// `None`), stopping at the first non-falling element.
pub fn empty_cells_below(grid: &GridState, x: i32, below_y: Option<i32>) -> usize {
    let start = below_y.map_or(grid.height() as i32 - 1, |y| y - 1);
    let mut count = 0;
    for y in (0..=start).rev() {
        match grid.element(Coord::new(x, y)) {
            None => count += 1,
            Some(element) if !element.can_fall() => break,
            Some(_) => {}
        }
    }
    count
}

/// Drop every fall-capable element of column `x` onto whatever is below it.
pub fn compact_column(grid: &mut GridState, x: i32, outcome: &mut GravityOutcome) -> Result<(), GridError> {
    for y in 0..grid.height() as i32 {
        let from = Coord::new(x, y);
        let id = match grid.element(from) {
            Some(element) if element.can_fall() => element.id(),
            _ => continue,
        };

        let drop = empty_cells_below(grid, x, Some(y));
        if drop == 0 {
            continue;
        }

        let to = Coord::new(x, y - drop as i32);
        grid.move_element(from, to)?;
        outcome.moves.push(ElementMove { id, from, to });
    }
    Ok(())
}

/// Fill the open top of column `x`, lowest open cell first.
///
/// A failed spawn is retried on the same cell, so whatever stays unfilled
/// sits at the top of the column and nothing hangs over a hole.
pub fn refill_column<F>(grid: &mut GridState, x: i32, spawn: &mut F, outcome: &mut GravityOutcome) -> Result<(), GridError>
where
    F: FnMut(Coord) -> Result<GridElement, GridError>,
{
    let height = grid.height() as i32;
    let missing = empty_cells_below(grid, x, None);
    let mut y = height - missing as i32;
    for _ in 0..missing {
        let coord = Coord::new(x, y);
        match spawn(coord) {
            Ok(element) => {
                let id = element.id();
                grid.place(coord, element)?;
                outcome.spawned.push(SpawnedElement { id, coord });
                y += 1;
            }
            Err(err) => log::error!("failed to create random element at {coord}: {err}"),
        }
    }
    outcome.unfilled.extend((y..height).map(|y| Coord::new(x, y)));
    Ok(())
}

/// Compact and refill every column.
pub fn apply_gravity<F>(grid: &mut GridState, mut spawn: F) -> Result<GravityOutcome, GridError>
where
    F: FnMut(Coord) -> Result<GridElement, GridError>,
{
    let mut outcome = GravityOutcome::default();
    for x in 0..grid.width() as i32 {
        compact_column(grid, x, &mut outcome)?;
        refill_column(grid, x, &mut spawn, &mut outcome)?;
    }
    log::debug!(
        "gravity: {} moved, {} spawned, {} unfilled",
        outcome.moves.len(),
        outcome.spawned.len(),
        outcome.unfilled.len()
    );
    Ok(outcome)
}
