use std::fmt;

use crate::grid::GridState;
use crate::types::{Coord, ElementKind};

/// Plain-data copy of grid occupancy for display, comparison and replay checks.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GridSnapshot {
    pub width: usize,
    pub height: usize,
    /// Row-major, row 0 at the bottom
    pub cells: Vec<Option<ElementKind>>,
    /// FNV-1a over the level codes of every cell
    pub grid_hash: u64,
}

impl GridSnapshot {
    pub fn capture(grid: &GridState) -> Self {
        let mut cells = Vec::with_capacity(grid.width() * grid.height());
        for y in 0..grid.height() as i32 {
            for x in 0..grid.width() as i32 {
                cells.push(grid.element(Coord::new(x, y)).map(|e| e.kind()));
            }
        }
        let grid_hash = fnv1a64(&cells);
        Self {
            width: grid.width(),
            height: grid.height(),
            cells,
            grid_hash,
        }
    }

    pub fn get(&self, coord: Coord) -> Option<ElementKind> {
        if coord.x < 0 || coord.y < 0 {
            return None;
        }
        let (x, y) = (coord.x as usize, coord.y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells[y * self.width + x]
    }

    pub fn occupied(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }
}

fn fnv1a64(cells: &[Option<ElementKind>]) -> u64 {
    let mut h: u64 = 0xcbf29ce484222325;
    for cell in cells {
        let code = cell.map_or(".", |k| k.code());
        for b in code.bytes().chain(std::iter::once(b'|')) {
            h ^= b as u64;
            h = h.wrapping_mul(0x00000100000001B3);
        }
    }
    h
}

/// Top row first, one code per cell, `.` for empty.
impl fmt::Display for GridSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in (0..self.height).rev() {
            for x in 0..self.width {
                if x > 0 {
                    f.write_str(" ")?;
                }
                let code = self.cells[y * self.width + x].map_or(".", |k| k.code());
                write!(f, "{code:>3}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl GridState {
    pub fn snapshot(&self) -> GridSnapshot {
        GridSnapshot::capture(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::ElementFactory;
    use crate::types::CubeColor;

    #[test]
    fn hash_changes_with_content() {
        let mut grid = GridState::new(2, 1).unwrap();
        let empty = grid.snapshot();

        let mut factory = ElementFactory::builtin();
        let coord = Coord::new(1, 0);
        grid.place(coord, factory.create(ElementKind::Cube(CubeColor::Red), coord).unwrap())
            .unwrap();
        let filled = grid.snapshot();

        assert_ne!(empty.grid_hash, filled.grid_hash);
        assert_eq!(filled.get(coord), Some(ElementKind::Cube(CubeColor::Red)));
        assert_eq!(filled.occupied(), 1);
    }

    #[test]
    fn renders_top_row_first() {
        let mut grid = GridState::new(1, 2).unwrap();
        let mut factory = ElementFactory::builtin();
        let top = Coord::new(0, 1);
        grid.place(top, factory.create(ElementKind::Cube(CubeColor::Blue), top).unwrap())
            .unwrap();
        assert_eq!(grid.snapshot().to_string(), "  b\n  .\n");
    }
}
