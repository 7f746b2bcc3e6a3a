//! Grid module - owns cell occupancy and cell anchors
//!
//! The grid is a `width x height` array stored as a flat vector in row-major
//! order (`y * width + x`), with row 0 at the bottom. Each cell is either empty
//! or holds one [`GridElement`], and each cell has a fixed world-space
//! [`Anchor`] used by the presentation layer.
//!
//! Every mutation goes through this type so that the array and each element's
//! own coordinate never disagree once a method returns.

use arrayvec::ArrayVec;

use crate::element::GridElement;
use crate::error::GridError;
use crate::factory::{AssetCatalog, ElementFactory};
use crate::level::LevelData;
use crate::rng::RandomSource;
use crate::types::{Anchor, Coord, ElementKind, LevelCell, CELL_SIZE, SPAWN_HEIGHT_OFFSET};

#[derive(Debug, Clone)]
pub struct GridState {
    width: usize,
    height: usize,
    /// Row-major cells, `y * width + x`
    cells: Vec<Option<GridElement>>,
    anchors: Vec<Anchor>,
}

impl GridState {
    /// Create an empty grid centred on the world origin.
    pub fn new(width: usize, height: usize) -> Result<Self, GridError> {
        Self::with_center(width, height, Anchor::default())
    }

    /// Create an empty grid whose anchors are centred on `center`.
    pub fn with_center(width: usize, height: usize, center: Anchor) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::MalformedLevelData(format!(
                "grid dimensions must be positive, got {width}x{height}"
            )));
        }
        if width > i32::MAX as usize || height > i32::MAX as usize {
            return Err(GridError::MalformedLevelData(format!(
                "grid dimensions {width}x{height} are too large"
            )));
        }

        // Even dimensions put the centre between two cells.
        let half_w = (width / 2) as f32;
        let half_h = (height / 2) as f32;
        let cell_offset_x = if width % 2 == 0 { CELL_SIZE / 2.0 } else { 0.0 };
        let cell_offset_y = if height % 2 == 0 { CELL_SIZE / 2.0 } else { 0.0 };

        let mut anchors = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                anchors.push(Anchor::new(
                    center.x + (x as f32 - half_w) * CELL_SIZE + cell_offset_x,
                    center.y + (y as f32 - half_h) * CELL_SIZE + cell_offset_y,
                ));
            }
        }

        Ok(Self {
            width,
            height,
            cells: vec![None; width * height],
            anchors,
        })
    }

    /// Build a full grid from level content.
    ///
    /// `rand` cells roll a cube colour from `rng`. Any failure aborts the whole
    /// build; no partially filled grid is ever returned.
    pub fn from_level<C, R>(
        level: &LevelData,
        center: Anchor,
        factory: &mut ElementFactory<C>,
        rng: &mut R,
    ) -> Result<Self, GridError>
    where
        C: AssetCatalog,
        R: RandomSource + ?Sized,
    {
        level.validate()?;
        let mut grid = Self::with_center(level.grid_width, level.grid_height, center)?;

        for (coord, cell) in level.cells() {
            let kind = match cell {
                LevelCell::Fixed(kind) => kind,
                LevelCell::Random => ElementKind::Cube(rng.cube_color()),
            };
            let element = factory.create(kind, coord)?;
            grid.place(coord, element)?;
        }

        Ok(grid)
    }

    #[inline(always)]
    fn index(&self, coord: Coord) -> Option<usize> {
        if !self.contains(coord) {
            return None;
        }
        Some(coord.y as usize * self.width + coord.x as usize)
    }

    fn checked_index(&self, coord: Coord) -> Result<usize, GridError> {
        self.index(coord).ok_or(GridError::InvalidCoordinate {
            coord,
            width: self.width,
            height: self.height,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn contains(&self, coord: Coord) -> bool {
        coord.x >= 0
            && coord.y >= 0
            && (coord.x as usize) < self.width
            && (coord.y as usize) < self.height
    }

    /// Occupant of `coord`; out-of-bounds coordinates are an error.
    pub fn get(&self, coord: Coord) -> Result<Option<&GridElement>, GridError> {
        let idx = self.checked_index(coord)?;
        Ok(self.cells[idx].as_ref())
    }

    /// Occupant of `coord`, or `None` when empty or out of bounds.
    pub fn element(&self, coord: Coord) -> Option<&GridElement> {
        self.index(coord).and_then(|idx| self.cells[idx].as_ref())
    }

    pub fn element_mut(&mut self, coord: Coord) -> Option<&mut GridElement> {
        let idx = self.index(coord)?;
        self.cells[idx].as_mut()
    }

    /// In bounds and unoccupied.
    pub fn is_empty(&self, coord: Coord) -> bool {
        matches!(self.index(coord), Some(idx) if self.cells[idx].is_none())
    }

    /// Put `element` at `coord`, updating its coordinate.
    pub fn place(&mut self, coord: Coord, mut element: GridElement) -> Result<(), GridError> {
        let idx = self.checked_index(coord)?;
        if self.cells[idx].is_some() {
            return Err(GridError::CellOccupied(coord));
        }
        element.set_coord(coord);
        self.cells[idx] = Some(element);
        Ok(())
    }

    /// Remove and return the occupant of `coord`, leaving the cell empty.
    pub fn take(&mut self, coord: Coord) -> Result<Option<GridElement>, GridError> {
        let idx = self.checked_index(coord)?;
        Ok(self.cells[idx].take())
    }

    /// Move the occupant of `from` into the empty cell `to`.
    pub fn move_element(&mut self, from: Coord, to: Coord) -> Result<(), GridError> {
        let src = self.checked_index(from)?;
        let dst = self.checked_index(to)?;
        if src == dst {
            return Ok(());
        }
        if self.cells[dst].is_some() {
            return Err(GridError::CellOccupied(to));
        }
        let Some(mut element) = self.cells[src].take() else {
            return Err(GridError::EmptyOrInactiveTarget(from));
        };
        element.set_coord(to);
        self.cells[dst] = Some(element);
        Ok(())
    }

    /// Set the active flag of the occupant of `coord`. Returns false for an empty cell.
    pub fn set_active(&mut self, coord: Coord, active: bool) -> Result<bool, GridError> {
        let idx = self.checked_index(coord)?;
        match self.cells[idx].as_mut() {
            Some(element) => {
                element.set_active(active);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Mark every element active (used when abandoning in-flight transitions).
    pub fn activate_all(&mut self) {
        for element in self.cells.iter_mut().flatten() {
            element.set_active(true);
        }
    }

    pub(crate) fn set_indicator(
        &mut self,
        coord: Coord,
        indicator: Option<crate::types::SpecialItemKind>,
    ) {
        if let Some(element) = self.element_mut(coord) {
            element.set_indicator(indicator);
        }
    }

    /// Resting anchor of a cell.
    pub fn anchor(&self, coord: Coord) -> Result<Anchor, GridError> {
        let idx = self.checked_index(coord)?;
        Ok(self.anchors[idx])
    }

    /// Where a refilled element targeting `coord` appears before falling in.
    pub fn spawn_anchor(&self, coord: Coord) -> Result<Anchor, GridError> {
        Ok(self.anchor(coord)?.raised(SPAWN_HEIGHT_OFFSET))
    }

    /// In-bounds orthogonal neighbours in Up, Right, Down, Left order.
    pub fn neighbors(&self, coord: Coord) -> ArrayVec<Coord, 4> {
        coord
            .neighbors()
            .into_iter()
            .filter(|&n| self.contains(n))
            .collect()
    }

    /// Every coordinate, column by column (x outer, y inner, bottom first).
    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        (0..self.width as i32).flat_map(move |x| (0..self.height as i32).map(move |y| Coord::new(x, y)))
    }

    /// All occupants in storage order.
    pub fn elements(&self) -> impl Iterator<Item = &GridElement> {
        self.cells.iter().flatten()
    }

    /// Every occupied cell agrees with its element's coordinate.
    pub fn is_consistent(&self) -> bool {
        self.coords()
            .all(|coord| self.element(coord).map_or(true, |e| e.coord() == coord))
    }

    /// No fall-capable element sits directly above an empty cell.
    pub fn is_gravity_settled(&self) -> bool {
        self.coords().all(|coord| match self.element(coord) {
            Some(element) if element.can_fall() && coord.y > 0 => {
                !self.is_empty(coord.offset(0, -1))
            }
            _ => true,
        })
    }
}
