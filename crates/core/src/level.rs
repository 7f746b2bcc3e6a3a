//! Level data - authored grid content
//!
//! Levels are JSON documents:
//!
//! ```json
//! {
//!   "level_number": 1,
//!   "grid_width": 3,
//!   "grid_height": 2,
//!   "move_count": 10,
//!   "grid": ["r", "r", "bo", "b", "rand", "s"]
//! }
//! ```
//!
//! `grid` is row-major with row 0 at the bottom: the code for `(x, y)` sits at
//! index `y * grid_width + x`. Unknown codes fall back to a random cube.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::GridError;
use crate::types::{Coord, ElementKind, LevelCell, ObstacleKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelData {
    pub level_number: u32,
    pub grid_width: usize,
    pub grid_height: usize,
    pub move_count: u32,
    pub grid: Vec<String>,
}

impl LevelData {
    /// Build and validate level data from already-split codes.
    pub fn new(
        level_number: u32,
        grid_width: usize,
        grid_height: usize,
        move_count: u32,
        grid: Vec<String>,
    ) -> Result<Self, GridError> {
        let data = Self {
            level_number,
            grid_width,
            grid_height,
            move_count,
            grid,
        };
        data.validate()?;
        Ok(data)
    }

    pub fn from_json(text: &str) -> Result<Self, GridError> {
        let data: Self = serde_json::from_str(text)?;
        data.validate()?;
        Ok(data)
    }

    /// File name of a level inside a levels directory (`level_07.json`).
    pub fn file_name(level_number: u32) -> String {
        format!("level_{level_number:02}.json")
    }

    /// Load `level_NN.json` from `dir` and check it really is level `level_number`.
    pub fn load(dir: &Path, level_number: u32) -> Result<Self, GridError> {
        let path = dir.join(Self::file_name(level_number));
        let text = fs::read_to_string(&path).map_err(|source| GridError::LevelIo {
            path: path.clone(),
            source,
        })?;

        let data = Self::from_json(&text)?;
        if data.level_number != level_number {
            return Err(GridError::LevelNumberMismatch {
                expected: level_number,
                found: data.level_number,
            });
        }
        Ok(data)
    }

    /// Count the `level_NN.json` files in `dir`.
    pub fn count_in(dir: &Path) -> Result<u32, GridError> {
        let entries = fs::read_dir(dir).map_err(|source| GridError::LevelIo {
            path: dir.to_path_buf(),
            source,
        })?;

        let count = entries
            .filter_map(Result::ok)
            .filter(|entry| {
                let name = entry.file_name();
                let name = name.to_string_lossy();
                name.starts_with("level_") && name.ends_with(".json")
            })
            .count();
        Ok(count as u32)
    }

    pub fn validate(&self) -> Result<(), GridError> {
        if self.grid_width == 0 || self.grid_height == 0 {
            return Err(GridError::MalformedLevelData(format!(
                "grid dimensions must be positive, got {}x{}",
                self.grid_width, self.grid_height
            )));
        }
        let expected = self.grid_width.checked_mul(self.grid_height).ok_or_else(|| {
            GridError::MalformedLevelData("grid dimensions overflow".to_string())
        })?;
        if self.grid.len() != expected {
            return Err(GridError::MalformedLevelData(format!(
                "grid has {} cells, expected {} ({}x{})",
                self.grid.len(),
                expected,
                self.grid_width,
                self.grid_height
            )));
        }
        Ok(())
    }

    /// Parsed content of `coord`. Unknown codes become random cubes.
    pub fn cell(&self, coord: Coord) -> Option<LevelCell> {
        if coord.x < 0 || coord.y < 0 {
            return None;
        }
        let (x, y) = (coord.x as usize, coord.y as usize);
        if x >= self.grid_width || y >= self.grid_height {
            return None;
        }

        let code = self.grid.get(y * self.grid_width + x)?;
        Some(LevelCell::from_code(code).unwrap_or_else(|| {
            log::warn!("invalid element code {code:?} at {coord}, using a random cube");
            LevelCell::Random
        }))
    }

    /// Every cell in row-major order, bottom row first.
    pub fn cells(&self) -> impl Iterator<Item = (Coord, LevelCell)> + '_ {
        (0..self.grid_height as i32).flat_map(move |y| {
            (0..self.grid_width as i32).filter_map(move |x| {
                let coord = Coord::new(x, y);
                self.cell(coord).map(|cell| (coord, cell))
            })
        })
    }

    /// How many of each obstacle the level contains, which is what must be cleared to win.
    pub fn obstacle_goals(&self) -> BTreeMap<ObstacleKind, u32> {
        let mut goals = BTreeMap::new();
        for (_, cell) in self.cells() {
            if let LevelCell::Fixed(ElementKind::Obstacle(kind)) = cell {
                *goals.entry(kind).or_insert(0) += 1;
            }
        }
        goals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CubeColor;

    fn codes(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_json_and_indexes_bottom_row_first() {
        let json = r#"{
            "level_number": 3,
            "grid_width": 2,
            "grid_height": 2,
            "move_count": 5,
            "grid": ["r", "g", "bo", "rand"]
        }"#;
        let level = LevelData::from_json(json).unwrap();

        assert_eq!(level.move_count, 5);
        assert_eq!(
            level.cell(Coord::new(1, 0)),
            Some(LevelCell::Fixed(ElementKind::Cube(CubeColor::Green)))
        );
        assert_eq!(
            level.cell(Coord::new(0, 1)),
            Some(LevelCell::Fixed(ElementKind::Obstacle(ObstacleKind::Box)))
        );
        assert_eq!(level.cell(Coord::new(1, 1)), Some(LevelCell::Random));
    }

    #[test]
    fn rejects_dimension_mismatch() {
        let err = LevelData::new(1, 3, 3, 10, codes(&["r"; 8])).unwrap_err();
        assert!(matches!(err, GridError::MalformedLevelData(_)));

        let err = LevelData::new(1, 0, 3, 10, Vec::new()).unwrap_err();
        assert!(matches!(err, GridError::MalformedLevelData(_)));
    }

    #[test]
    fn unknown_codes_fall_back_to_random() {
        let level = LevelData::new(1, 1, 1, 1, codes(&["zz"])).unwrap();
        assert_eq!(level.cell(Coord::new(0, 0)), Some(LevelCell::Random));
    }

    #[test]
    fn counts_obstacle_goals() {
        let level = LevelData::new(1, 3, 2, 1, codes(&["bo", "s", "v", "bo", "r", "rand"])).unwrap();
        let goals = level.obstacle_goals();
        assert_eq!(goals.get(&ObstacleKind::Box), Some(&2));
        assert_eq!(goals.get(&ObstacleKind::Stone), Some(&1));
        assert_eq!(goals.get(&ObstacleKind::Vase), Some(&1));
    }

    #[test]
    fn file_names_are_zero_padded() {
        assert_eq!(LevelData::file_name(7), "level_07.json");
        assert_eq!(LevelData::file_name(12), "level_12.json");
    }
}
