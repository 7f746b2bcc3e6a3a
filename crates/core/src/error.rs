//! Error taxonomy shared by the grid, level loading and the cascade engine.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::{Coord, ElementKind};

#[derive(Debug, Error)]
pub enum GridError {
    /// Coordinate outside the grid. Rejected without mutation.
    #[error("coordinate {coord} is outside the {width}x{height} grid")]
    InvalidCoordinate {
        coord: Coord,
        width: usize,
        height: usize,
    },

    /// No element, or the element is mid-transition.
    #[error("no active element at {0}")]
    EmptyOrInactiveTarget(Coord),

    #[error("cell {0} is already occupied")]
    CellOccupied(Coord),

    /// Level content cannot produce a grid. Fatal to level start.
    #[error("malformed level data: {0}")]
    MalformedLevelData(String),

    #[error("no asset registered for {0}")]
    MissingAssetForElement(ElementKind),

    #[error("level file holds level {found}, expected {expected}")]
    LevelNumberMismatch { expected: u32, found: u32 },

    #[error("failed to parse level data: {0}")]
    LevelParse(#[from] serde_json::Error),

    #[error("failed to read level file {path}: {source}")]
    LevelIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GridError {
    /// Stable short code for logs and reports.
    pub fn code(&self) -> &'static str {
        match self {
            GridError::InvalidCoordinate { .. } => "invalid_coordinate",
            GridError::EmptyOrInactiveTarget(_) => "empty_or_inactive_target",
            GridError::CellOccupied(_) => "cell_occupied",
            GridError::MalformedLevelData(_)
            | GridError::LevelNumberMismatch { .. }
            | GridError::LevelParse(_)
            | GridError::LevelIo { .. } => "malformed_level_data",
            GridError::MissingAssetForElement(_) => "missing_asset",
        }
    }
}
