//! Shared helpers for the integration tests.
#![allow(dead_code)]

use cube_blast::core::{GridState, LevelData};
use cube_blast::engine::{Animator, CascadeEngine, EngineConfig};
use cube_blast::types::{Coord, ElementKind};

/// Level from rows written top row first, codes separated by whitespace.
pub fn level_from_rows(rows: &[&str], move_count: u32) -> LevelData {
    let height = rows.len();
    let width = rows[0].split_whitespace().count();
    let mut codes = Vec::with_capacity(width * height);
    for row in rows.iter().rev() {
        let row: Vec<String> = row.split_whitespace().map(str::to_string).collect();
        assert_eq!(row.len(), width, "ragged test level");
        codes.extend(row);
    }
    LevelData::new(1, width, height, move_count, codes).expect("valid test level")
}

pub fn engine_with<A: Animator>(rows: &[&str], config: EngineConfig, animator: A) -> CascadeEngine<A> {
    CascadeEngine::from_level(&level_from_rows(rows, 20), &config, animator).expect("engine builds")
}

pub fn engine<A: Animator>(rows: &[&str], animator: A) -> CascadeEngine<A> {
    engine_with(rows, EngineConfig::default(), animator)
}

pub fn kind_at(grid: &GridState, x: i32, y: i32) -> Option<ElementKind> {
    grid.element(Coord::new(x, y)).map(|e| e.kind())
}

/// Invariants every settled grid must satisfy.
pub fn assert_settled(grid: &GridState) {
    assert!(grid.is_consistent(), "grid array and element coordinates disagree");
    assert!(grid.is_gravity_settled(), "element left floating:\n{}", grid.snapshot());
    assert!(grid.elements().all(|e| e.is_active()), "inactive element after resolution");
}
