//! Core grid logic - pure, deterministic, and testable
//!
//! This crate contains the rules of the cube grid: occupancy, matching,
//! special-item decisions, gravity and refill, plus the level and factory
//! plumbing needed to build a grid. It has **no dependency** on animation,
//! async runtimes, or I/O beyond reading level files, making it:
//!
//! - **Deterministic**: Same seed and same taps produce identical grids
//! - **Testable**: Every rule is reachable without a presentation layer
//! - **Portable**: Runs headless, in a terminal, or behind a game engine
//!
//! # Module Structure
//!
//! - [`element`]: Live element instances (id, hp, coordinate, active flag)
//! - [`grid`]: The grid array and its cell anchors; sole owner of occupancy
//! - [`matching`]: Breadth-first match finder and its adjacency predicates
//! - [`special`]: Special-item policy and potential-match indicators
//! - [`gravity`]: Per-column compaction and refill
//! - [`factory`]: Element ids and cached asset lookup
//! - [`level`]: Level JSON parsing and validation
//! - [`rng`]: Substitutable randomness
//! - [`snapshot`]: Plain-data grid copies
//!
//! # Example
//!
//! ```
//! use cube_blast_core::{find_matches, player_match, ElementFactory, GridState, LevelData, SimpleRng};
//! use cube_blast_core::types::{Anchor, Coord};
//!
//! let codes = ["r", "r", "b", "r"].iter().map(|s| s.to_string()).collect();
//! let level = LevelData::new(1, 2, 2, 10, codes).unwrap();
//!
//! let mut factory = ElementFactory::builtin();
//! let mut rng = SimpleRng::new(1);
//! let grid = GridState::from_level(&level, Anchor::default(), &mut factory, &mut rng).unwrap();
//!
//! let set = find_matches(&grid, Coord::new(0, 0), player_match).unwrap();
//! assert_eq!(set.len(), 3);
//! ```

pub mod element;
pub mod error;
pub mod factory;
pub mod gravity;
pub mod grid;
pub mod level;
pub mod matching;
pub mod rng;
pub mod snapshot;
pub mod special;

pub use cube_blast_types as types;

// Re-export commonly used types for convenience
pub use element::{ElementId, GridElement};
pub use error::GridError;
pub use factory::{AssetCatalog, AssetId, BuiltinCatalog, ElementFactory};
pub use gravity::{apply_gravity, ElementMove, GravityOutcome, SpawnedElement};
pub use grid::GridState;
pub use level::LevelData;
pub use matching::{find_matches, player_match, rocket_link, same_kind, MatchSet};
pub use rng::{RandomSource, SimpleRng};
pub use snapshot::GridSnapshot;
pub use special::{refresh_indicators, SpecialItemPolicy, SpecialItemRoll};
