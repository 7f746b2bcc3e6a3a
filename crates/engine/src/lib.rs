//! Cascade engine - async resolution of player actions
//!
//! Wraps the pure grid rules from `cube-blast-core` with the parts that take
//! time: transitions the presentation layer animates, rocket sweeps that run
//! concurrently and chain into each other, and the single gravity pass that
//! follows once everything has landed.
//!
//! # Module Structure
//!
//! - [`coordinator`]: [`CascadeEngine`], the Idle/Resolving state machine
//! - [`transition`]: [`Animator`] seam and awaitable [`TransitionHandle`]s
//! - [`sweep`]: Lock-step rocket lanes
//! - [`inflight`]: Counter gating gravity on sweep completion
//! - [`report`]: Events produced by one resolution
//! - [`session`]: Moves, goals, win/lose and saved progress
//! - [`config`]: Engine tunables and environment overrides
//!
//! # Example
//!
//! ```
//! use cube_blast_engine::{CascadeEngine, EngineConfig, InstantAnimator};
//! use cube_blast_engine::core::LevelData;
//! use cube_blast_engine::types::Coord;
//!
//! let codes = ["r", "r", "g", "b"].iter().map(|s| s.to_string()).collect();
//! let level = LevelData::new(1, 2, 2, 5, codes).unwrap();
//! let mut engine = CascadeEngine::from_level(&level, &EngineConfig::default(), InstantAnimator).unwrap();
//!
//! let resolution = tokio_test::block_on(engine.tap(Coord::new(0, 0))).unwrap();
//! assert_eq!(resolution.report().unwrap().cleared().count(), 2);
//! ```

pub mod config;
pub mod coordinator;
pub mod inflight;
pub mod report;
pub mod session;
pub mod sweep;
pub mod transition;

pub use cube_blast_core as core;
pub use cube_blast_types as types;

pub use config::EngineConfig;
pub use coordinator::{CascadeEngine, Phase};
pub use inflight::InFlight;
pub use report::{CascadeEvent, CascadeReport, ClearedElement, IgnoreReason, Resolution};
pub use session::{LevelOutcome, MemoryProgressStore, Progress, ProgressStore, Session};
pub use sweep::{combo_lanes, RocketSweep};
pub use transition::{
    Animator, InstantAnimator, RecordingAnimator, Transition, TransitionDone, TransitionHandle, TransitionStatus,
};
