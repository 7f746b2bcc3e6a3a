//! Cube Blast (workspace facade crate).
//!
//! Re-exports the grid rules, the cascade engine and the shared types as
//! `cube_blast::{core,engine,types}`; the implementation lives in the crates
//! under `crates/`.

pub use cube_blast_core as core;
pub use cube_blast_engine as engine;
pub use cube_blast_types as types;
