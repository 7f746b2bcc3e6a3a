//! Level session - move budget, obstacle goals and saved progress
//!
//! A [`Session`] consumes the [`CascadeReport`]s of one level in order. Moves
//! and goal counts change as events arrive, but the level only ends after a
//! fall has completed, so a winning clear always plays out on a settled grid.

use std::collections::BTreeMap;
use std::convert::Infallible;

use serde::{Deserialize, Serialize};

use crate::core::LevelData;
use crate::report::{CascadeEvent, CascadeReport};
use crate::types::{ElementKind, ObstacleKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelOutcome {
    Won,
    Lost,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    level_number: u32,
    remaining_moves: u32,
    goals: BTreeMap<ObstacleKind, u32>,
    ending: bool,
    outcome: Option<LevelOutcome>,
}

impl Session {
    /// Moves from the level, one goal per obstacle kind present in the grid.
    pub fn start(level: &LevelData) -> Self {
        Self {
            level_number: level.level_number,
            remaining_moves: level.move_count,
            goals: level.obstacle_goals(),
            ending: false,
            outcome: None,
        }
    }

    pub fn level_number(&self) -> u32 {
        self.level_number
    }

    pub fn remaining_moves(&self) -> u32 {
        self.remaining_moves
    }

    /// Obstacles still to clear, by kind. Completed goals are removed.
    pub fn goals(&self) -> &BTreeMap<ObstacleKind, u32> {
        &self.goals
    }

    pub fn goal_remaining(&self, kind: ObstacleKind) -> u32 {
        self.goals.get(&kind).copied().unwrap_or(0)
    }

    pub fn outcome(&self) -> Option<LevelOutcome> {
        self.outcome
    }

    /// False once the level is decided or about to be.
    pub fn accepts_input(&self) -> bool {
        !self.ending && self.outcome.is_none()
    }

    /// Fold one resolution into the session. Returns the outcome when this
    /// report ended the level.
    pub fn apply(&mut self, report: &CascadeReport) -> Option<LevelOutcome> {
        if self.outcome.is_some() {
            return None;
        }
        for event in &report.events {
            match event {
                CascadeEvent::MovePerformed => self.on_move(),
                CascadeEvent::ElementCleared(cleared) => {
                    if let ElementKind::Obstacle(kind) = cleared.kind {
                        self.on_obstacle_cleared(kind);
                    }
                }
                CascadeEvent::FallCompleted => {
                    if let Some(outcome) = self.on_fall_completed() {
                        return Some(outcome);
                    }
                }
                CascadeEvent::SpecialItemCreated { .. } | CascadeEvent::RocketFired { .. } => {}
            }
        }
        None
    }

    fn on_move(&mut self) {
        self.remaining_moves = self.remaining_moves.saturating_sub(1);
        if self.remaining_moves == 0 {
            self.ending = true;
        }
    }

    fn on_obstacle_cleared(&mut self, kind: ObstacleKind) {
        let Some(count) = self.goals.get_mut(&kind) else {
            return;
        };
        *count = count.saturating_sub(1);
        if *count == 0 {
            self.goals.remove(&kind);
        }
        if self.goals.is_empty() {
            self.ending = true;
        }
    }

    fn on_fall_completed(&mut self) -> Option<LevelOutcome> {
        if !self.ending {
            return None;
        }
        let outcome = if self.goals.is_empty() {
            LevelOutcome::Won
        } else if self.remaining_moves == 0 {
            LevelOutcome::Lost
        } else {
            return None;
        };
        log::info!("level {} finished: {outcome:?}", self.level_number);
        self.outcome = Some(outcome);
        Some(outcome)
    }
}

/// Highest completed level, persisted between runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub reached_level_index: u32,
}

impl Progress {
    /// Level the player plays next (1-based).
    pub fn next_level(&self) -> u32 {
        self.reached_level_index + 1
    }

    /// Record a win of `level_number`. Replaying an earlier level changes nothing.
    pub fn complete(&mut self, level_number: u32) -> bool {
        if level_number < self.next_level() {
            return false;
        }
        self.reached_level_index = level_number;
        true
    }

    pub fn all_completed(&self, total_levels: u32) -> bool {
        self.next_level() > total_levels
    }
}

pub trait ProgressStore {
    type Error: std::error::Error + Send + Sync + 'static;

    fn load(&self) -> Result<Progress, Self::Error>;
    fn save(&mut self, progress: &Progress) -> Result<(), Self::Error>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryProgressStore {
    saved: Option<Progress>,
    saves: usize,
}

impl MemoryProgressStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl ProgressStore for MemoryProgressStore {
    type Error = Infallible;

    fn load(&self) -> Result<Progress, Infallible> {
        Ok(self.saved.unwrap_or_default())
    }

    fn save(&mut self, progress: &Progress) -> Result<(), Infallible> {
        self.saved = Some(*progress);
        self.saves += 1;
        Ok(())
    }
}
