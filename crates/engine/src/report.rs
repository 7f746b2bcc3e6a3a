//! What happened during one resolution.
//!
//! The engine returns a [`CascadeReport`] instead of broadcasting events, so
//! the caller owns the only consumer and nothing needs unsubscribing.

use crate::core::ElementId;
use crate::types::{Coord, ElementKind, ObstacleKind, RocketDirection, SpecialItemKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearedElement {
    pub id: ElementId,
    pub coord: Coord,
    pub kind: ElementKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CascadeEvent {
    /// A player match was accepted; consumes one move.
    MovePerformed,
    ElementCleared(ClearedElement),
    SpecialItemCreated {
        coord: Coord,
        kind: ElementKind,
        special: SpecialItemKind,
    },
    RocketFired {
        origin: Coord,
        direction: RocketDirection,
    },
    /// Gravity and refill finished; the grid is settled.
    FallCompleted,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CascadeReport {
    pub events: Vec<CascadeEvent>,
    pub gravity_runs: usize,
    pub rockets_fired: usize,
    pub peak_in_flight: usize,
}

impl CascadeReport {
    pub(crate) fn push(&mut self, event: CascadeEvent) {
        self.events.push(event);
    }

    pub fn moves_consumed(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, CascadeEvent::MovePerformed))
            .count()
    }

    pub fn cleared(&self) -> impl Iterator<Item = &ClearedElement> {
        self.events.iter().filter_map(|e| match e {
            CascadeEvent::ElementCleared(cleared) => Some(cleared),
            _ => None,
        })
    }

    pub fn cleared_coords(&self) -> Vec<Coord> {
        self.cleared().map(|c| c.coord).collect()
    }

    pub fn cleared_obstacles(&self, kind: ObstacleKind) -> usize {
        self.cleared()
            .filter(|c| c.kind == ElementKind::Obstacle(kind))
            .count()
    }

    pub fn specials_created(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, CascadeEvent::SpecialItemCreated { .. }))
            .count()
    }

    pub fn fall_completed(&self) -> bool {
        self.events
            .last()
            .map_or(false, |e| matches!(e, CascadeEvent::FallCompleted))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// A previous resolution is still in progress.
    Busy,
    EmptyOrInactive,
    /// Obstacles do not react to taps.
    NotInteractive,
    TooFewCubes,
    NoSpecialItems,
}

/// Outcome of an engine entry point that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved(CascadeReport),
    Ignored(IgnoreReason),
}

impl Resolution {
    pub fn report(&self) -> Option<&CascadeReport> {
        match self {
            Resolution::Resolved(report) => Some(report),
            Resolution::Ignored(_) => None,
        }
    }

    pub fn into_report(self) -> Option<CascadeReport> {
        match self {
            Resolution::Resolved(report) => Some(report),
            Resolution::Ignored(_) => None,
        }
    }

    pub fn ignored(&self) -> Option<IgnoreReason> {
        match self {
            Resolution::Ignored(reason) => Some(*reason),
            Resolution::Resolved(_) => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Resolution::Resolved(_))
    }
}
