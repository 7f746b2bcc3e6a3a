//! Rocket sweeps
//!
//! A sweep walks its lane outward from the origin along two rays, one cell per
//! ray per step. The coordinator advances every live sweep once per step, in
//! firing order, so concurrent rockets progress in lock-step.

use std::collections::VecDeque;

use arrayvec::ArrayVec;

use crate::core::GridState;
use crate::transition::TransitionHandle;
use crate::types::{Coord, RocketDirection};

#[derive(Debug)]
pub struct RocketSweep {
    origin: Coord,
    origin_pending: bool,
    rays: [VecDeque<Coord>; 2],
    launch: Option<TransitionHandle>,
}

impl RocketSweep {
    /// Lane of a rocket at `origin`. Cells outside the grid are never yielded.
    ///
    /// With `include_origin` the first step also yields the origin cell; used
    /// by virtual rockets that do not occupy the cell they fire from.
    pub fn new(grid: &GridState, origin: Coord, direction: RocketDirection, include_origin: bool) -> Self {
        let (dx, dy) = direction.step();
        let ray = |dx: i32, dy: i32| {
            let mut cells = VecDeque::new();
            let mut next = origin.offset(dx, dy);
            while grid.contains(next) {
                cells.push_back(next);
                next = next.offset(dx, dy);
            }
            cells
        };

        Self {
            origin,
            origin_pending: include_origin && grid.contains(origin),
            rays: [ray(-dx, -dy), ray(dx, dy)],
            launch: None,
        }
    }

    pub(crate) fn with_launch(mut self, launch: TransitionHandle) -> Self {
        self.launch = Some(launch);
        self
    }

    pub fn origin(&self) -> Coord {
        self.origin
    }

    /// Cells reached in the next step: the origin (first step only, when
    /// included), then the next cell of each ray.
    pub fn advance(&mut self) -> ArrayVec<Coord, 3> {
        let mut step = ArrayVec::new();
        if self.origin_pending {
            self.origin_pending = false;
            step.push(self.origin);
        }
        for ray in &mut self.rays {
            if let Some(coord) = ray.pop_front() {
                step.push(coord);
            }
        }
        step
    }

    pub fn is_exhausted(&self) -> bool {
        !self.origin_pending && self.rays.iter().all(VecDeque::is_empty)
    }

    pub(crate) fn take_launch(&mut self) -> Option<TransitionHandle> {
        self.launch.take()
    }
}

/// Lanes fired by a rocket combo centred on `center`: the rows above, at and
/// below it, and the columns left of, at and right of it. Lanes whose origin
/// falls outside the grid are skipped.
pub fn combo_lanes(grid: &GridState, center: Coord) -> ArrayVec<(Coord, RocketDirection), 6> {
    let candidates = [
        (center.offset(0, 1), RocketDirection::Horizontal),
        (center.offset(1, 0), RocketDirection::Vertical),
        (center.offset(0, -1), RocketDirection::Horizontal),
        (center.offset(-1, 0), RocketDirection::Vertical),
        (center, RocketDirection::Vertical),
        (center, RocketDirection::Horizontal),
    ];
    candidates
        .into_iter()
        .filter(|(origin, _)| grid.contains(*origin))
        .collect()
}
