//! Cascade coordinator
//!
//! Owns the grid for the duration of a level and turns player taps into
//! resolutions: match, converge, clear, fire rockets, then one gravity pass.
//! Every entry point takes `&mut self`, so at most one resolution can be in
//! progress; a second one can only be attempted after a previous future was
//! dropped mid-flight, and is rejected as [`IgnoreReason::Busy`] until
//! [`CascadeEngine::settle`] is called.

use crate::config::EngineConfig;
use crate::core::{
    apply_gravity, find_matches, player_match, refresh_indicators, rocket_link, AssetCatalog, BuiltinCatalog,
    ElementFactory, ElementId, GridError, GridState, LevelData, MatchSet, RandomSource, SimpleRng,
    SpecialItemPolicy, SpecialItemRoll,
};
use crate::inflight::InFlight;
use crate::report::{CascadeEvent, CascadeReport, ClearedElement, IgnoreReason, Resolution};
use crate::sweep::{combo_lanes, RocketSweep};
use crate::transition::{Animator, Transition, TransitionHandle, TransitionStatus};
use crate::types::{Coord, ElementKind, RocketDirection, MIN_MATCH_CUBES};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Resolving,
}

pub struct CascadeEngine<A, R = SimpleRng, C = BuiltinCatalog> {
    grid: GridState,
    factory: ElementFactory<C>,
    rng: R,
    animator: A,
    policy: SpecialItemPolicy,
    phase: Phase,
    in_flight: InFlight,
    /// Elements announced as cleared whose removal waits on a transition
    doomed: Vec<(Coord, ElementId)>,
}

impl<A: Animator> CascadeEngine<A> {
    /// Build the level grid with the builtin catalog and a seeded [`SimpleRng`].
    pub fn from_level(level: &LevelData, config: &EngineConfig, animator: A) -> Result<Self, GridError> {
        let mut factory = ElementFactory::builtin();
        let mut rng = SimpleRng::new(config.seed);
        let grid = GridState::from_level(level, config.grid_center, &mut factory, &mut rng)?;
        let policy = SpecialItemPolicy::new(config.rocket_threshold);
        Ok(Self::new(grid, factory, rng, animator, policy))
    }
}

impl<A, R, C> CascadeEngine<A, R, C>
where
    A: Animator,
    R: RandomSource,
    C: AssetCatalog,
{
    pub fn new(
        mut grid: GridState,
        factory: ElementFactory<C>,
        rng: R,
        animator: A,
        policy: SpecialItemPolicy,
    ) -> Self {
        refresh_indicators(&mut grid, &policy);
        Self {
            grid,
            factory,
            rng,
            animator,
            policy,
            phase: Phase::Idle,
            in_flight: InFlight::new(),
            doomed: Vec::new(),
        }
    }

    pub fn grid(&self) -> &GridState {
        &self.grid
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn policy(&self) -> &SpecialItemPolicy {
        &self.policy
    }

    pub fn factory(&self) -> &ElementFactory<C> {
        &self.factory
    }

    pub fn animator(&self) -> &A {
        &self.animator
    }

    pub fn animator_mut(&mut self) -> &mut A {
        &mut self.animator
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.count()
    }

    /// Route a tap on `coord` to the behaviour of whatever occupies it.
    pub async fn tap(&mut self, coord: Coord) -> Result<Resolution, GridError> {
        if self.phase != Phase::Idle {
            return Ok(Resolution::Ignored(IgnoreReason::Busy));
        }
        match self.target(coord)? {
            None => Ok(Resolution::Ignored(IgnoreReason::EmptyOrInactive)),
            Some(ElementKind::Cube(_)) => self.perform_matching(coord).await,
            Some(ElementKind::Rocket(_)) => self.activate_rocket(coord).await,
            Some(ElementKind::Obstacle(_)) => Ok(Resolution::Ignored(IgnoreReason::NotInteractive)),
        }
    }

    /// Clear the player-match group around `source`, synthesizing a special
    /// item when the group is large enough.
    pub async fn perform_matching(&mut self, source: Coord) -> Result<Resolution, GridError> {
        if self.phase != Phase::Idle {
            return Ok(Resolution::Ignored(IgnoreReason::Busy));
        }
        match self.target(source)? {
            None => return Ok(Resolution::Ignored(IgnoreReason::EmptyOrInactive)),
            Some(kind) if !kind.is_cube() => return Ok(Resolution::Ignored(IgnoreReason::NotInteractive)),
            Some(_) => {}
        }

        let matched = find_matches(&self.grid, source, player_match)?;
        let cube_count = matched.cube_count(&self.grid);
        if cube_count < MIN_MATCH_CUBES {
            log::debug!("tap at {source}: {cube_count} cube(s), ignored");
            return Ok(Resolution::Ignored(IgnoreReason::TooFewCubes));
        }

        log::debug!("tap at {source}: {} matched, {cube_count} cubes", matched.len());
        let mut report = self.begin();
        report.push(CascadeEvent::MovePerformed);
        let result = self.resolve_match(&matched, cube_count, &mut report).await;
        self.conclude(result, report)
    }

    /// Fire the rocket at `source`, or a combo when other rockets touch it.
    pub async fn activate_rocket(&mut self, source: Coord) -> Result<Resolution, GridError> {
        if self.phase != Phase::Idle {
            return Ok(Resolution::Ignored(IgnoreReason::Busy));
        }
        let direction = match self.target(source)? {
            None => return Ok(Resolution::Ignored(IgnoreReason::EmptyOrInactive)),
            Some(ElementKind::Rocket(direction)) => direction,
            Some(_) => return Ok(Resolution::Ignored(IgnoreReason::NotInteractive)),
        };

        let linked = find_matches(&self.grid, source, rocket_link)?;
        log::debug!("rocket at {source}: {} linked", linked.len());

        let mut report = self.begin();
        report.push(CascadeEvent::MovePerformed);
        let result = self.resolve_rocket(&linked, direction, &mut report).await;
        self.conclude(result, report)
    }

    /// Fire every remaining rocket at once, then settle the grid.
    ///
    /// Used once a level is won; it does not consume a move.
    pub async fn detonate_remaining_specials(&mut self) -> Result<Resolution, GridError> {
        if self.phase != Phase::Idle {
            return Ok(Resolution::Ignored(IgnoreReason::Busy));
        }
        let rockets: Vec<(Coord, RocketDirection)> = self
            .grid
            .coords()
            .filter_map(|coord| match self.grid.element(coord) {
                Some(element) if element.is_active() => match element.kind() {
                    ElementKind::Rocket(direction) => Some((coord, direction)),
                    _ => None,
                },
                _ => None,
            })
            .collect();
        if rockets.is_empty() {
            return Ok(Resolution::Ignored(IgnoreReason::NoSpecialItems));
        }

        log::debug!("detonating {} remaining rocket(s)", rockets.len());
        let mut report = self.begin();
        let result = self.resolve_detonation(&rockets, &mut report).await;
        self.conclude(result, report)
    }

    /// Recover from a resolution whose future was dropped before completing.
    ///
    /// Removes elements whose clear was already announced, reactivates the
    /// rest, resets the in-flight counter and runs gravity. Safe to call when
    /// idle.
    pub async fn settle(&mut self) -> Result<CascadeReport, GridError> {
        let mut report = CascadeReport::default();
        for (coord, id) in std::mem::take(&mut self.doomed) {
            if self.grid.element(coord).map(|e| e.id()) == Some(id) {
                self.clear(coord, &mut report)?;
            }
        }
        self.grid.activate_all();
        self.in_flight.reset();

        self.phase = Phase::Resolving;
        let result = self.fall(&mut report).await;
        match self.conclude(result, report)? {
            Resolution::Resolved(report) => Ok(report),
            Resolution::Ignored(_) => Ok(CascadeReport::default()),
        }
    }

    /// Occupant kind of an in-bounds, present and active cell.
    fn target(&self, coord: Coord) -> Result<Option<ElementKind>, GridError> {
        let element = self.grid.get(coord).map_err(|err| {
            log::warn!("rejected tap: {err}");
            err
        })?;
        Ok(element.filter(|e| e.is_active()).map(|e| e.kind()))
    }

    fn begin(&mut self) -> CascadeReport {
        self.phase = Phase::Resolving;
        self.in_flight.reset();
        CascadeReport::default()
    }

    fn conclude(&mut self, result: Result<(), GridError>, mut report: CascadeReport) -> Result<Resolution, GridError> {
        report.peak_in_flight = self.in_flight.peak();
        self.phase = Phase::Idle;
        match result {
            Ok(()) => Ok(Resolution::Resolved(report)),
            Err(err) => {
                log::error!("resolution aborted: {err}");
                self.doomed.clear();
                self.in_flight.reset();
                self.grid.activate_all();
                Err(err)
            }
        }
    }

    async fn resolve_match(
        &mut self,
        matched: &MatchSet,
        cube_count: usize,
        report: &mut CascadeReport,
    ) -> Result<(), GridError> {
        let source = matched.start();
        let special = self.policy.decide(cube_count);

        if special.is_some() {
            let cubes: Vec<Coord> = matched
                .coords()
                .iter()
                .copied()
                .filter(|&c| c != source && self.grid.element(c).map_or(false, |e| e.is_cube()))
                .collect();
            self.converge(source, &cubes, report).await?;
        }

        // Source first, then the rest in discovery order. Converged cubes are
        // already gone; obstacles take their hit here.
        for &coord in matched.coords() {
            self.interact(coord, report)?;
        }

        if let Some(special) = special {
            let kind = special.roll(&mut self.rng);
            // The source is left to gravity when the item cannot be built.
            match self.factory.create(kind, source) {
                Ok(element) => {
                    self.grid.place(source, element)?;
                    log::debug!("{kind} created at {source}");
                    report.push(CascadeEvent::SpecialItemCreated {
                        coord: source,
                        kind,
                        special,
                    });
                }
                Err(err) => log::error!("no special item at {source}: {err}"),
            }
        }

        self.fall(report).await
    }

    async fn resolve_rocket(
        &mut self,
        linked: &MatchSet,
        direction: RocketDirection,
        report: &mut CascadeReport,
    ) -> Result<(), GridError> {
        let source = linked.start();

        let sweeps: Vec<RocketSweep> = if linked.len() > 1 {
            let others: Vec<Coord> = linked.coords().iter().copied().filter(|&c| c != source).collect();
            self.converge(source, &others, report).await?;
            self.clear(source, report)?;

            let lanes = combo_lanes(&self.grid, source);
            log::debug!("rocket combo at {source}: {} lanes", lanes.len());
            lanes
                .into_iter()
                .map(|(origin, direction)| self.fire_virtual(origin, direction, report))
                .collect()
        } else {
            vec![self.fire(source, direction, report)?]
        };

        self.run_sweeps(sweeps, report).await
    }

    async fn resolve_detonation(
        &mut self,
        rockets: &[(Coord, RocketDirection)],
        report: &mut CascadeReport,
    ) -> Result<(), GridError> {
        let mut sweeps = Vec::with_capacity(rockets.len());
        for &(coord, direction) in rockets {
            sweeps.push(self.fire(coord, direction, report)?);
        }
        self.run_sweeps(sweeps, report).await
    }

    /// Fly the elements at `coords` into `target`, then remove them.
    ///
    /// Clears are reported when the flight is scheduled; cells empty on arrival.
    async fn converge(&mut self, target: Coord, coords: &[Coord], report: &mut CascadeReport) -> Result<(), GridError> {
        let to = self.grid.anchor(target)?;
        let mut flights = Vec::with_capacity(coords.len());

        for &from in coords {
            let Some(element) = self.grid.element(from) else {
                continue;
            };
            let (id, kind) = (element.id(), element.kind());
            self.grid.set_active(from, false)?;
            report.push(CascadeEvent::ElementCleared(ClearedElement { id, coord: from, kind }));
            self.doomed.push((from, id));

            let handle = self.animator.play(Transition::Converge { element: id, from, to });
            flights.push((from, id, handle));
        }

        for (from, id, handle) in flights {
            if handle.finished().await == TransitionStatus::Interrupted {
                log::debug!("converge of {id} interrupted");
            }
            self.grid.take(from)?;
            self.doomed.retain(|&(_, doomed)| doomed != id);
        }
        Ok(())
    }

    /// Remove the occupant of `coord` and report it.
    fn clear(&mut self, coord: Coord, report: &mut CascadeReport) -> Result<(), GridError> {
        if let Some(element) = self.grid.take(coord)? {
            report.push(CascadeEvent::ElementCleared(ClearedElement {
                id: element.id(),
                coord,
                kind: element.kind(),
            }));
        }
        Ok(())
    }

    /// Hit whatever is at `coord` once: cubes clear, obstacles lose one hp.
    /// Rockets are left alone.
    fn interact(&mut self, coord: Coord, report: &mut CascadeReport) -> Result<(), GridError> {
        let Some(element) = self.grid.element_mut(coord) else {
            return Ok(());
        };
        if !element.is_active() || element.is_rocket() {
            return Ok(());
        }
        let destroyed = element.take_hit();
        if destroyed {
            self.clear(coord, report)?;
        } else {
            log::debug!("{} at {coord} hit, {} hp left", element.kind(), element.hp());
        }
        Ok(())
    }

    /// Sweep cell reached by a rocket. Rockets in the lane fire in turn.
    fn strike(&mut self, coord: Coord, fired: &mut Vec<RocketSweep>, report: &mut CascadeReport) -> Result<(), GridError> {
        let rocket = match self.grid.element(coord) {
            Some(element) if element.is_active() => match element.kind() {
                ElementKind::Rocket(direction) => Some(direction),
                _ => None,
            },
            _ => return Ok(()),
        };
        match rocket {
            Some(direction) => fired.push(self.fire(coord, direction, report)?),
            None => self.interact(coord, report)?,
        }
        Ok(())
    }

    /// Take the rocket at `coord` off the grid and start its sweep.
    ///
    /// The rocket is gone before its lane is walked, so it can fire only once.
    fn fire(&mut self, coord: Coord, direction: RocketDirection, report: &mut CascadeReport) -> Result<RocketSweep, GridError> {
        let id = self.grid.element(coord).map(|e| e.id());
        self.clear(coord, report)?;
        let handle = self.launch(id, coord, direction, report)?;
        Ok(RocketSweep::new(&self.grid, coord, direction, false).with_launch(handle))
    }

    /// Start a sweep without a rocket element; its origin cell is struck too.
    fn fire_virtual(&mut self, origin: Coord, direction: RocketDirection, report: &mut CascadeReport) -> RocketSweep {
        let handle = match self.launch(None, origin, direction, report) {
            Ok(handle) => handle,
            Err(err) => {
                log::error!("virtual rocket at {origin}: {err}");
                TransitionHandle::ready()
            }
        };
        RocketSweep::new(&self.grid, origin, direction, true).with_launch(handle)
    }

    fn launch(
        &mut self,
        element: Option<ElementId>,
        origin: Coord,
        direction: RocketDirection,
        report: &mut CascadeReport,
    ) -> Result<TransitionHandle, GridError> {
        let anchor = self.grid.anchor(origin)?;
        self.in_flight.begin();
        report.rockets_fired += 1;
        report.push(CascadeEvent::RocketFired { origin, direction });
        log::debug!("{} rocket fired at {origin} ({} in flight)", direction.as_str(), self.in_flight.count());
        Ok(self.animator.play(Transition::RocketLaunch {
            element,
            origin,
            direction,
            anchor,
        }))
    }

    /// Advance all sweeps in lock-step until every lane is exhausted, then
    /// run gravity once.
    ///
    /// Launch transitions are awaited only after the last lane is walked, so a
    /// finished rocket never stalls the sweeps still running.
    async fn run_sweeps(&mut self, mut active: Vec<RocketSweep>, report: &mut CascadeReport) -> Result<(), GridError> {
        let mut exhausted = Vec::new();

        while !active.is_empty() {
            let mut fired = Vec::new();
            for sweep in active.iter_mut() {
                for coord in sweep.advance() {
                    self.strike(coord, &mut fired, report)?;
                }
            }

            let (done, mut live): (Vec<_>, Vec<_>) = active.into_iter().partition(RocketSweep::is_exhausted);
            exhausted.extend(done);
            live.extend(fired);
            active = live;
        }

        let mut drained = false;
        for mut sweep in exhausted {
            if let Some(launch) = sweep.take_launch() {
                if launch.finished().await == TransitionStatus::Interrupted {
                    log::debug!("launch at {} interrupted", sweep.origin());
                }
            }
            if self.in_flight.finish() {
                drained = true;
            }
        }

        if drained {
            self.fall(report).await
        } else {
            log::error!("sweeps ended with {} still in flight", self.in_flight.count());
            Ok(())
        }
    }

    /// Gravity, refill, animation, indicator refresh.
    async fn fall(&mut self, report: &mut CascadeReport) -> Result<(), GridError> {
        let rng = &mut self.rng;
        let factory = &mut self.factory;
        let outcome = apply_gravity(&mut self.grid, |coord| factory.create_random_cube(rng, coord))?;

        let mut landings = Vec::with_capacity(outcome.moves.len() + outcome.spawned.len());
        for mv in &outcome.moves {
            self.grid.set_active(mv.to, false)?;
            let anchor = self.grid.anchor(mv.to)?;
            let handle = self.animator.play(Transition::Fall {
                element: mv.id,
                to: mv.to,
                anchor,
            });
            landings.push((mv.to, handle));
        }
        for spawned in &outcome.spawned {
            self.grid.set_active(spawned.coord, false)?;
            let handle = self.animator.play(Transition::Spawn {
                element: spawned.id,
                to: spawned.coord,
                from: self.grid.spawn_anchor(spawned.coord)?,
                anchor: self.grid.anchor(spawned.coord)?,
            });
            landings.push((spawned.coord, handle));
        }

        for (coord, handle) in landings {
            handle.finished().await;
            self.grid.set_active(coord, true)?;
        }

        refresh_indicators(&mut self.grid, &self.policy);
        report.gravity_runs += 1;
        report.push(CascadeEvent::FallCompleted);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transition::{InstantAnimator, RecordingAnimator};
    use crate::types::CubeColor;

    fn engine_from_rows<A: Animator>(rows: &[&str], animator: A) -> CascadeEngine<A> {
        let height = rows.len();
        let width = rows[0].split_whitespace().count();
        let mut codes = Vec::with_capacity(width * height);
        for row in rows.iter().rev() {
            codes.extend(row.split_whitespace().map(str::to_string));
        }
        let level = LevelData::new(1, width, height, 10, codes).unwrap();
        CascadeEngine::from_level(&level, &EngineConfig::default(), animator).unwrap()
    }

    #[tokio::test]
    async fn pair_clears_and_refills() {
        let mut engine = engine_from_rows(&["b g", "r r"], InstantAnimator);
        let resolution = engine.tap(Coord::new(0, 0)).await.unwrap();
        let report = resolution.report().unwrap();

        assert_eq!(report.cleared().count(), 2);
        assert_eq!(report.gravity_runs, 1);
        assert!(report.fall_completed());
        assert_eq!(engine.phase(), Phase::Idle);
        assert!(engine.grid().is_gravity_settled());
        assert_eq!(engine.grid().elements().count(), 4);
    }

    #[tokio::test]
    async fn lone_cube_is_ignored() {
        let mut engine = engine_from_rows(&["r g"], InstantAnimator);
        let resolution = engine.tap(Coord::new(0, 0)).await.unwrap();
        assert_eq!(resolution.ignored(), Some(IgnoreReason::TooFewCubes));
    }

    #[tokio::test]
    async fn out_of_bounds_is_an_error() {
        let mut engine = engine_from_rows(&["r r"], InstantAnimator);
        let err = engine.tap(Coord::new(2, 0)).await.unwrap_err();
        assert!(matches!(err, GridError::InvalidCoordinate { .. }));
        assert_eq!(engine.phase(), Phase::Idle);
    }

    #[tokio::test]
    async fn converging_cubes_are_animated() {
        let mut engine = engine_from_rows(&["r r", "r r"], RecordingAnimator::new());
        engine.tap(Coord::new(0, 0)).await.unwrap();

        let converged = engine
            .animator()
            .count(|t| matches!(t, Transition::Converge { .. }));
        assert_eq!(converged, 3);
        assert!(engine.grid().element(Coord::new(0, 0)).unwrap().is_rocket());
    }

    #[tokio::test]
    async fn rocket_sweep_counter_returns_to_zero() {
        let mut engine = engine_from_rows(&["r g hro b y"], InstantAnimator);
        let report = engine.tap(Coord::new(2, 0)).await.unwrap().into_report().unwrap();

        assert_eq!(report.cleared().count(), 5);
        assert_eq!(report.rockets_fired, 1);
        assert_eq!(engine.in_flight(), 0);
        assert_eq!(report.gravity_runs, 1);
    }

    #[tokio::test]
    async fn special_item_placed_at_source() {
        let mut engine = engine_from_rows(&["g r r r r"], InstantAnimator);
        let report = engine.tap(Coord::new(2, 0)).await.unwrap().into_report().unwrap();
        assert_eq!(report.specials_created(), 1);
        assert!(engine.grid().element(Coord::new(2, 0)).unwrap().is_rocket());
        assert_eq!(
            engine.grid().element(Coord::new(0, 0)).unwrap().kind(),
            ElementKind::Cube(CubeColor::Green)
        );
    }
}
