//! Player matches: clearing, special items, obstacles.

mod common;

use common::{assert_settled, engine, engine_with, kind_at, level_from_rows};
use cube_blast::core::{AssetCatalog, AssetId, ElementFactory, GridState, SimpleRng, SpecialItemPolicy};
use cube_blast::engine::{
    CascadeEngine, CascadeEvent, EngineConfig, IgnoreReason, InstantAnimator, Phase, RecordingAnimator, Transition,
};
use cube_blast::types::{Anchor, Coord, CubeColor, ElementKind, ObstacleKind, SpecialItemKind};

const RED: ElementKind = ElementKind::Cube(CubeColor::Red);
const BLUE: ElementKind = ElementKind::Cube(CubeColor::Blue);

#[tokio::test]
async fn test_red_field_builds_rocket_at_source() {
    let mut engine = engine(
        &["r r r b", "r r r r", "r r r r", "r r r r"],
        RecordingAnimator::new(),
    );
    let blue = engine.grid().element(Coord::new(3, 3)).unwrap().id();

    let report = engine.tap(Coord::new(0, 0)).await.unwrap().into_report().unwrap();

    assert_eq!(report.cleared().count(), 15);
    assert!(report.cleared().all(|c| c.kind == RED));
    assert_eq!(report.specials_created(), 1);
    assert!(report.events.contains(&CascadeEvent::SpecialItemCreated {
        coord: Coord::new(0, 0),
        kind: kind_at(engine.grid(), 0, 0).unwrap(),
        special: SpecialItemKind::Rocket,
    }));
    assert!(kind_at(engine.grid(), 0, 0).unwrap().is_rocket());

    // The blue cube survives and drops to the floor of its column.
    let fallen = engine.grid().element(Coord::new(3, 0)).unwrap();
    assert_eq!(fallen.id(), blue);
    assert_eq!(fallen.kind(), BLUE);

    let converged = engine.animator().count(|t| matches!(t, Transition::Converge { .. }));
    assert_eq!(converged, 14);
    assert_settled(engine.grid());
}

#[tokio::test]
async fn test_single_cube_never_clears() {
    let mut engine = engine(&["g r g", "b y b"], InstantAnimator);
    let before = engine.grid().snapshot();

    let resolution = engine.tap(Coord::new(1, 1)).await.unwrap();

    assert_eq!(resolution.ignored(), Some(IgnoreReason::TooFewCubes));
    assert_eq!(engine.grid().snapshot(), before);
    assert_eq!(engine.phase(), Phase::Idle);
}

#[tokio::test]
async fn test_small_matches_create_no_special_item() {
    for rows in [["r r g b y"], ["r r r g b"]] {
        let mut engine = engine(&rows, InstantAnimator);
        let report = engine.tap(Coord::new(0, 0)).await.unwrap().into_report().unwrap();
        assert_eq!(report.specials_created(), 0);
        assert!(engine.grid().elements().all(|e| !e.is_rocket()));
        assert_settled(engine.grid());
    }
}

#[tokio::test]
async fn test_threshold_is_configurable() {
    let rows = ["r r r r g"];

    let mut four = engine(&rows, InstantAnimator);
    let report = four.tap(Coord::new(0, 0)).await.unwrap().into_report().unwrap();
    assert_eq!(report.specials_created(), 1);

    let config = EngineConfig::default().with_rocket_threshold(5);
    let mut five = engine_with(&rows, config, InstantAnimator);
    let report = five.tap(Coord::new(0, 0)).await.unwrap().into_report().unwrap();
    assert_eq!(report.specials_created(), 0);
    assert_eq!(report.cleared().count(), 4);
}

#[tokio::test]
async fn test_indicators_follow_policy() {
    let engine = engine(&["r r r r b b"], InstantAnimator);
    let grid = engine.grid();
    assert_eq!(
        grid.element(Coord::new(0, 0)).unwrap().indicator(),
        Some(SpecialItemKind::Rocket)
    );
    assert_eq!(grid.element(Coord::new(4, 0)).unwrap().indicator(), None);
}

#[tokio::test]
async fn test_tapping_stone_is_noop() {
    let mut engine = engine(&["r s r", "g g b"], InstantAnimator);
    let before = engine.grid().snapshot();

    let resolution = engine.tap(Coord::new(1, 1)).await.unwrap();

    assert_eq!(resolution.ignored(), Some(IgnoreReason::NotInteractive));
    assert_eq!(engine.grid().snapshot(), before);
}

#[tokio::test]
async fn test_match_never_touches_stone() {
    let mut engine = engine(&["r r s"], InstantAnimator);
    let report = engine.tap(Coord::new(0, 0)).await.unwrap().into_report().unwrap();

    assert_eq!(report.cleared().count(), 2);
    assert_eq!(
        kind_at(engine.grid(), 2, 0),
        Some(ElementKind::Obstacle(ObstacleKind::Stone))
    );
}

#[tokio::test]
async fn test_box_breaks_and_stops_propagation() {
    let mut engine = engine(&["r r bo r"], InstantAnimator);
    let far_red = engine.grid().element(Coord::new(3, 0)).unwrap().id();

    let report = engine.tap(Coord::new(0, 0)).await.unwrap().into_report().unwrap();

    assert_eq!(report.cleared_obstacles(ObstacleKind::Box), 1);
    assert_eq!(report.cleared().count(), 3);
    assert_eq!(engine.grid().element(Coord::new(3, 0)).unwrap().id(), far_red);
}

#[tokio::test]
async fn test_vase_takes_two_hits() {
    let mut engine = engine(&["r r v g g"], InstantAnimator);
    let vase = Coord::new(2, 0);

    let first = engine.tap(Coord::new(0, 0)).await.unwrap().into_report().unwrap();
    assert_eq!(first.cleared_obstacles(ObstacleKind::Vase), 0);
    assert_eq!(engine.grid().element(vase).unwrap().hp(), 1);

    let second = engine.tap(Coord::new(3, 0)).await.unwrap().into_report().unwrap();
    assert_eq!(second.cleared_obstacles(ObstacleKind::Vase), 1);
    assert!(!engine.grid().element(vase).unwrap().kind().is_obstacle());
}

#[tokio::test]
async fn test_rockets_survive_ordinary_matches() {
    let mut engine = engine(&["r r hro"], InstantAnimator);
    let report = engine.tap(Coord::new(0, 0)).await.unwrap().into_report().unwrap();

    assert_eq!(report.rockets_fired, 0);
    assert!(kind_at(engine.grid(), 2, 0).unwrap().is_rocket());
}

#[tokio::test]
async fn test_empty_and_out_of_bounds_targets() {
    let mut engine = engine(&["r r"], InstantAnimator);

    let err = engine.tap(Coord::new(-1, 0)).await.unwrap_err();
    assert_eq!(err.code(), "invalid_coordinate");

    let err = engine.perform_matching(Coord::new(0, 5)).await.unwrap_err();
    assert_eq!(err.code(), "invalid_coordinate");
    assert_eq!(engine.phase(), Phase::Idle);
}

#[tokio::test]
async fn test_event_order_of_a_move() {
    let mut engine = engine(&["b b", "r r"], InstantAnimator);
    let report = engine.tap(Coord::new(0, 0)).await.unwrap().into_report().unwrap();

    assert_eq!(report.events.first(), Some(&CascadeEvent::MovePerformed));
    assert!(report.fall_completed());
    assert_eq!(report.moves_consumed(), 1);
    assert_eq!(report.gravity_runs, 1);
    assert_eq!(report.cleared_coords(), vec![Coord::new(0, 0), Coord::new(1, 0)]);
}

#[tokio::test]
async fn test_gravity_settles_after_every_tap() {
    for seed in 1..=12u32 {
        let rows = [
            "rand rand rand rand rand rand",
            "rand rand s rand rand rand",
            "rand bo rand rand v rand",
            "rand rand rand s rand rand",
            "rand rand rand rand rand rand",
        ];
        let config = EngineConfig::default().with_seed(seed);
        let mut engine = engine_with(&rows, config, InstantAnimator);

        for round in 0..3 {
            for x in 0..6 {
                for y in 0..5 {
                    let resolution = engine.tap(Coord::new(x, y)).await.unwrap();
                    if let Some(report) = resolution.report() {
                        assert!(report.fall_completed(), "seed {seed} round {round}");
                        assert_eq!(report.gravity_runs, 1);
                    }
                    assert_settled(engine.grid());
                    assert_eq!(engine.in_flight(), 0);
                    assert_eq!(engine.phase(), Phase::Idle);
                }
            }
        }
    }
}

/// Catalog without any rocket assets.
struct NoRockets;

impl AssetCatalog for NoRockets {
    fn lookup(&self, kind: ElementKind) -> Option<AssetId> {
        if kind.is_rocket() {
            None
        } else {
            Some(AssetId(kind.asset_name()))
        }
    }
}

#[tokio::test]
async fn test_missing_special_asset_still_settles() {
    let level = level_from_rows(&["g b y g", "r r r r"], 10);
    let mut factory = ElementFactory::new(NoRockets);
    let mut rng = SimpleRng::new(1);
    let grid = GridState::from_level(&level, Anchor::default(), &mut factory, &mut rng).unwrap();
    let mut engine = CascadeEngine::new(grid, factory, rng, InstantAnimator, SpecialItemPolicy::new(4));

    let report = engine.tap(Coord::new(0, 0)).await.unwrap().into_report().unwrap();

    assert_eq!(report.moves_consumed(), 1);
    assert_eq!(report.cleared().count(), 4);
    assert_eq!(report.specials_created(), 0);
    assert!(report.fall_completed());
    assert_eq!(engine.phase(), Phase::Idle);
    assert!(engine.grid().elements().all(|e| !e.is_rocket()));
    // The top row fell onto the floor.
    assert_eq!(kind_at(engine.grid(), 1, 0), Some(ElementKind::Cube(CubeColor::Blue)));
    assert_settled(engine.grid());
}
