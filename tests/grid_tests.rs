//! Grid tests - occupancy, match finding and gravity through the facade

use cube_blast::core::{
    apply_gravity, find_matches, player_match, same_kind, ElementFactory, GridError, GridState, SimpleRng,
};
use cube_blast::types::{Coord, CubeColor, ElementKind, ObstacleKind};

const RED: ElementKind = ElementKind::Cube(CubeColor::Red);
const GREEN: ElementKind = ElementKind::Cube(CubeColor::Green);
const BOX: ElementKind = ElementKind::Obstacle(ObstacleKind::Box);
const STONE: ElementKind = ElementKind::Obstacle(ObstacleKind::Stone);

/// Grid from columns of optional kinds, bottom first.
fn grid_of(columns: &[&[Option<ElementKind>]]) -> (GridState, ElementFactory) {
    let mut grid = GridState::new(columns.len(), columns[0].len()).unwrap();
    let mut factory = ElementFactory::builtin();
    for (x, column) in columns.iter().enumerate() {
        for (y, cell) in column.iter().enumerate() {
            if let Some(kind) = cell {
                let coord = Coord::new(x as i32, y as i32);
                grid.place(coord, factory.create(*kind, coord).unwrap()).unwrap();
            }
        }
    }
    (grid, factory)
}

#[test]
fn test_grid_rejects_out_of_bounds() {
    let (grid, _) = grid_of(&[&[Some(RED)]]);
    for coord in [Coord::new(-1, 0), Coord::new(0, -1), Coord::new(1, 0), Coord::new(0, 1)] {
        assert!(matches!(grid.get(coord), Err(GridError::InvalidCoordinate { .. })));
    }
    assert!(matches!(
        find_matches(&grid, Coord::new(3, 3), player_match),
        Err(GridError::InvalidCoordinate { .. })
    ));
}

#[test]
fn test_place_on_occupied_cell_fails() {
    let (mut grid, mut factory) = grid_of(&[&[Some(RED)]]);
    let extra = factory.create(GREEN, Coord::new(0, 0)).unwrap();
    assert!(matches!(
        grid.place(Coord::new(0, 0), extra),
        Err(GridError::CellOccupied(_))
    ));
}

#[test]
fn test_player_match_includes_adjacent_boxes_only() {
    // x=0: red, red   x=1: box, red   x=2: stone, green
    let (grid, _) = grid_of(&[
        &[Some(RED), Some(RED)],
        &[Some(BOX), Some(RED)],
        &[Some(STONE), Some(GREEN)],
    ]);

    let set = find_matches(&grid, Coord::new(0, 0), player_match).unwrap();
    assert_eq!(set.len(), 4);
    assert_eq!(set.start(), Coord::new(0, 0));
    assert!(set.contains(Coord::new(1, 0)));
    assert!(!set.contains(Coord::new(2, 0)));
    assert_eq!(set.cube_count(&grid), 3);

    let same = find_matches(&grid, Coord::new(0, 0), same_kind).unwrap();
    assert_eq!(same.len(), 3);
}

#[test]
fn test_stone_blocks_the_column() {
    let (mut grid, mut factory) = grid_of(&[&[Some(GREEN), Some(GREEN), None, Some(GREEN), Some(STONE)]]);
    let mut rng = SimpleRng::new(3);

    let outcome = apply_gravity(&mut grid, |c| factory.create_random_cube(&mut rng, c)).unwrap();

    let kinds: Vec<_> = (0..5).map(|y| grid.element(Coord::new(0, y)).map(|e| e.kind())).collect();
    assert_eq!(kinds, vec![Some(GREEN), Some(GREEN), Some(GREEN), None, Some(STONE)]);
    assert!(outcome.spawned.is_empty());
    assert!(grid.is_gravity_settled());
}

#[test]
fn test_gravity_refills_every_open_column() {
    let (mut grid, mut factory) = grid_of(&[
        &[None, Some(RED), None],
        &[Some(BOX), None, None],
        &[None, None, None],
    ]);
    let mut rng = SimpleRng::new(8);

    let outcome = apply_gravity(&mut grid, |c| factory.create_random_cube(&mut rng, c)).unwrap();

    assert_eq!(outcome.moves.len(), 1);
    assert_eq!(outcome.spawned.len(), 7);
    assert_eq!(grid.elements().count(), 9);
    assert_eq!(grid.element(Coord::new(1, 0)).unwrap().kind(), BOX);
    assert!(grid.is_consistent());
    assert!(grid.is_gravity_settled());
}
