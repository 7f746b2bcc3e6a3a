//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (grid logic, cascade engine, level loading, rendering).
//!
//! # Coordinates
//!
//! Cells are addressed by [`Coord`] `(x, y)`:
//!
//! - **x** grows to the right, `0..width`
//! - **y** grows upward, `0..height` (row 0 is the floor)
//!
//! # Grid Elements
//!
//! Every occupied cell holds exactly one [`ElementKind`]:
//!
//! | Kind | Level code | Falls | Initial hp |
//! |------|------------|-------|------------|
//! | Red / Green / Blue / Yellow cube | `r` `g` `b` `y` | yes | 1 |
//! | Horizontal / Vertical rocket | `hro` `vro` | yes | 1 |
//! | Box | `bo` | yes | 1 |
//! | Stone | `s` | no | 1 |
//! | Vase | `v` | yes | 2 |
//!
//! The level code `rand` stands for a random cube chosen at load time.
//!
//! # Tuning Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `MIN_MATCH_CUBES` | 2 | Smallest actionable cube group |
//! | `ROCKET_MATCH_THRESHOLD` | 4 | Cube count that synthesizes a rocket |
//! | `CELL_SIZE` | 1.42 | World-space distance between cell anchors |
//! | `SPAWN_HEIGHT_OFFSET` | 10.0 | Refill spawn height above the target anchor |
//!
//! # Examples
//!
//! ```
//! use cube_blast_types::{Coord, CubeColor, ElementKind, LevelCell, ObstacleKind};
//!
//! // Parse level codes
//! assert_eq!(LevelCell::from_code("r"), Some(LevelCell::Fixed(ElementKind::Cube(CubeColor::Red))));
//! assert_eq!(LevelCell::from_code("rand"), Some(LevelCell::Random));
//! assert_eq!(LevelCell::from_code("??"), None);
//!
//! // Stones are the only element that never falls
//! assert!(!ElementKind::Obstacle(ObstacleKind::Stone).can_fall());
//! assert!(ElementKind::Obstacle(ObstacleKind::Vase).can_fall());
//!
//! // Neighbours are visited Up, Right, Down, Left
//! let c = Coord::new(2, 2);
//! assert_eq!(c.neighbors()[0], Coord::new(2, 3));
//! ```

use std::fmt;

/// Smallest number of cubes a player match must contain to be actionable.
pub const MIN_MATCH_CUBES: usize = 2;

/// Matched cube count at which a rocket is synthesized.
pub const ROCKET_MATCH_THRESHOLD: usize = 4;

/// Distance between two neighbouring cell anchors in world units.
pub const CELL_SIZE: f32 = 1.42;

/// Height above the target anchor where refilled cubes are spawned.
pub const SPAWN_HEIGHT_OFFSET: f32 = 10.0;

/// Grid coordinate. `y` increases upward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    /// Orthogonal step offsets in visiting order: Up, Right, Down, Left.
    pub const DIRECTIONS: [(i32, i32); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Offset this coordinate by `(dx, dy)`.
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// The four orthogonal neighbours (Up, Right, Down, Left), unchecked against any bounds.
    pub fn neighbors(self) -> [Coord; 4] {
        Self::DIRECTIONS.map(|(dx, dy)| self.offset(dx, dy))
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// World-space anchor position of a cell (where its element rests).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Anchor {
    pub x: f32,
    pub y: f32,
}

impl Anchor {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Same anchor raised by `dy` world units.
    pub fn raised(self, dy: f32) -> Self {
        Self {
            x: self.x,
            y: self.y + dy,
        }
    }
}

/// The four cube colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CubeColor {
    Red,
    Green,
    Blue,
    Yellow,
}

impl CubeColor {
    pub const ALL: [CubeColor; 4] = [
        CubeColor::Red,
        CubeColor::Green,
        CubeColor::Blue,
        CubeColor::Yellow,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CubeColor::Red => "Red",
            CubeColor::Green => "Green",
            CubeColor::Blue => "Blue",
            CubeColor::Yellow => "Yellow",
        }
    }
}

/// Sweep axis of a rocket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RocketDirection {
    /// Clears the rocket's whole row
    Horizontal,
    /// Clears the rocket's whole column
    Vertical,
}

impl RocketDirection {
    pub const ALL: [RocketDirection; 2] = [RocketDirection::Horizontal, RocketDirection::Vertical];

    /// Unit step along the sweep axis (the opposite ray uses the negated step).
    pub fn step(&self) -> (i32, i32) {
        match self {
            RocketDirection::Horizontal => (1, 0),
            RocketDirection::Vertical => (0, 1),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RocketDirection::Horizontal => "Horizontal",
            RocketDirection::Vertical => "Vertical",
        }
    }
}

/// Obstacle kinds.
///
/// - **Box**: one hit, falls, broken by adjacent matches
/// - **Stone**: one hit, never falls, never matched (only rockets reach it)
/// - **Vase**: two hits, falls, broken by adjacent matches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ObstacleKind {
    Box,
    Stone,
    Vase,
}

impl ObstacleKind {
    pub const ALL: [ObstacleKind; 3] = [ObstacleKind::Box, ObstacleKind::Stone, ObstacleKind::Vase];

    pub fn initial_hp(&self) -> u8 {
        match self {
            ObstacleKind::Box | ObstacleKind::Stone => 1,
            ObstacleKind::Vase => 2,
        }
    }

    pub fn can_fall(&self) -> bool {
        !matches!(self, ObstacleKind::Stone)
    }

    /// Whether an adjacent cube match damages this obstacle.
    pub fn is_matchable(&self) -> bool {
        matches!(self, ObstacleKind::Box | ObstacleKind::Vase)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ObstacleKind::Box => "Box",
            ObstacleKind::Stone => "Stone",
            ObstacleKind::Vase => "Vase",
        }
    }
}

/// Variant data of one grid element.
///
/// This is the identity-free part of an element: two elements with the same
/// `ElementKind` share icons and goal bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementKind {
    Cube(CubeColor),
    Rocket(RocketDirection),
    Obstacle(ObstacleKind),
}

impl ElementKind {
    pub fn is_cube(&self) -> bool {
        matches!(self, ElementKind::Cube(_))
    }

    pub fn is_rocket(&self) -> bool {
        matches!(self, ElementKind::Rocket(_))
    }

    pub fn is_obstacle(&self) -> bool {
        matches!(self, ElementKind::Obstacle(_))
    }

    /// Special elements are the ones that fire on their own when activated.
    pub fn is_special(&self) -> bool {
        self.is_rocket()
    }

    pub fn can_fall(&self) -> bool {
        match self {
            ElementKind::Cube(_) | ElementKind::Rocket(_) => true,
            ElementKind::Obstacle(kind) => kind.can_fall(),
        }
    }

    pub fn initial_hp(&self) -> u8 {
        match self {
            ElementKind::Cube(_) | ElementKind::Rocket(_) => 1,
            ElementKind::Obstacle(kind) => kind.initial_hp(),
        }
    }

    /// Parse a level code. `rand` is not an element; see [`LevelCell::from_code`].
    ///
    /// # Examples
    ///
    /// ```
    /// use cube_blast_types::{ElementKind, RocketDirection};
    ///
    /// assert_eq!(ElementKind::from_code("vro"), Some(ElementKind::Rocket(RocketDirection::Vertical)));
    /// assert_eq!(ElementKind::from_code("rand"), None);
    /// ```
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "r" => Some(ElementKind::Cube(CubeColor::Red)),
            "g" => Some(ElementKind::Cube(CubeColor::Green)),
            "b" => Some(ElementKind::Cube(CubeColor::Blue)),
            "y" => Some(ElementKind::Cube(CubeColor::Yellow)),
            "hro" => Some(ElementKind::Rocket(RocketDirection::Horizontal)),
            "vro" => Some(ElementKind::Rocket(RocketDirection::Vertical)),
            "bo" => Some(ElementKind::Obstacle(ObstacleKind::Box)),
            "s" => Some(ElementKind::Obstacle(ObstacleKind::Stone)),
            "v" => Some(ElementKind::Obstacle(ObstacleKind::Vase)),
            _ => None,
        }
    }

    /// Level code of this element
    pub fn code(&self) -> &'static str {
        match self {
            ElementKind::Cube(CubeColor::Red) => "r",
            ElementKind::Cube(CubeColor::Green) => "g",
            ElementKind::Cube(CubeColor::Blue) => "b",
            ElementKind::Cube(CubeColor::Yellow) => "y",
            ElementKind::Rocket(RocketDirection::Horizontal) => "hro",
            ElementKind::Rocket(RocketDirection::Vertical) => "vro",
            ElementKind::Obstacle(ObstacleKind::Box) => "bo",
            ElementKind::Obstacle(ObstacleKind::Stone) => "s",
            ElementKind::Obstacle(ObstacleKind::Vase) => "v",
        }
    }

    /// Asset name used by the element factory (`RedCube`, `VerticalRocket`, `Stone`, ...).
    pub fn asset_name(&self) -> String {
        match self {
            ElementKind::Cube(color) => format!("{}Cube", color.as_str()),
            ElementKind::Rocket(direction) => format!("{}Rocket", direction.as_str()),
            ElementKind::Obstacle(kind) => kind.as_str().to_string(),
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.asset_name())
    }
}

/// One cell of authored level content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LevelCell {
    Fixed(ElementKind),
    /// A cube of random colour, rolled when the grid is built
    Random,
}

impl LevelCell {
    pub const RANDOM_CODE: &'static str = "rand";

    pub fn from_code(code: &str) -> Option<Self> {
        if code == Self::RANDOM_CODE {
            return Some(LevelCell::Random);
        }
        ElementKind::from_code(code).map(LevelCell::Fixed)
    }

    pub fn code(&self) -> &'static str {
        match self {
            LevelCell::Fixed(kind) => kind.code(),
            LevelCell::Random => Self::RANDOM_CODE,
        }
    }
}

/// Special items the policy can synthesize from a large match.
///
/// Only rockets exist today; bombs and disco balls would slot in here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialItemKind {
    Rocket,
}
