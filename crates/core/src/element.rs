//! Grid element instances
//!
//! A [`GridElement`] is one live occupant of a cell: an [`ElementKind`] plus the
//! per-instance state that changes during play (hp, coordinate, active flag,
//! potential-special-item indicator). The kind itself never changes.

use std::fmt;

use crate::types::{Coord, ElementKind, SpecialItemKind};

/// Unique id of an element instance. Never reused within a factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u32);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridElement {
    id: ElementId,
    kind: ElementKind,
    hp: u8,
    coord: Coord,
    active: bool,
    /// Set on cubes that belong to a group large enough to become a special item.
    indicator: Option<SpecialItemKind>,
}

impl GridElement {
    pub fn new(id: ElementId, kind: ElementKind, coord: Coord) -> Self {
        Self {
            id,
            kind,
            hp: kind.initial_hp(),
            coord,
            active: true,
            indicator: None,
        }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn hp(&self) -> u8 {
        self.hp
    }

    pub fn coord(&self) -> Coord {
        self.coord
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn indicator(&self) -> Option<SpecialItemKind> {
        self.indicator
    }

    pub fn is_cube(&self) -> bool {
        self.kind.is_cube()
    }

    pub fn is_rocket(&self) -> bool {
        self.kind.is_rocket()
    }

    pub fn can_fall(&self) -> bool {
        self.kind.can_fall()
    }

    /// Player-match adjacency: may `other` be cleared together with `self`?
    ///
    /// Cubes reach same-colour cubes and matchable obstacles. Obstacles and
    /// rockets reach nothing, which makes obstacles terminal in a match.
    pub fn can_match_with(&self, other: &GridElement) -> bool {
        match (self.kind, other.kind) {
            (ElementKind::Cube(a), ElementKind::Cube(b)) => a == b,
            (ElementKind::Cube(_), ElementKind::Obstacle(kind)) => kind.is_matchable(),
            _ => false,
        }
    }

    /// Same-kind adjacency: identical cube colours only.
    pub fn is_same_with(&self, other: &GridElement) -> bool {
        self.is_cube() && self.kind == other.kind
    }

    /// Absorb one hit. Returns true when the element is destroyed.
    pub fn take_hit(&mut self) -> bool {
        self.hp = self.hp.saturating_sub(1);
        self.hp == 0
    }

    pub(crate) fn set_coord(&mut self, coord: Coord) {
        self.coord = coord;
    }

    pub(crate) fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub(crate) fn set_indicator(&mut self, indicator: Option<SpecialItemKind>) {
        self.indicator = indicator;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CubeColor, ObstacleKind, RocketDirection};

    fn element(kind: ElementKind) -> GridElement {
        GridElement::new(ElementId(0), kind, Coord::new(0, 0))
    }

    #[test]
    fn cubes_match_same_color_and_matchable_obstacles() {
        let red = element(ElementKind::Cube(CubeColor::Red));
        let red2 = element(ElementKind::Cube(CubeColor::Red));
        let blue = element(ElementKind::Cube(CubeColor::Blue));
        let vase = element(ElementKind::Obstacle(ObstacleKind::Vase));
        let stone = element(ElementKind::Obstacle(ObstacleKind::Stone));
        let rocket = element(ElementKind::Rocket(RocketDirection::Vertical));

        assert!(red.can_match_with(&red2));
        assert!(!red.can_match_with(&blue));
        assert!(red.can_match_with(&vase));
        assert!(!red.can_match_with(&stone));
        assert!(!red.can_match_with(&rocket));
        // Obstacles never propagate
        assert!(!vase.can_match_with(&red));
    }

    #[test]
    fn vase_survives_first_hit() {
        let mut vase = element(ElementKind::Obstacle(ObstacleKind::Vase));
        assert!(!vase.take_hit());
        assert_eq!(vase.hp(), 1);
        assert!(vase.take_hit());
    }
}
