//! `Viewport` bundles everything the renderer needs to decide what is
//! visible and how a unit relates to the viewing player (spec §4.3.5).

use crate::map::ship::PlayerId;
use crate::map::universe::Universe;
use crate::render::listener::Relation;
use geo::Point;
use std::collections::HashSet;

/// Viewport option bits. Names follow the source's `ShowXxx` toggles.
pub mod options {
    pub const SHOW_GRID: u32 = 1 << 0;
    pub const SHOW_MINEFIELDS: u32 = 1 << 1;
    pub const SHOW_UFOS: u32 = 1 << 2;
    pub const SHOW_ION_STORMS: u32 = 1 << 3;
    pub const SHOW_DRAWINGS: u32 = 1 << 4;
    /// When set, ships are drawn as plain dots (cheap, emitted during the
    /// ship-extras pass) instead of full labeled icons in the ships pass.
    pub const SHOW_SHIP_DOTS: u32 = 1 << 5;
    pub const SHOW_WARP_WELLS: u32 = 1 << 6;
    pub const SHOW_TRAILS: u32 = 1 << 7;
    pub const SHOW_VECTORS: u32 = 1 << 8;
    pub const SHOW_SELECTION: u32 = 1 << 9;
    pub const SHOW_MESSAGES: u32 = 1 << 10;
    /// Round gravity wells (octant circle trace) vs. square wells.
    pub const ROUND_GRAVITY_WELLS: u32 = 1 << 11;
}

/// All the host/config knobs the renderer needs but which aren't
/// `Universe` state: gravity well range, and the team relationship set
/// used to color every drawn unit.
#[derive(Debug, Clone)]
pub struct Viewport<'a> {
    pub universe: &'a Universe,
    pub options: u32,
    pub zoom: f64,
    pub own_player: PlayerId,
    pub allies: HashSet<PlayerId>,
    pub warp_well_range: u16,
    pub turn_number: u32,
    pub visible_min: Point,
    pub visible_max: Point,
}

impl<'a> Viewport<'a> {
    pub fn new(universe: &'a Universe, own_player: PlayerId, visible_min: Point, visible_max: Point) -> Self {
        Self {
            universe,
            options: options::SHOW_GRID
                | options::SHOW_MINEFIELDS
                | options::SHOW_UFOS
                | options::SHOW_ION_STORMS
                | options::SHOW_DRAWINGS
                | options::SHOW_WARP_WELLS
                | options::SHOW_TRAILS
                | options::SHOW_VECTORS
                | options::SHOW_SELECTION
                | options::SHOW_MESSAGES,
            zoom: 1.0,
            own_player,
            allies: HashSet::new(),
            warp_well_range: 3,
            turn_number: 0,
            visible_min,
            visible_max,
        }
    }

    pub fn has(&self, flag: u32) -> bool {
        self.options & flag != 0
    }

    pub fn relation_of(&self, owner: Option<PlayerId>) -> Relation {
        match owner {
            None => Relation::Unowned,
            Some(0) => Relation::Unowned,
            Some(p) if p == self.own_player => Relation::Own,
            Some(p) if self.allies.contains(&p) => Relation::Allied,
            Some(_) => Relation::Enemy,
        }
    }

    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.visible_min.x && p.x <= self.visible_max.x && p.y >= self.visible_min.y && p.y <= self.visible_max.y
    }

    pub fn contains_line(&self, a: Point, b: Point) -> bool {
        self.contains_point(a) || self.contains_point(b) || self.segment_crosses_box(a, b)
    }

    fn segment_crosses_box(&self, a: Point, b: Point) -> bool {
        let (lo_x, hi_x) = (a.x.min(b.x), a.x.max(b.x));
        let (lo_y, hi_y) = (a.y.min(b.y), a.y.max(b.y));
        lo_x <= self.visible_max.x && hi_x >= self.visible_min.x && lo_y <= self.visible_max.y && hi_y >= self.visible_min.y
    }

    pub fn contains_circle(&self, center: Point, radius: i32) -> bool {
        center.x + radius >= self.visible_min.x
            && center.x - radius <= self.visible_max.x
            && center.y + radius >= self.visible_min.y
            && center.y - radius <= self.visible_max.y
    }

    pub fn contains_rectangle(&self, a: Point, b: Point) -> bool {
        self.segment_crosses_box(a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{MapConfiguration, MapMode};

    fn universe() -> Universe {
        Universe::new(MapConfiguration::new(MapMode::Flat, Point::new(0, 0), (2000, 2000)))
    }

    #[test]
    fn relation_distinguishes_own_allied_enemy_unowned() {
        let univ = universe();
        let mut vp = Viewport::new(&univ, 3, Point::new(0, 0), Point::new(100, 100));
        vp.allies.insert(7);
        assert_eq!(vp.relation_of(Some(3)), Relation::Own);
        assert_eq!(vp.relation_of(Some(7)), Relation::Allied);
        assert_eq!(vp.relation_of(Some(9)), Relation::Enemy);
        assert_eq!(vp.relation_of(None), Relation::Unowned);
        assert_eq!(vp.relation_of(Some(0)), Relation::Unowned);
    }

    #[test]
    fn contains_circle_accounts_for_radius_overlap() {
        let univ = universe();
        let vp = Viewport::new(&univ, 1, Point::new(0, 0), Point::new(10, 10));
        assert!(vp.contains_circle(Point::new(15, 5), 10));
        assert!(!vp.contains_circle(Point::new(50, 50), 5));
    }

    #[test]
    fn contains_line_detects_a_segment_crossing_the_box_with_both_endpoints_outside() {
        let univ = universe();
        let vp = Viewport::new(&univ, 1, Point::new(0, 0), Point::new(10, 10));
        assert!(vp.contains_line(Point::new(-5, 5), Point::new(15, 5)));
        assert!(!vp.contains_line(Point::new(500, 500), Point::new(600, 600)));
    }
}
