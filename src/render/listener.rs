//! The renderer's output sink (spec §6.1): an opaque listener that
//! receives semantic draw events. Any UI backend implements this trait;
//! the renderer itself never touches pixels.

use crate::map::planet::PlanetId;
use crate::map::ship::ShipId;
use crate::map::ufo::UfoId;
use geo::Point;

/// How a unit relates to the viewing player (`TeamSettings::Relation` in
/// the source).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Own,
    Allied,
    Enemy,
    Unowned,
}

/// Bitflags for `drawShip`'s `flags` parameter.
pub mod ship_flags {
    pub const SHOW_ICON: u32 = 1 << 0;
    pub const SHOW_DOT: u32 = 1 << 1;
    pub const FLEET_LEADER: u32 = 1 << 2;
    pub const AT_PLANET: u32 = 1 << 3;
}

/// Bitflags for `drawPlanet`'s `flags` parameter.
pub mod planet_flags {
    pub const UNOWNED: u32 = 1 << 0;
    pub const OWN_PLANET: u32 = 1 << 1;
    pub const ALLIED_PLANET: u32 = 1 << 2;
    pub const ENEMY_PLANET: u32 = 1 << 3;
    pub const HAS_BASE: u32 = 1 << 4;
    pub const OWN_SHIPS: u32 = 1 << 5;
    pub const ALLIED_SHIPS: u32 = 1 << 6;
    pub const ENEMY_SHIPS: u32 = 1 << 7;
    pub const GUESSED_ALLIED_SHIPS: u32 = 1 << 8;
    pub const GUESSED_ENEMY_SHIPS: u32 = 1 << 9;
}

/// Bitflags for `drawShipTrail`'s `flags` parameter: which endpoint(s) of
/// the segment are actually known positions, versus synthesized from
/// heading/speed.
pub mod trail_flags {
    pub const FROM_POSITION: u32 = 1 << 0;
    pub const TO_POSITION: u32 = 1 << 1;
}

/// The four cardinal directions a warp-well edge can face.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarpWellDirection {
    North,
    South,
    East,
    West,
}

/// Opaque sink for renderer primitive events (spec §6.1).
pub trait RendererListener {
    fn draw_grid_line(&mut self, a: Point, b: Point);
    fn draw_border_line(&mut self, a: Point, b: Point);
    fn draw_border_circle(&mut self, center: Point, radius: i32);

    fn draw_minefield(&mut self, center: Point, id: usize, radius: i32, is_web: bool, relation: Relation, filled: bool);
    fn draw_ufo(&mut self, center: Point, id: UfoId, radius: i32, color: u8, speed: Option<u8>, heading: Option<f64>, filled: bool);
    fn draw_ufo_connection(&mut self, a: Point, b: Point, color: u8);
    fn draw_ion_storm(&mut self, center: Point, radius: i32, voltage: u16, speed: u8, heading: f64, filled: bool);

    fn draw_user_line(&mut self, a: Point, b: Point, color: u8);
    fn draw_user_rectangle(&mut self, a: Point, b: Point, color: u8);
    fn draw_user_circle(&mut self, center: Point, radius: i32, color: u8);
    fn draw_user_marker(&mut self, at: Point, color: u8, kind: crate::map::drawing::MarkerKind, comment: Option<&str>);
    fn draw_explosion(&mut self, pos: Point);

    fn draw_selection(&mut self, pos: Point);
    fn draw_message_marker(&mut self, pos: Point);

    fn draw_ship(&mut self, pos: Point, id: ShipId, relation: Relation, flags: u32, label: &str);
    fn draw_ship_trail(&mut self, a: Point, b: Point, relation: Relation, flags: u32, age: u32);
    fn draw_ship_waypoint(&mut self, a: Point, b: Point, relation: Relation);
    fn draw_ship_vector(&mut self, a: Point, b: Point, relation: Relation);

    fn draw_planet(&mut self, pos: Point, id: PlanetId, flags: u32, label: &str);
    fn draw_warp_well_edge(&mut self, pos: Point, direction: WarpWellDirection);
}
