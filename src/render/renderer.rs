//! `Renderer::render` — spec §4.3.5. Grounded on
//! `examples/original_source/game/map/renderer.cpp`: its `State` helper
//! precomputes, per drawable, which of the map's wrapped images are
//! actually visible before emitting anything, and the fixed traversal
//! order (grid, field objects, ship extras, planets, ships) is carried
//! over unchanged.

use crate::map::drawing::DrawingShape;
use crate::map::objects::{any_planet_type, any_ship_type, history_ship_type};
use crate::map::planet::Planet;
use crate::map::ship::{HistoryEntry, Ship};
use crate::render::listener::{planet_flags, ship_flags, trail_flags, RendererListener, WarpWellDirection};
use crate::render::viewport::{options, Viewport};
use geo::{MapMode, Point};

pub struct Renderer;

impl Renderer {
    /// Every image of `pos` that lands inside the viewport's visible
    /// rectangle, per the map's wrap mode (spec §4.3.5 "Wrapped maps
    /// cause each drawable to be emitted once per visible image").
    fn visible_images(viewport: &Viewport, pos: Point) -> Vec<Point> {
        let cfg = &viewport.universe.configuration;
        (0..cfg.num_rectangular_images())
            .map(|i| cfg.simple_point_alias(pos, i))
            .filter(|p| viewport.contains_point(*p))
            .collect()
    }

    fn visible_circle_images(viewport: &Viewport, center: Point, radius: i32) -> Vec<Point> {
        let cfg = &viewport.universe.configuration;
        (0..cfg.num_rectangular_images())
            .map(|i| cfg.simple_point_alias(center, i))
            .filter(|p| viewport.contains_circle(*p, radius))
            .collect()
    }

    pub fn render(viewport: &Viewport, listener: &mut dyn RendererListener) {
        Self::render_grid(viewport, listener);
        if viewport.has(options::SHOW_MINEFIELDS) {
            Self::render_minefields(viewport, listener);
        }
        if viewport.has(options::SHOW_UFOS) {
            Self::render_ufos(viewport, listener);
        }
        if viewport.has(options::SHOW_ION_STORMS) {
            Self::render_ion_storms(viewport, listener);
        }
        if viewport.has(options::SHOW_DRAWINGS) {
            Self::render_drawings(viewport, listener);
            Self::render_explosions(viewport, listener);
        }
        Self::render_ship_extras(viewport, listener);
        Self::render_planets(viewport, listener);
        Self::render_ships(viewport, listener);
    }

    fn render_grid(viewport: &Viewport, listener: &mut dyn RendererListener) {
        if !viewport.has(options::SHOW_GRID) {
            return;
        }
        let cfg = &viewport.universe.configuration;
        match cfg.mode {
            MapMode::Flat | MapMode::Wrapped => {
                let corners = [
                    (Point::new(cfg.min.x, cfg.min.y), Point::new(cfg.max.x, cfg.min.y)),
                    (Point::new(cfg.max.x, cfg.min.y), Point::new(cfg.max.x, cfg.max.y)),
                    (Point::new(cfg.max.x, cfg.max.y), Point::new(cfg.min.x, cfg.max.y)),
                    (Point::new(cfg.min.x, cfg.max.y), Point::new(cfg.min.x, cfg.min.y)),
                ];
                for (a, b) in corners {
                    if viewport.contains_line(a, b) {
                        listener.draw_border_line(a, b);
                    }
                }
            }
            MapMode::Circular => {
                let radius = (cfg.size.0.min(cfg.size.1) / 2) as i32;
                if viewport.contains_circle(cfg.center, radius) {
                    listener.draw_border_circle(cfg.center, radius);
                }
            }
        }
    }

    fn render_minefields(viewport: &Viewport, listener: &mut dyn RendererListener) {
        for (id, mf) in viewport.universe.minefields.iter_present() {
            let radius = mf.radius() as i32;
            let relation = viewport.relation_of(Some(mf.owner));
            for image in Self::visible_circle_images(viewport, mf.center, radius) {
                listener.draw_minefield(image, id, radius, mf.is_web, relation, true);
            }
        }
    }

    fn render_ufos(viewport: &Viewport, listener: &mut dyn RendererListener) {
        for (_, ufo) in viewport.universe.ufos.iter_present() {
            let radius = ufo.radius as i32;
            for image in Self::visible_circle_images(viewport, ufo.position, radius) {
                listener.draw_ufo(image, ufo.id, radius, ufo.color, ufo.speed, ufo.heading, true);
            }
            if let Some(other) = ufo.other_end {
                if let Some(partner) = viewport.universe.ufos.get(other) {
                    if viewport.contains_line(ufo.position, partner.position) {
                        listener.draw_ufo_connection(ufo.position, partner.position, ufo.color);
                    }
                }
            }
        }
    }

    fn render_ion_storms(viewport: &Viewport, listener: &mut dyn RendererListener) {
        for (_, storm) in viewport.universe.ion_storms.iter_present() {
            let radius = storm.radius as i32;
            let filled = storm.state == crate::map::ionstorm::IonStormState::Growing;
            for image in Self::visible_circle_images(viewport, storm.center, radius) {
                listener.draw_ion_storm(image, radius, storm.voltage, storm.speed, storm.heading, filled);
            }
        }
    }

    fn render_drawings(viewport: &Viewport, listener: &mut dyn RendererListener) {
        for drawing in viewport.universe.drawings.iter() {
            match drawing.shape {
                DrawingShape::Line { from, to } => {
                    if viewport.contains_line(from, to) {
                        listener.draw_user_line(from, to, drawing.color);
                    }
                }
                DrawingShape::Rectangle { from, to } => {
                    if viewport.contains_rectangle(from, to) {
                        listener.draw_user_rectangle(from, to, drawing.color);
                    }
                }
                DrawingShape::Circle { center, radius } => {
                    if viewport.contains_circle(center, radius as i32) {
                        listener.draw_user_circle(center, radius as i32, drawing.color);
                    }
                }
                DrawingShape::Marker { at, kind } => {
                    if viewport.contains_point(at) {
                        listener.draw_user_marker(at, drawing.color, kind, drawing.comment.as_deref());
                    }
                }
            }
        }
    }

    fn render_explosions(viewport: &Viewport, listener: &mut dyn RendererListener) {
        for explosion in &viewport.universe.explosions {
            if viewport.contains_point(explosion.position) {
                listener.draw_explosion(explosion.position);
            }
        }
    }

    fn render_ship_extras(viewport: &Viewport, listener: &mut dyn RendererListener) {
        for (id, ship) in any_ship_type(viewport.universe).iter() {
            let Some(pos) = ship.position else { continue };
            let images = Self::visible_images(viewport, pos);
            if images.is_empty() {
                continue;
            }
            let relation = viewport.relation_of(ship.owner);

            for image in &images {
                if viewport.has(options::SHOW_SELECTION) && ship.is_marked {
                    listener.draw_selection(*image);
                }
                if viewport.has(options::SHOW_MESSAGES) && !ship.message_indexes.is_empty() {
                    listener.draw_message_marker(*image);
                }
                if ship.is_fleet_leader {
                    listener.draw_ship(*image, id, relation, ship_flags::FLEET_LEADER, "");
                }
                if !viewport.has(options::SHOW_SHIP_DOTS) {
                    listener.draw_ship(*image, id, relation, ship_flags::SHOW_DOT, "");
                }
            }
            if viewport.has(options::SHOW_TRAILS) {
                Self::render_ship_trail(viewport, listener, ship, relation);
            }
            if viewport.has(options::SHOW_VECTORS) {
                if let Some(wp) = ship.waypoint {
                    if viewport.contains_line(pos, wp) {
                        listener.draw_ship_vector(pos, wp, relation);
                    }
                    listener.draw_ship_waypoint(pos, wp, relation);
                }
            }
        }
    }

    /// Walks the last `HISTORY_TRACK_TURNS` turns of `ship`'s history,
    /// emitting one `drawShipTrail` per consecutive pair. When one
    /// endpoint of a pair is missing, it's synthesized from the known
    /// endpoint's heading and speed (spec §4.3.5).
    fn render_ship_trail(viewport: &Viewport, listener: &mut dyn RendererListener, ship: &Ship, relation: crate::render::listener::Relation) {
        let track = ship.recent_history(viewport.turn_number);
        for pair in track.windows(2) {
            let (younger_age, younger) = pair[0];
            let (_, older) = pair[1];
            let (from, to, flags) = match (younger, older) {
                (Some(y), Some(o)) => (y.position, o.position, trail_flags::FROM_POSITION | trail_flags::TO_POSITION),
                (Some(y), None) => {
                    let synthesized = Self::synthesize_endpoint(y, false);
                    (y.position, synthesized, trail_flags::FROM_POSITION)
                }
                (None, Some(o)) => {
                    let synthesized = Self::synthesize_endpoint(o, true);
                    (synthesized, o.position, trail_flags::TO_POSITION)
                }
                (None, None) => continue,
            };
            if viewport.contains_line(from, to) {
                listener.draw_ship_trail(from, to, relation, flags, younger_age);
            }
        }
    }

    /// `way = max(15, speed^2 / 2)` units projected along `entry.heading`,
    /// matching the source's `combinedCheck2`-style heading convention
    /// (0 degrees = +x axis, increasing counter-clockwise).
    fn synthesize_endpoint(entry: HistoryEntry, forward: bool) -> Point {
        let speed = entry.speed as f64;
        let way = (speed * speed / 2.0).max(15.0);
        let radians = entry.heading.to_radians();
        let dx = (radians.cos() * way).round() as i32;
        let dy = (radians.sin() * way).round() as i32;
        if forward {
            entry.position.offset(dx, dy)
        } else {
            entry.position.offset(-dx, -dy)
        }
    }

    fn render_planets(viewport: &Viewport, listener: &mut dyn RendererListener) {
        for (id, planet) in any_planet_type(viewport.universe).iter() {
            let Some(pos) = planet.position else { continue };
            let images = Self::visible_images(viewport, pos);
            if images.is_empty() {
                continue;
            }

            let flags = Self::planet_flags(viewport, planet);
            let label = planet.friendly_code.as_ref().map(|c| c.as_str()).unwrap_or("");
            for image in images {
                if viewport.has(options::SHOW_WARP_WELLS) {
                    Self::render_warp_well(viewport, listener, image);
                }
                if viewport.has(options::SHOW_SELECTION) && planet.is_marked {
                    listener.draw_selection(image);
                }
                listener.draw_planet(image, id, flags, label);
            }
        }
    }

    fn planet_flags(viewport: &Viewport, planet: &Planet) -> u32 {
        use crate::render::listener::Relation;
        let mut flags = match viewport.relation_of(planet.owner) {
            Relation::Unowned => planet_flags::UNOWNED,
            Relation::Own => planet_flags::OWN_PLANET,
            Relation::Allied => planet_flags::ALLIED_PLANET,
            Relation::Enemy => planet_flags::ENEMY_PLANET,
        };
        if planet.has_base() {
            flags |= planet_flags::HAS_BASE;
        }
        let Some(pos) = planet.position else { return flags };

        let ships = any_ship_type(viewport.universe);
        for (_, ship) in ships.iter().filter(|(_, s)| s.position == Some(pos)) {
            flags |= match viewport.relation_of(ship.owner) {
                Relation::Own => planet_flags::OWN_SHIPS,
                Relation::Allied => planet_flags::ALLIED_SHIPS,
                Relation::Enemy => planet_flags::ENEMY_SHIPS,
                Relation::Unowned => 0,
            };
        }
        for (_, ship) in history_ship_type(viewport.universe).iter().filter(|(_, s)| s.position == Some(pos)) {
            flags |= match viewport.relation_of(ship.owner) {
                Relation::Allied => planet_flags::GUESSED_ALLIED_SHIPS,
                Relation::Enemy => planet_flags::GUESSED_ENEMY_SHIPS,
                _ => 0,
            };
        }
        flags
    }

    /// Traces the boundary of a planet's gravity well (spec §4.3.5): an
    /// octant-by-octant digital circle for round wells, a plain square
    /// outline otherwise. Grounded on `renderWarpWell` in the source.
    fn render_warp_well(viewport: &Viewport, listener: &mut dyn RendererListener, center: Point) {
        let range = viewport.warp_well_range as i32;
        if range <= 0 {
            return;
        }
        if viewport.has(options::ROUND_GRAVITY_WELLS) {
            Self::render_round_warp_well(viewport, listener, center, range);
        } else {
            Self::render_square_warp_well(viewport, listener, center, range);
        }
    }

    fn emit_edge(viewport: &Viewport, listener: &mut dyn RendererListener, p: Point, dir: WarpWellDirection) {
        if viewport.contains_point(p) {
            listener.draw_warp_well_edge(p, dir);
        }
    }

    fn render_square_warp_well(viewport: &Viewport, listener: &mut dyn RendererListener, center: Point, range: i32) {
        for i in -range..=range {
            Self::emit_edge(viewport, listener, center.offset(i, -range), WarpWellDirection::North);
            Self::emit_edge(viewport, listener, center.offset(i, range), WarpWellDirection::South);
            Self::emit_edge(viewport, listener, center.offset(range, i), WarpWellDirection::East);
            Self::emit_edge(viewport, listener, center.offset(-range, i), WarpWellDirection::West);
        }
    }

    /// Octant-by-octant digital circle trace (the source's
    /// `renderWarpWell`): starting at the pole `(wwx, wwy) = (range, 0)`,
    /// walk one octant incrementing `wwy` every step and decrementing
    /// `wwx` whenever holding it would leave the circle, then mirror each
    /// point into the other seven octants. Each point's edge direction is
    /// whichever cardinal its offset from center is furthest along.
    fn render_round_warp_well(viewport: &Viewport, listener: &mut dyn RendererListener, center: Point, range: i32) {
        let mut wwx = range;
        let mut wwy = 0;
        while wwy <= wwx {
            for (dx, dy) in [(wwx, wwy), (wwx, -wwy), (-wwx, wwy), (-wwx, -wwy), (wwy, wwx), (wwy, -wwx), (-wwy, wwx), (-wwy, -wwx)] {
                Self::emit_edge(viewport, listener, center.offset(dx, dy), Self::edge_direction(dx, dy));
            }
            wwy += 1;
            if wwx * wwx + wwy * wwy > range * range {
                wwx -= 1;
            }
        }
    }

    /// Which cardinal direction a warp-well point's offset from its
    /// planet predominantly faces.
    fn edge_direction(dx: i32, dy: i32) -> WarpWellDirection {
        if dx.abs() >= dy.abs() {
            if dx >= 0 { WarpWellDirection::East } else { WarpWellDirection::West }
        } else if dy >= 0 {
            WarpWellDirection::South
        } else {
            WarpWellDirection::North
        }
    }

    fn render_ships(viewport: &Viewport, listener: &mut dyn RendererListener) {
        for (id, ship) in any_ship_type(viewport.universe).iter() {
            let Some(pos) = ship.position else { continue };
            let images = Self::visible_images(viewport, pos);
            if images.is_empty() {
                continue;
            }
            let relation = viewport.relation_of(ship.owner);
            let mut flags = ship_flags::SHOW_ICON;
            if ship.is_fleet_leader {
                flags |= ship_flags::FLEET_LEADER;
            }
            if viewport.universe.planet_at(pos).is_some() {
                flags |= ship_flags::AT_PLANET;
            }
            let label = ship.friendly_code.as_ref().map(|c| c.as_str()).unwrap_or("");
            for image in images {
                listener.draw_ship(image, id, relation, flags, label);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::drawing::MarkerKind;
    use crate::map::planet::Planet;
    use crate::map::ship::Ship;
    use crate::map::ufo::UfoId;
    use crate::map::universe::Universe;
    use crate::render::listener::Relation;
    use geo::{MapConfiguration, MapMode};

    #[derive(Default)]
    struct RecordingListener {
        events: Vec<String>,
    }

    impl RendererListener for RecordingListener {
        fn draw_grid_line(&mut self, _a: Point, _b: Point) {
            self.events.push("grid_line".into());
        }
        fn draw_border_line(&mut self, _a: Point, _b: Point) {
            self.events.push("border_line".into());
        }
        fn draw_border_circle(&mut self, _center: Point, _radius: i32) {
            self.events.push("border_circle".into());
        }
        fn draw_minefield(&mut self, _center: Point, _id: usize, _radius: i32, _is_web: bool, _relation: Relation, _filled: bool) {
            self.events.push("minefield".into());
        }
        fn draw_ufo(&mut self, _center: Point, _id: UfoId, _radius: i32, _color: u8, _speed: Option<u8>, _heading: Option<f64>, _filled: bool) {
            self.events.push("ufo".into());
        }
        fn draw_ufo_connection(&mut self, _a: Point, _b: Point, _color: u8) {
            self.events.push("ufo_connection".into());
        }
        fn draw_ion_storm(&mut self, _center: Point, _radius: i32, _voltage: u16, _speed: u8, _heading: f64, _filled: bool) {
            self.events.push("ion_storm".into());
        }
        fn draw_user_line(&mut self, _a: Point, _b: Point, _color: u8) {
            self.events.push("user_line".into());
        }
        fn draw_user_rectangle(&mut self, _a: Point, _b: Point, _color: u8) {
            self.events.push("user_rectangle".into());
        }
        fn draw_user_circle(&mut self, _center: Point, _radius: i32, _color: u8) {
            self.events.push("user_circle".into());
        }
        fn draw_user_marker(&mut self, _at: Point, _color: u8, _kind: MarkerKind, _comment: Option<&str>) {
            self.events.push("user_marker".into());
        }
        fn draw_explosion(&mut self, _pos: Point) {
            self.events.push("explosion".into());
        }
        fn draw_selection(&mut self, _pos: Point) {
            self.events.push("selection".into());
        }
        fn draw_message_marker(&mut self, _pos: Point) {
            self.events.push("message_marker".into());
        }
        fn draw_ship(&mut self, _pos: Point, _id: crate::map::ship::ShipId, _relation: Relation, _flags: u32, _label: &str) {
            self.events.push("ship".into());
        }
        fn draw_ship_trail(&mut self, _a: Point, _b: Point, _relation: Relation, _flags: u32, _age: u32) {
            self.events.push("ship_trail".into());
        }
        fn draw_ship_waypoint(&mut self, _a: Point, _b: Point, _relation: Relation) {
            self.events.push("ship_waypoint".into());
        }
        fn draw_ship_vector(&mut self, _a: Point, _b: Point, _relation: Relation) {
            self.events.push("ship_vector".into());
        }
        fn draw_planet(&mut self, _pos: Point, _id: crate::map::planet::PlanetId, _flags: u32, _label: &str) {
            self.events.push("planet".into());
        }
        fn draw_warp_well_edge(&mut self, _pos: Point, _direction: WarpWellDirection) {
            self.events.push("warp_well_edge".into());
        }
    }

    fn flat_universe() -> Universe {
        Universe::new(MapConfiguration::new(MapMode::Flat, Point::new(1000, 1000), (2000, 2000)))
    }

    #[test]
    fn traversal_visits_ship_extras_before_planets_before_ships() {
        let mut univ = flat_universe();
        let mut planet = Planet::new(1);
        planet.is_visible = true;
        planet.position = Some(Point::new(500, 500));
        univ.planets.set(1, planet);

        let mut ship = Ship::new(1);
        ship.is_visible = true;
        ship.position = Some(Point::new(500, 500));
        univ.ships.set(1, ship);

        let vp = Viewport::new(&univ, 1, Point::new(0, 0), Point::new(2000, 2000));
        let mut listener = RecordingListener::default();
        Renderer::render(&vp, &mut listener);

        let planet_at = listener.events.iter().position(|e| e == "planet").unwrap();
        let ship_positions: Vec<_> = listener.events.iter().enumerate().filter(|(_, e)| *e == "ship").map(|(i, _)| i).collect();
        assert!(ship_positions.iter().any(|&i| i > planet_at), "final ship pass must come after the planet pass");
    }

    #[test]
    fn round_warp_well_emits_no_points_outside_its_range() {
        let univ = flat_universe();
        let mut vp = Viewport::new(&univ, 1, Point::new(0, 0), Point::new(2000, 2000));
        vp.options |= options::ROUND_GRAVITY_WELLS;
        vp.warp_well_range = 3;
        let mut listener = RecordingListener::default();
        Renderer::render_warp_well(&vp, &mut listener, Point::new(1000, 1000));
        assert!(listener.events.iter().all(|e| e == "warp_well_edge"));
        assert!(!listener.events.is_empty());
    }

    #[test]
    fn square_warp_well_emits_a_full_perimeter() {
        let univ = flat_universe();
        let mut vp = Viewport::new(&univ, 1, Point::new(0, 0), Point::new(2000, 2000));
        vp.warp_well_range = 2;
        let mut listener = RecordingListener::default();
        Renderer::render_warp_well(&vp, &mut listener, Point::new(1000, 1000));
        // perimeter of a (2*2+1)^2 square, minus the interior: 4*(2*range+1) - 4 corners counted twice.
        assert_eq!(listener.events.len(), 4 * (2 * 2 + 1));
    }

    #[test]
    fn trail_synthesizes_the_missing_endpoint_from_heading_and_speed() {
        let entry = HistoryEntry { position: Point::new(1000, 1000), heading: 0.0, speed: 9 };
        let synthesized = Renderer::synthesize_endpoint(entry, true);
        // way = max(15, 9^2/2) = max(15, 40.5) = 40.5, heading 0 -> +x axis.
        assert_eq!(synthesized, Point::new(1000 + 41, 1000));
    }

    #[test]
    fn trail_synthesis_enforces_the_minimum_way_of_15_units() {
        let entry = HistoryEntry { position: Point::new(0, 0), heading: 90.0, speed: 1 };
        let synthesized = Renderer::synthesize_endpoint(entry, true);
        assert_eq!(synthesized, Point::new(0, 15));
    }
}
