//! `Universe::postprocess` — spec §4.3.3. Internal checks, visibility
//! inference, playability assignment, change-notification dispatch.

use crate::map::ship::{Playability, PlayerId};
use crate::map::universe::Universe;
use std::collections::HashSet;

/// Host-dependent tuning the spec leaves as a parameter rather than a
/// hardcoded constant (DESIGN.md Open Question: mine decay rate).
#[derive(Debug, Clone, Copy)]
pub struct HostConfig {
    /// Permille of a minefield's units lost per turn.
    pub mine_decay_rate: u32,
    pub ufo_max_age_turns: u32,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self { mine_decay_rate: 5, ufo_max_age_turns: 30 }
    }
}

impl Universe {
    /// Canonicalizes a planet's position and checks partial-data
    /// consistency: a `NotPlayable` entity may be all-`None`; a
    /// `Playable`/`ReadOnly` entity must have `Some` position
    /// (invariant 2).
    fn internal_check_planet(&mut self, id: usize) {
        let config = self.configuration;
        if let Some(planet) = self.planets.get_mut(id) {
            if let Some(pos) = planet.position {
                planet.position = Some(config.canonical_location(pos));
            }
        }
    }

    fn internal_check_ship(&mut self, id: usize) {
        let config = self.configuration;
        if let Some(ship) = self.ships.get_mut(id) {
            if let Some(pos) = ship.position {
                ship.position = Some(config.canonical_location(pos));
            }
            if let Some(wp) = ship.waypoint {
                ship.waypoint = Some(config.canonical_location(wp));
            }
        }
    }

    fn assign_planet_playability(&mut self, id: usize, playing_set: &HashSet<PlayerId>, playability: Playability) {
        if let Some(planet) = self.planets.get_mut(id) {
            planet.playability = match (planet.is_visible, planet.position.is_some(), planet.owner) {
                (true, true, Some(owner)) if owner != 0 => {
                    if playing_set.contains(&owner) { playability } else { Playability::ReadOnly }
                }
                _ => Playability::NotPlayable,
            };
        }
    }

    fn assign_ship_playability(&mut self, id: usize, playing_set: &HashSet<PlayerId>, playability: Playability) {
        if let Some(ship) = self.ships.get_mut(id) {
            ship.playability = match (ship.is_visible, ship.position.is_some(), ship.owner) {
                (true, true, Some(owner)) if owner != 0 => {
                    if playing_set.contains(&owner) { playability } else { Playability::ReadOnly }
                }
                _ => Playability::NotPlayable,
            };
        }
    }

    /// Ship visibility propagates "is at this planet" orbit knowledge
    /// (supplemented from `original_source`, see SPEC_FULL §3): a ship
    /// with known position equal to a played planet's position, and the
    /// planet visible, is considered "at" that planet for the renderer's
    /// relation-flag computation. `combinedCheck1`.
    fn combined_check_1(&mut self) {
        let planet_positions: Vec<_> =
            self.planets.iter_present().filter(|(_, p)| p.is_visible).filter_map(|(_, p)| p.position).collect();
        for (_, ship) in self.ships.iter_present_mut() {
            if let Some(pos) = ship.position {
                if planet_positions.contains(&pos) {
                    ship.is_visible = true;
                }
            }
        }
    }

    /// Cross-entity invariant pass 2: a ship that knows its heading and
    /// speed but not its waypoint gets one inferred (used by trail
    /// synthesis and fleet mechanics alike). `combinedCheck2`.
    fn combined_check_2(&mut self) {
        for (_, ship) in self.ships.iter_present_mut() {
            if ship.waypoint.is_none() {
                if let (Some(pos), Some(heading), Some(warp)) = (ship.position, ship.heading, ship.warp_factor) {
                    if warp > 0 {
                        let dist = (warp as f64) * (warp as f64);
                        let dx = (heading.to_radians().cos() * dist).round() as i32;
                        let dy = (heading.to_radians().sin() * dist).round() as i32;
                        ship.waypoint = Some(pos.offset(dx, dy));
                    }
                }
            }
        }
    }

    /// Steps 1-7 of spec §4.3.3, in order.
    pub fn postprocess(
        &mut self,
        playing_set: &HashSet<PlayerId>,
        _available_players: &HashSet<PlayerId>,
        playability: Playability,
        host: HostConfig,
        turn_number: u32,
    ) {
        self.sig_pre_update.emit(&());

        let planet_ids: Vec<_> = self.planets.iter_present().map(|(id, _)| id).collect();
        for id in planet_ids {
            self.internal_check_planet(id);
            self.assign_planet_playability(id, playing_set, playability);
        }

        let ship_ids: Vec<_> = self.ships.iter_present().map(|(id, _)| id).collect();
        for id in ship_ids {
            self.internal_check_ship(id);
            self.assign_ship_playability(id, playing_set, playability);
        }

        self.minefields_internal_check(turn_number, host);
        self.drawings.erase_expired_drawings(turn_number);
        self.ufos_postprocess(turn_number, host);

        self.sig_ship_set_change.emit(&());
        self.sig_planet_set_change.emit(&());
        self.sig_minefield_set_change.emit(&());
        self.sig_ufo_set_change.emit(&());

        self.combined_check_1();
        self.combined_check_2();

        self.sig_universe_change.emit(&());
    }

    fn minefields_internal_check(&mut self, _turn: u32, host: HostConfig) {
        let dead: Vec<_> = self
            .minefields
            .iter_present_mut()
            .filter(|(_, m)| !m.decay(host.mine_decay_rate))
            .map(|(id, _)| id)
            .collect();
        for id in dead {
            self.minefields.remove(id);
        }
    }

    fn ufos_postprocess(&mut self, turn: u32, host: HostConfig) {
        let stale: Vec<_> = self
            .ufos
            .iter_present()
            .filter(|(_, u)| u.is_stale(turn, host.ufo_max_age_turns))
            .map(|(id, _)| id)
            .collect();
        for id in stale {
            self.ufos.remove(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::planet::Planet;
    use crate::map::ship::Ship;
    use geo::{MapConfiguration, MapMode, Point};

    fn universe() -> Universe {
        Universe::new(MapConfiguration::new(MapMode::Flat, Point::new(0, 0), (2000, 2000)))
    }

    #[test]
    fn playable_owner_gets_playable_playability() {
        let mut univ = universe();
        let mut p = Planet::new(1);
        p.is_visible = true;
        p.position = Some(Point::new(10, 10));
        p.owner = Some(3);
        univ.planets.set(1, p);

        let playing: HashSet<PlayerId> = [3].into_iter().collect();
        univ.postprocess(&playing, &playing, Playability::Playable, HostConfig::default(), 1);
        assert_eq!(univ.planets.get(1).unwrap().playability, Playability::Playable);
    }

    #[test]
    fn foreign_owner_gets_readonly() {
        let mut univ = universe();
        let mut p = Planet::new(1);
        p.is_visible = true;
        p.position = Some(Point::new(10, 10));
        p.owner = Some(4);
        univ.planets.set(1, p);

        let playing: HashSet<PlayerId> = [3].into_iter().collect();
        univ.postprocess(&playing, &playing, Playability::Playable, HostConfig::default(), 1);
        assert_eq!(univ.planets.get(1).unwrap().playability, Playability::ReadOnly);
    }

    #[test]
    fn ship_at_played_planet_becomes_visible() {
        let mut univ = universe();
        let mut p = Planet::new(1);
        p.is_visible = true;
        p.position = Some(Point::new(5, 5));
        univ.planets.set(1, p);

        let mut s = Ship::new(1);
        s.position = Some(Point::new(5, 5));
        s.is_visible = false;
        univ.ships.set(1, s);

        let playing: HashSet<PlayerId> = HashSet::new();
        univ.postprocess(&playing, &playing, Playability::Playable, HostConfig::default(), 1);
        assert!(univ.ships.get(1).unwrap().is_visible);
    }

    #[test]
    fn expired_drawing_is_erased_in_postprocess() {
        use crate::map::drawing::{Drawing, DrawingShape, MarkerKind};
        let mut univ = universe();
        univ.drawings.add(Drawing {
            shape: DrawingShape::Marker { at: Point::new(0, 0), kind: MarkerKind::Dot },
            color: 1,
            comment: None,
            tag: 0,
            expires_turn: 5,
        });
        let playing: HashSet<PlayerId> = HashSet::new();
        univ.postprocess(&playing, &playing, Playability::Playable, HostConfig::default(), 10);
        assert_eq!(univ.drawings.iter().count(), 0);
    }
}
