use crate::map::drawing::Drawings;
use crate::map::explosion::Explosion;
use crate::map::indexed_vector::IndexedVector;
use crate::map::ionstorm::IonStorm;
use crate::map::minefield::Minefield;
use crate::map::planet::Planet;
use crate::map::ship::Ship;
use crate::map::signal::Signal;
use crate::map::ufo::Ufo;
use geo::MapConfiguration;
use geo::Point;

/// Supplies prior-turn values for undo (spec §3.1 "optional reverter").
pub trait Reverter {
    fn previous_ship(&self, id: usize) -> Option<&Ship>;
    fn previous_planet(&self, id: usize) -> Option<&Planet>;
}

/// The in-memory universe: ships, planets, minefields, ion storms, ufos,
/// explosions, user drawings, and the map's geometric configuration.
/// `Universe` exclusively owns every entity; references between entities
/// are integer ids looked up through the owning collection.
#[derive(Default)]
pub struct Universe {
    pub planets: IndexedVector<Planet>,
    pub ships: IndexedVector<Ship>,
    pub ion_storms: IndexedVector<IonStorm>,
    pub minefields: IndexedVector<Minefield>,
    pub ufos: IndexedVector<Ufo>,
    pub explosions: Vec<Explosion>,
    pub drawings: Drawings,
    pub configuration: MapConfiguration,
    pub reverter: Option<Box<dyn Reverter>>,

    pub sig_pre_update: Signal<()>,
    pub sig_universe_change: Signal<()>,
    pub sig_ship_set_change: Signal<()>,
    pub sig_planet_set_change: Signal<()>,
    pub sig_minefield_set_change: Signal<()>,
    pub sig_ufo_set_change: Signal<()>,
}

impl Universe {
    pub fn new(configuration: MapConfiguration) -> Self {
        Self { configuration, ..Default::default() }
    }

    /// Ships visible at `pos`, used by post-processing's orbit inference
    /// and by the renderer's planet-flags computation.
    pub fn ships_at(&self, pos: Point) -> impl Iterator<Item = &Ship> {
        self.ships.iter_present().filter(move |(_, s)| s.is_visible && s.position == Some(pos)).map(|(_, s)| s)
    }

    pub fn planet_at(&self, pos: Point) -> Option<&Planet> {
        self.planets.iter_present().find(|(_, p)| p.position == Some(pos)).map(|(_, p)| p)
    }
}
