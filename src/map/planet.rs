use crate::fcode::FriendlyCodeStr;
use crate::map::ship::{Playability, PlayerId, ShipId};
use geo::Point;

pub type PlanetId = usize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Minerals {
    pub neutronium: u32,
    pub tritanium: u32,
    pub duranium: u32,
    pub molybdenum: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Density {
    pub neutronium: u8,
    pub tritanium: u8,
    pub duranium: u8,
    pub molybdenum: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Taxes {
    pub colonist: u8,
    pub native: u8,
}

/// Shipyard build/recycle/fix order on a starbase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShipyardAction {
    None,
    Fix(ShipId),
    Recycle(ShipId),
}

/// A next-turn hull/engine/beam/launcher build order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOrder {
    pub hull_type: u16,
    pub engine_type: u8,
    pub beam_type: u8,
    pub beam_count: u8,
    pub torpedo_type: u8,
    pub launcher_count: u8,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TechLevels {
    pub hull: u8,
    pub engine: u8,
    pub beam: u8,
    pub torpedo: u8,
}

/// A starbase extends a planet with shipyard state (spec §3.1 "Base").
#[derive(Debug, Clone)]
pub struct Base {
    pub tech: TechLevels,
    pub hulls_stored: Vec<(u16, u16)>,
    pub engines_stored: Vec<(u8, u16)>,
    pub beams_stored: Vec<(u8, u16)>,
    pub launchers_stored: Vec<(u8, u16)>,
    pub torpedoes_stored: Vec<(u8, u16)>,
    pub fighters: u16,
    pub shipyard_action: ShipyardAction,
    pub mission: Option<u8>,
    pub build_order: Option<BuildOrder>,
}

impl Default for Base {
    fn default() -> Self {
        Self {
            tech: TechLevels::default(),
            hulls_stored: Vec::new(),
            engines_stored: Vec::new(),
            beams_stored: Vec::new(),
            launchers_stored: Vec::new(),
            torpedoes_stored: Vec::new(),
            fighters: 0,
            shipyard_action: ShipyardAction::None,
            mission: None,
            build_order: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Planet {
    pub id: PlanetId,
    pub owner: Option<PlayerId>,
    pub friendly_code: Option<FriendlyCodeStr>,
    pub position: Option<Point>,
    pub minerals_mined: Option<Minerals>,
    pub minerals_ground: Option<Minerals>,
    pub density: Option<Density>,
    pub colonists: Option<u32>,
    pub supplies: Option<u32>,
    pub money: Option<u32>,
    pub taxes: Option<Taxes>,
    pub happiness: Option<(i8, i8)>,
    pub native_race: Option<u8>,
    pub native_government: Option<u8>,
    pub native_population: Option<u32>,
    pub temperature: Option<u8>,
    pub mines: Option<u16>,
    pub factories: Option<u16>,
    pub defense: Option<u16>,
    pub base: Option<Base>,
    pub playability: Playability,
    pub is_visible: bool,
    pub is_marked: bool,
}

impl Planet {
    pub fn new(id: PlanetId) -> Self {
        Self {
            id,
            owner: None,
            friendly_code: None,
            position: None,
            minerals_mined: None,
            minerals_ground: None,
            density: None,
            colonists: None,
            supplies: None,
            money: None,
            taxes: None,
            happiness: None,
            native_race: None,
            native_government: None,
            native_population: None,
            temperature: None,
            mines: None,
            factories: None,
            defense: None,
            base: None,
            playability: Playability::NotPlayable,
            is_visible: false,
            is_marked: false,
        }
    }

    pub fn has_base(&self) -> bool {
        self.base.is_some()
    }
}
