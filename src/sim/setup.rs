use crate::fcode::FriendlyCodeStr;
use crate::map::ship::{Aggressiveness, PlayerId, ShipId};

/// One combatant ship in a battle (spec §3.4 `Sim::Ship`). Distinct from
/// `map::Ship`: every field here is a concrete value, not an `Option`,
/// because a simulation setup is always fully specified by the caller.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SimShip {
    pub id: ShipId,
    pub name: String,
    pub friendly_code: FriendlyCodeStr,
    pub owner: PlayerId,
    pub hull_type: u16,
    pub engine_type: u8,
    pub beam_type: u8,
    pub beam_count: u8,
    pub torpedo_type: u8,
    pub launcher_count: u8,
    pub ammo: u16,
    pub bay_count: u8,
    pub fighter_count: u16,
    pub damage: u8,
    pub shields: u8,
    pub crew: u16,
    pub mass: u32,
    pub aggressiveness: Aggressiveness,
    pub intercept_id: Option<ShipId>,
    pub is_flak_enabled: bool,
    pub is_commander: bool,
    pub experience_level: u8,
    /// When set, a fresh random code is drawn every single fight rather
    /// than once per batch (spec §4.2.1 step 1 / §4.2.2).
    pub randomize_fcode_every_fight: bool,
    pub randomize_fcode_once_per_batch: bool,
}

impl SimShip {
    pub fn is_capital_ship(&self) -> bool {
        self.beam_count > 0 || self.launcher_count > 0 || self.bay_count > 0
    }

    pub fn is_alive(&self) -> bool {
        self.damage < 100
    }

    pub fn has_kill_mission(&self) -> bool {
        matches!(self.aggressiveness, Aggressiveness::Kill)
    }

    pub fn has_primary_enemy(&self) -> bool {
        matches!(self.aggressiveness, Aggressiveness::Enemy(_) | Aggressiveness::Kill)
    }
}

/// One combatant planet (spec §3.4). Optional because not every setup
/// includes a defending planet.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SimPlanet {
    pub name: String,
    pub friendly_code: FriendlyCodeStr,
    pub owner: PlayerId,
    pub defense: u16,
    pub has_base: bool,
    pub fighter_count: u16,
    pub beam_type: u8,
    pub beam_count: u8,
}

impl SimPlanet {
    pub fn has_kill_or_nuke_mission(&self) -> bool {
        matches!(self.friendly_code.as_str(), "ATT" | "NUK")
    }
}

/// Ordered list of combatants plus an optional defending planet
/// (spec §3.4 `Sim::Setup`).
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Setup {
    pub ships: Vec<SimShip>,
    pub planet: Option<SimPlanet>,
}

impl Setup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alive_ships(&self) -> impl Iterator<Item = &SimShip> {
        self.ships.iter().filter(|s| s.is_alive())
    }

    pub fn owners(&self) -> Vec<PlayerId> {
        let mut owners: Vec<PlayerId> = self.ships.iter().map(|s| s.owner).collect();
        if let Some(p) = &self.planet {
            owners.push(p.owner);
        }
        owners.sort_unstable();
        owners.dedup();
        owners
    }
}
