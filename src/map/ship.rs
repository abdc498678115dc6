use crate::HISTORY_TRACK_TURNS;
use crate::fcode::FriendlyCodeStr;
use geo::Point;

pub type ShipId = usize;
pub type PlayerId = u8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Playability {
    NotPlayable,
    ReadOnly,
    Playable,
}

/// A ship's standing order. `intercept`/`tow` carry the mission-specific
/// target id (another ship), when the mission takes one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mission {
    pub id: u8,
    pub intercept: Option<ShipId>,
    pub tow: Option<ShipId>,
}

/// Which player this unit will attack first, or a special policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Aggressiveness {
    Enemy(PlayerId),
    Kill,
    Passive,
    NoFuel,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cargo {
    pub neutronium: u16,
    pub tritanium: u16,
    pub duranium: u16,
    pub molybdenum: u16,
    pub supplies: u16,
    pub colonists: u16,
}

/// A single entry of a ship's history track: position, heading, speed as
/// observed on some past turn. Indexed by absolute turn number by the
/// owning `Ship::history`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistoryEntry {
    pub position: Point,
    pub heading: f64,
    pub speed: u8,
}

/// Every scalar is `Option<T>` (spec §9 "Optional-of-T fields"): partial
/// knowledge is the norm for any non-own ship.
#[derive(Debug, Clone)]
pub struct Ship {
    pub id: ShipId,
    pub owner: Option<PlayerId>,
    pub friendly_code: Option<FriendlyCodeStr>,
    pub position: Option<Point>,
    pub waypoint: Option<Point>,
    pub warp_factor: Option<u8>,
    pub heading: Option<f64>,
    pub mission: Option<Mission>,
    pub primary_enemy: Option<PlayerId>,
    pub hull_type: Option<u16>,
    pub beam_type: Option<u8>,
    pub beam_count: Option<u8>,
    pub torpedo_type: Option<u8>,
    pub launcher_count: Option<u8>,
    pub bay_count: Option<u8>,
    pub ammo: Option<u16>,
    pub crew: Option<u16>,
    pub fuel: Option<u16>,
    pub cargo: Option<Cargo>,
    pub money: Option<u32>,
    pub damage: Option<u8>,
    pub shields: Option<u8>,
    pub is_fleet_leader: bool,
    pub fleet_number: Option<u16>,
    pub playability: Playability,
    pub is_visible: bool,
    pub is_marked: bool,
    /// History entries keyed by absolute turn number (invariant 4).
    pub history: std::collections::BTreeMap<u32, Option<HistoryEntry>>,
    pub message_indexes: Vec<usize>,
}

impl Ship {
    pub fn new(id: ShipId) -> Self {
        Self {
            id,
            owner: None,
            friendly_code: None,
            position: None,
            waypoint: None,
            warp_factor: None,
            heading: None,
            mission: None,
            primary_enemy: None,
            hull_type: None,
            beam_type: None,
            beam_count: None,
            torpedo_type: None,
            launcher_count: None,
            bay_count: None,
            ammo: None,
            crew: None,
            fuel: None,
            cargo: None,
            money: None,
            damage: None,
            shields: None,
            is_fleet_leader: false,
            fleet_number: None,
            playability: Playability::NotPlayable,
            is_visible: false,
            is_marked: false,
            history: std::collections::BTreeMap::new(),
            message_indexes: Vec::new(),
        }
    }

    pub fn is_capital_ship(&self) -> bool {
        self.beam_count.unwrap_or(0) > 0 || self.launcher_count.unwrap_or(0) > 0 || self.bay_count.unwrap_or(0) > 0
    }

    /// Last `HISTORY_TRACK_TURNS` history entries, newest first, as
    /// `(age, entry)` pairs (age 0 = `turn`, 15 = `turn - 15`).
    pub fn recent_history(&self, turn: u32) -> Vec<(u32, Option<HistoryEntry>)> {
        (0..HISTORY_TRACK_TURNS as u32)
            .map(|age| {
                let t = turn.saturating_sub(age);
                (age, self.history.get(&t).copied().flatten())
            })
            .collect()
    }
}
