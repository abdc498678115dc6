/// Host rule variant a battle is fought under (spec §3.4 `Sim::Configuration`
/// `Mode`). `HostPHostMixed` selects per-ship based on the ship's own
/// recorded host origin; the rest force every ship through one algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Mode {
    HostPHostMixed,
    VcrHost,
    VcrPHost2,
    VcrPHost3,
    VcrPHost4,
    VcrNuHost,
    VcrFlak,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum BalancingMode {
    #[default]
    None,
    MasterAtWar,
    ForceAnyWar,
}

/// Battle-wide options (spec §3.4 `Sim::Configuration`).
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Configuration {
    pub mode: Mode,
    pub engine_shield_bonus: bool,
    pub scottish_tholian: bool,
    pub lizard_suicide: bool,
    pub deterministic_seed_bits: u64,
    pub alliances_enabled: bool,
    pub balancing: BalancingMode,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            mode: Mode::VcrHost,
            engine_shield_bonus: false,
            scottish_tholian: false,
            lizard_suicide: false,
            deterministic_seed_bits: 0,
            alliances_enabled: false,
            balancing: BalancingMode::None,
        }
    }
}

/// The "job options" passed down into a single `run_simulation` call:
/// which ships randomize their code on every fight, aggregated host/flak
/// configuration.
#[derive(Debug, Clone, Copy, Default, serde::Serialize, serde::Deserialize)]
pub struct Options {
    pub randomize_every_fight: bool,
}
