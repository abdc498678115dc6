use crate::map::ship::PlayerId;
use crate::sim::setup::Setup;

/// Per-unit-per-fight measurements (spec §3.4 `Statistic`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Statistic {
    pub min_fighters_aboard: u32,
    pub torpedo_hits_dealt: u32,
    pub fight_count: u32,
}

/// A battle's raw sample, kept around as the witness payload for
/// min/max-range accumulators and class-result exemplars.
#[derive(Debug, Clone, PartialEq)]
pub struct BattleSample {
    pub setup_before: Setup,
    pub setup_after: Setup,
    pub stats: Vec<Statistic>,
}

/// Per-fight metadata (spec §3.4 `Result`).
#[derive(Debug, Clone, PartialEq)]
pub struct FightResult {
    pub weight: f64,
    pub seed: u64,
    pub series_length: u32,
    pub series_index: u32,
    pub sample: BattleSample,
}

/// Weighted min/max-witness accumulator (spec §4.2.5): remembers not just
/// the extreme value but the fight that produced it.
#[derive(Debug, Clone, Default)]
pub struct WeightedRange {
    min: f64,
    max: f64,
    min_witness: Option<usize>,
    max_witness: Option<usize>,
    seen: bool,
}

impl WeightedRange {
    pub fn update(&mut self, value: f64, witness_fight_index: usize) {
        if !self.seen || value < self.min {
            self.min = value;
            self.min_witness = Some(witness_fight_index);
        }
        if !self.seen || value > self.max {
            self.max = value;
            self.max_witness = Some(witness_fight_index);
        }
        self.seen = true;
    }

    pub fn min(&self) -> Option<f64> {
        self.seen.then_some(self.min)
    }

    pub fn max(&self) -> Option<f64> {
        self.seen.then_some(self.max)
    }

    pub fn min_witness(&self) -> Option<usize> {
        self.min_witness
    }

    pub fn max_witness(&self) -> Option<usize> {
        self.max_witness
    }
}

/// Per-unit accumulated record (spec §3.4 `ResultList`'s "per-unit
/// records").
#[derive(Debug, Clone, Default)]
pub struct UnitResult {
    pub fights: u32,
    pub won: u32,
    pub captured: u32,
    pub damage_taken: WeightedRange,
    pub shields_remaining: WeightedRange,
    pub fighters_lost: WeightedRange,
    pub torps_fired: WeightedRange,
}

/// A partition cell over outcome vectors: "owner X kept N capital ships,
/// owner Y kept M, planet stayed with owner Z" (spec §4.2.5).
pub type OutcomeVector = Vec<(PlayerId, u16)>;

#[derive(Debug, Clone)]
pub struct ClassResult {
    pub outcome: OutcomeVector,
    pub cumulative_weight: f64,
    pub exemplar_fight_index: usize,
}

/// Aggregates an entire batch of fights (spec §3.4 `ResultList`,
/// §4.2.5 `addResult`).
#[derive(Debug, Clone, Default)]
pub struct ResultList {
    cumulative_weight: f64,
    total_weight: f64,
    num_battles: u32,
    units: Vec<UnitResult>,
    classes: Vec<ClassResult>,
    last_class_index: Option<usize>,
    fights: Vec<FightResult>,
}

impl ResultList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cumulative_weight(&self) -> f64 {
        self.cumulative_weight
    }

    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    pub fn num_battles(&self) -> u32 {
        self.num_battles
    }

    pub fn unit(&self, index: usize) -> Option<&UnitResult> {
        self.units.get(index)
    }

    pub fn classes(&self) -> &[ClassResult] {
        &self.classes
    }

    pub fn last_class_result_index(&self) -> Option<usize> {
        self.last_class_index
    }

    pub fn fight(&self, index: usize) -> Option<&FightResult> {
        self.fights.get(index)
    }

    /// Incorporates a single fight. `old_state`/`new_state` are in
    /// lock-step over the same ship order.
    pub fn add_result(&mut self, old_state: &Setup, new_state: &Setup, stats: &[Statistic], result: FightResult) {
        self.cumulative_weight += result.weight;
        self.total_weight = self.total_weight.max(self.cumulative_weight);
        self.num_battles += 1;
        let fight_index = self.fights.len();

        if self.units.len() < old_state.ships.len() {
            self.units.resize(old_state.ships.len(), UnitResult::default());
        }

        let alive_owners: std::collections::BTreeSet<PlayerId> = new_state.alive_ships().map(|s| s.owner).collect();
        let sole_winner = (alive_owners.len() == 1).then(|| *alive_owners.iter().next().unwrap());

        for (i, (before, after)) in old_state.ships.iter().zip(new_state.ships.iter()).enumerate() {
            let unit = &mut self.units[i];
            unit.fights += 1;
            if after.is_alive() && sole_winner == Some(after.owner) {
                unit.won += 1;
            }
            if after.owner != before.owner && after.is_alive() {
                unit.captured += 1;
            }
            unit.damage_taken.update(after.damage as f64, fight_index);
            unit.shields_remaining.update(after.shields as f64, fight_index);
            let fighters_lost = before.fighter_count.saturating_sub(after.fighter_count);
            unit.fighters_lost.update(fighters_lost as f64, fight_index);
            if let Some(stat) = stats.get(i) {
                unit.torps_fired.update(stat.torpedo_hits_dealt as f64, fight_index);
            }
        }

        let outcome = outcome_vector(new_state);
        match self.classes.iter_mut().position(|c| c.outcome == outcome) {
            Some(idx) => {
                self.classes[idx].cumulative_weight += result.weight;
                self.last_class_index = Some(idx);
            }
            None => {
                self.classes.push(ClassResult { outcome, cumulative_weight: result.weight, exemplar_fight_index: fight_index });
                self.last_class_index = Some(self.classes.len() - 1);
            }
        }
        self.classes.sort_by(|a, b| b.cumulative_weight.partial_cmp(&a.cumulative_weight).unwrap());
        // re-resolve last_class_index after the weight-descending re-sort
        if let Some(last) = &mut self.last_class_index {
            let moved_outcome = self.classes.iter().enumerate().max_by(|a, b| {
                let a_is_new = a.1.exemplar_fight_index == fight_index;
                let b_is_new = b.1.exemplar_fight_index == fight_index;
                a_is_new.cmp(&b_is_new)
            });
            if let Some((idx, _)) = moved_outcome {
                *last = idx;
            }
        }

        self.fights.push(result);
    }
}

fn outcome_vector(state: &Setup) -> OutcomeVector {
    let mut counts: Vec<(PlayerId, u16)> = Vec::new();
    for ship in state.alive_ships().filter(|s| s.is_capital_ship()) {
        match counts.iter_mut().find(|(owner, _)| *owner == ship.owner) {
            Some((_, n)) => *n += 1,
            None => counts.push((ship.owner, 1)),
        }
    }
    if let Some(planet) = &state.planet {
        counts.push((planet.owner, 0));
    }
    counts.sort_by_key(|(owner, _)| *owner);
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::ship::Aggressiveness;
    use crate::sim::setup::SimShip;

    fn ship(id: usize, owner: PlayerId, damage: u8) -> SimShip {
        SimShip {
            id,
            name: format!("s{id}"),
            friendly_code: "???".to_string(),
            owner,
            hull_type: 1,
            engine_type: 1,
            beam_type: 1,
            beam_count: 1,
            torpedo_type: 0,
            launcher_count: 0,
            ammo: 0,
            bay_count: 0,
            fighter_count: 0,
            damage,
            shields: 100,
            crew: 10,
            mass: 100,
            aggressiveness: Aggressiveness::Kill,
            intercept_id: None,
            is_flak_enabled: false,
            is_commander: false,
            experience_level: 0,
            randomize_fcode_every_fight: false,
            randomize_fcode_once_per_batch: false,
        }
    }

    #[test]
    fn cumulative_weight_matches_sum_of_fight_weights() {
        let before = Setup { ships: vec![ship(1, 1, 0), ship(2, 2, 0)], planet: None };
        let mut list = ResultList::new();
        let mut total = 0.0;
        for i in 0..5 {
            let mut after = before.clone();
            after.ships[1].damage = 100;
            let weight = 10.0 + i as f64;
            total += weight;
            let sample = BattleSample { setup_before: before.clone(), setup_after: after.clone(), stats: vec![Statistic::default(); 2] };
            list.add_result(
                &before,
                &after,
                &[Statistic::default(); 2],
                FightResult { weight, seed: i, series_length: 1, series_index: i as u32, sample },
            );
        }
        assert_eq!(list.cumulative_weight(), total);
        assert_eq!(list.num_battles(), 5);
    }

    #[test]
    fn single_outcome_collapses_to_one_class_result() {
        let before = Setup { ships: vec![ship(1, 8, 0), ship(2, 1, 0)], planet: None };
        let mut list = ResultList::new();
        for _ in 0..3 {
            let mut after = before.clone();
            after.ships[1].damage = 100;
            let sample = BattleSample { setup_before: before.clone(), setup_after: after.clone(), stats: vec![Statistic::default(); 2] };
            list.add_result(
                &before,
                &after,
                &[Statistic::default(); 2],
                FightResult { weight: 1.0, seed: 0, series_length: 1, series_index: 0, sample },
            );
        }
        assert_eq!(list.classes().len(), 1);
        assert_eq!(list.classes()[0].cumulative_weight, 3.0);
    }
}
