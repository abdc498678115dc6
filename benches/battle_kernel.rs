criterion::criterion_main!(benches);
criterion::criterion_group! {
    name = benches;
    config = criterion::Criterion::default()
        .without_plots()
        .noise_threshold(3.0)
        .significance_level(0.01)
        .sample_size(20)
        .measurement_time(std::time::Duration::from_secs(2));
    targets =
        single_fight_gorbie_vs_outriders,
        serial_series_of_a_thousand_fights,
        parallel_series_of_a_thousand_fights,
}

use starturn::fcode::FriendlyCodeList;
use starturn::map::ship::Aggressiveness;
use starturn::sim::{Configuration, Mode, Options, ParallelRunner, RunLimit, Runner, SerialRunner, SharedSetup, Setup, SimShip, new_stopper, prepare_simulation, run_simulation};
use rand::SeedableRng;
use rand::rngs::SmallRng;

fn outrider(id: usize, owner: u8) -> SimShip {
    SimShip {
        id,
        name: format!("outrider-{id}"),
        friendly_code: "???".to_string(),
        owner,
        hull_type: 2,
        engine_type: 9,
        beam_type: 3,
        beam_count: 2,
        torpedo_type: 0,
        launcher_count: 0,
        ammo: 0,
        bay_count: 0,
        fighter_count: 0,
        damage: 0,
        shields: 60,
        crew: 40,
        mass: 65,
        aggressiveness: Aggressiveness::Kill,
        intercept_id: None,
        is_flak_enabled: false,
        is_commander: false,
        experience_level: 0,
        randomize_fcode_every_fight: false,
        randomize_fcode_once_per_batch: false,
    }
}

fn gorbie(id: usize, owner: u8) -> SimShip {
    SimShip { name: "gorbie".to_string(), hull_type: 77, beam_type: 10, beam_count: 10, bay_count: 10, fighter_count: 250, shields: 300, crew: 2287, mass: 980, ..outrider(id, owner) }
}

fn shared_setup(ships: Vec<SimShip>, seed: u64, series_length: u32) -> SharedSetup {
    SharedSetup {
        base: Setup { ships, planet: None },
        opts: Options::default(),
        fcodes: FriendlyCodeList::new(),
        config: Configuration { mode: Mode::VcrHost, ..Configuration::default() },
        parent_seed: seed,
        series_length,
    }
}

fn single_fight_gorbie_vs_outriders(c: &mut criterion::Criterion) {
    let ships = vec![gorbie(1, 8), outrider(2, 1), outrider(3, 1), outrider(4, 1)];
    let fcodes = FriendlyCodeList::new();
    let config = Configuration { mode: Mode::VcrHost, ..Configuration::default() };
    c.bench_function("run one gorbie-vs-outriders fight", |b| {
        b.iter(|| {
            let mut rng = SmallRng::seed_from_u64(1);
            let mut setup = Setup { ships: ships.clone(), planet: None };
            prepare_simulation(&mut setup, &fcodes, config.mode, &mut rng);
            run_simulation(&mut setup, Options::default(), &fcodes, config, 1, 0, 1, &mut rng)
        })
    });
}

fn serial_series_of_a_thousand_fights(c: &mut criterion::Criterion) {
    let ships = vec![outrider(1, 1), outrider(2, 1), outrider(3, 1), outrider(4, 2), outrider(5, 2), outrider(6, 2)];
    c.bench_function("serial series of 1000 fights", |b| {
        b.iter(|| {
            let mut runner = SerialRunner::new(shared_setup(ships.clone(), 77, 1000));
            runner.init().unwrap();
            runner.run(RunLimit::Finite(999), &new_stopper());
            runner.results().num_battles()
        })
    });
}

fn parallel_series_of_a_thousand_fights(c: &mut criterion::Criterion) {
    let ships = vec![outrider(1, 1), outrider(2, 1), outrider(3, 1), outrider(4, 2), outrider(5, 2), outrider(6, 2)];
    c.bench_function("parallel (4-worker) series of 1000 fights", |b| {
        b.iter(|| {
            let mut runner = ParallelRunner::new(shared_setup(ships.clone(), 77, 1000), 4);
            runner.init().unwrap();
            runner.run(RunLimit::Finite(999), &new_stopper());
            runner.results().num_battles()
        })
    });
}
