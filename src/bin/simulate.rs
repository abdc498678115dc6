//! Battle simulator CLI.
//!
//! Loads a JSON scenario (a `Setup`: combatant ships plus an optional
//! defending planet), runs it through the Monte-Carlo battle series, and
//! prints the per-unit aggregate.

use clap::Parser;
use colored::Colorize;
use starturn::sim::{Configuration, Options, ParallelRunner, RunLimit, Runner, SerialRunner, SharedSetup, Setup, new_stopper};
use starturn::fcode::FriendlyCodeList;
use std::path::PathBuf;

#[derive(Parser)]
#[command(about = "Run a Monte-Carlo battle series over a fleet setup")]
struct Args {
    /// Scenario file: a JSON-encoded `Setup` (ships + optional planet).
    scenario: PathBuf,

    /// Number of fights to run.
    #[arg(long, default_value_t = 1000)]
    battles: u32,

    /// Parent RNG seed.
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Worker thread count; 0 runs single-threaded.
    #[arg(long, default_value_t = 0)]
    workers: usize,
}

fn main() {
    starturn::logging::init();
    let args = Args::parse();

    let text = match std::fs::read_to_string(&args.scenario) {
        Ok(t) => t,
        Err(e) => {
            log::error!("{}: {e}", args.scenario.display());
            std::process::exit(1);
        }
    };
    let setup: Setup = match serde_json::from_str(&text) {
        Ok(s) => s,
        Err(e) => {
            log::error!("{}: {e}", args.scenario.display());
            std::process::exit(1);
        }
    };

    let shared = SharedSetup {
        base: setup,
        opts: Options::default(),
        fcodes: FriendlyCodeList::new(),
        config: Configuration::default(),
        parent_seed: args.seed,
        series_length: args.battles,
    };

    let stopper = new_stopper();
    let results = if args.workers > 0 {
        let mut runner = ParallelRunner::new(shared, args.workers);
        if let Err(e) = runner.init() {
            log::error!("{e}");
            std::process::exit(1);
        }
        runner.run(RunLimit::SeriesLimit, &stopper);
        runner.results()
    } else {
        let mut runner = SerialRunner::new(shared);
        if let Err(e) = runner.init() {
            log::error!("{e}");
            std::process::exit(1);
        }
        runner.run(RunLimit::SeriesLimit, &stopper);
        runner.results()
    };

    println!("{} battles, cumulative weight {:.1}", results.num_battles(), results.cumulative_weight());
    for index in 0.. {
        let Some(unit) = results.unit(index) else { break };
        println!(
            "  unit {index}: {} fights, {} won, {} captured",
            unit.fights,
            unit.won.to_string().green(),
            unit.captured.to_string().red(),
        );
    }
}
