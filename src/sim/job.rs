use crate::fcode::FriendlyCodeList;
use crate::sim::config::{Configuration, Options};
use crate::sim::kernel::run_simulation;
use crate::sim::result::{FightResult, Statistic};
use crate::sim::setup::Setup;
use rand::RngCore;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::sync::Arc;

/// Everything a job needs that does not change across a batch. Shared
/// read-only across worker threads via `Arc`.
pub struct SharedSetup {
    pub base: Setup,
    pub opts: Options,
    pub fcodes: FriendlyCodeList,
    pub config: Configuration,
    pub parent_seed: u64,
    pub series_length: u32,
}

/// One unit of simulated work: a private `Setup` copy so concurrent jobs
/// never clobber each other (spec §4.2.3).
pub struct Job {
    pub serial: u64,
    pub series_index: u32,
    setup: Setup,
    shared: Arc<SharedSetup>,
}

pub struct JobOutput {
    pub stats: Vec<Statistic>,
    pub result: FightResult,
}

impl JobOutput {
    pub fn setup_before(&self) -> &Setup {
        &self.result.sample.setup_before
    }

    pub fn setup_after(&self) -> &Setup {
        &self.result.sample.setup_after
    }
}

/// Builds job `serial` against `shared`. Must be called under the
/// runner's mutex (spec §4.2.3: "`makeJob`... must execute under a
/// mutex").
pub fn make_job(shared: &Arc<SharedSetup>, serial: u64, series_index: u32) -> Job {
    Job { serial, series_index, setup: shared.base.clone(), shared: Arc::clone(shared) }
}

/// Runs `job` to completion. Safe to call concurrently across jobs —
/// no shared mutable state is touched (spec §4.2.3: "`runJob` may execute
/// in parallel").
pub fn run_job(mut job: Job) -> JobOutput {
    let seed = job.shared.parent_seed ^ job.serial;
    let mut rng = SmallRng::seed_from_u64(seed);
    rng.next_u64();

    let (stats, result) = run_simulation(
        &mut job.setup,
        job.shared.opts,
        &job.shared.fcodes,
        job.shared.config,
        job.shared.series_length,
        job.series_index,
        seed,
        &mut rng,
    );
    JobOutput { stats, result }
}
