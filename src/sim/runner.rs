use crate::CoreError;
use crate::map::signal::Signal;
use crate::sim::job::{SharedSetup, make_job, run_job};
use crate::sim::result::ResultList;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Shared cancellation flag threaded through a `run` call (spec §4.4
/// "Cancellation": a fresh one is allocated per batch so a stopped run
/// can never bleed into the next).
pub type Stopper = Arc<AtomicBool>;

pub fn new_stopper() -> Stopper {
    Arc::new(AtomicBool::new(false))
}

/// How long a `run` call is allowed to keep producing jobs (spec §4.2.3).
#[derive(Debug, Clone, Copy)]
pub enum RunLimit {
    Finite(u32),
    NoLimit,
    SeriesLimit,
}

/// The batch abstraction (spec §4.2.3). `SerialRunner` and `ParallelRunner`
/// both implement it against the same `Job` plumbing.
pub trait Runner {
    /// A snapshot of the aggregate so far. Owned rather than borrowed:
    /// `ParallelRunner` keeps its `ResultList` behind a mutex shared with
    /// worker threads, so there is no `&ResultList` that could outlive a
    /// lock guard.
    fn results(&self) -> ResultList;

    /// Runs the first fight. Guarantees `results().num_battles() >= 1`
    /// on success; records the series length.
    fn init(&mut self) -> Result<(), CoreError>;

    fn run(&mut self, limit: RunLimit, stopper: &Stopper);

    /// Registers a listener for the throttled progress signal
    /// (spec §4.2.3 `sig_update`).
    fn on_update(&mut self) -> &mut Signal<()>;
}

fn limit_reached(limit: RunLimit, start_count: u32, current_count: u32, series_length: u32) -> bool {
    match limit {
        RunLimit::Finite(n) => current_count >= start_count + n,
        RunLimit::NoLimit => false,
        RunLimit::SeriesLimit => series_length > 0 && current_count % series_length == 0 && current_count > start_count,
    }
}

/// Single-threaded reference `Runner`. Grounded on the same
/// make-job/run-job/finish-job shape `ParallelRunner` uses, just without
/// the thread pool — used both directly and as the baseline serial
/// runner § 8.1 item 6 compares against.
pub struct SerialRunner {
    shared: Arc<SharedSetup>,
    next_serial: u64,
    results: ResultList,
    series_length: u32,
    update_signal: Signal<()>,
    last_update: Option<Instant>,
    update_interval: Duration,
}

impl SerialRunner {
    pub fn new(shared: SharedSetup) -> Self {
        let series_length = shared.series_length;
        Self {
            shared: Arc::new(shared),
            next_serial: 0,
            results: ResultList::new(),
            series_length,
            update_signal: Signal::default(),
            last_update: None,
            update_interval: Duration::from_millis(crate::SIM_UPDATE_INTERVAL_MS),
        }
    }

    fn run_one(&mut self) {
        let job = make_job(&self.shared, self.next_serial, (self.next_serial % self.series_length.max(1) as u64) as u32);
        self.next_serial += 1;
        let output = run_job(job);
        self.results.add_result(output.setup_before(), output.setup_after(), &output.stats, output.result);
        self.maybe_emit_update();
    }

    fn maybe_emit_update(&mut self) {
        let now_due = match self.last_update {
            None => true,
            Some(last) => last.elapsed() >= self.update_interval,
        };
        if now_due {
            self.update_signal.emit(&());
            self.last_update = Some(Instant::now());
        }
    }
}

impl Runner for SerialRunner {
    fn results(&self) -> ResultList {
        self.results.clone()
    }

    fn init(&mut self) -> Result<(), CoreError> {
        self.run_one();
        if self.results.num_battles() == 0 {
            return Err(CoreError::Assertion("simulation produced no battles".to_string()));
        }
        Ok(())
    }

    fn run(&mut self, limit: RunLimit, stopper: &Stopper) {
        let start_count = self.results.num_battles();
        loop {
            if stopper.load(Ordering::Relaxed) {
                break;
            }
            if limit_reached(limit, start_count, self.results.num_battles(), self.series_length) {
                break;
            }
            self.run_one();
        }
    }

    fn on_update(&mut self) -> &mut Signal<()> {
        &mut self.update_signal
    }
}
