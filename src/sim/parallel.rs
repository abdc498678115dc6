use crate::CoreError;
use crate::map::signal::Signal;
use crate::sim::job::{SharedSetup, make_job, run_job};
use crate::sim::result::ResultList;
use crate::sim::runner::{RunLimit, Runner, Stopper};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::JoinHandle;

/// Posted `n` times per `run`, once per fight each worker is allowed to
/// claim before returning to idle — the Rust rendering of the source's
/// semaphore pair (spec §4.2.6); no teacher precedent for semaphores, so
/// this is grounded directly on `original_source/game/sim/parallelrunner.cpp`
/// and `util/stopsignal.hpp`.
#[derive(Default)]
struct CountingLatch {
    count: Mutex<u32>,
    cv: Condvar,
}

impl CountingLatch {
    fn post_n(&self, n: u32) {
        let mut count = self.count.lock().unwrap();
        *count += n;
        self.cv.notify_all();
    }

    fn wait_one(&self) {
        let mut count = self.count.lock().unwrap();
        while *count == 0 {
            count = self.cv.wait(count).unwrap();
        }
        *count -= 1;
    }
}

struct RunRequest {
    limit: RunLimit,
    start_count: u32,
    stopper: Stopper,
}

struct Shared {
    shared_setup: Arc<SharedSetup>,
    results: Mutex<ResultList>,
    next_serial: Mutex<u64>,
    series_length: u32,
    current_request: Mutex<Option<RunRequest>>,
    start_signal: CountingLatch,
    stop_signal: CountingLatch,
    terminate: AtomicBool,
}

fn limit_reached(limit: RunLimit, start_count: u32, current_count: u32, series_length: u32) -> bool {
    match limit {
        RunLimit::Finite(n) => current_count >= start_count + n,
        RunLimit::NoLimit => false,
        RunLimit::SeriesLimit => series_length > 0 && current_count % series_length == 0 && current_count > start_count,
    }
}

/// Claims the next job serial and its job under the counter mutex
/// (spec §4.2.3: "`makeJob`... must execute under a mutex"), or `None`
/// when the active request's limit/stopper says to stop.
fn claim_next_job(shared: &Shared) -> Option<crate::sim::job::Job> {
    let request = shared.current_request.lock().unwrap();
    let request = request.as_ref()?;
    if request.stopper.load(Ordering::Relaxed) {
        return None;
    }
    let current_count = shared.results.lock().unwrap().num_battles();
    if limit_reached(request.limit, request.start_count, current_count, shared.series_length) {
        return None;
    }
    let mut serial = shared.next_serial.lock().unwrap();
    let this_serial = *serial;
    *serial += 1;
    let series_index = (this_serial % shared.series_length.max(1) as u64) as u32;
    Some(make_job(&shared.shared_setup, this_serial, series_index))
}

fn worker_loop(shared: Arc<Shared>) {
    loop {
        shared.start_signal.wait_one();
        if shared.terminate.load(Ordering::Relaxed) {
            return;
        }
        loop {
            let Some(job) = claim_next_job(&shared) else { break };
            let output = run_job(job);
            // finishJob: incorporating a fight result into the shared
            // aggregate must execute under a mutex (spec §4.2.3).
            let mut results = shared.results.lock().unwrap();
            results.add_result(output.setup_before(), output.setup_after(), &output.stats, output.result);
        }
        shared.stop_signal.post_n(1);
    }
}

/// Multi-threaded `Runner`. Spins up `num_workers` threads at construction
/// and joins them on drop (spec §9 "Thread-pool lifetime": fixed worker
/// count for the runner's life, no lazy pool creation).
pub struct ParallelRunner {
    shared: Arc<Shared>,
    workers: Vec<JoinHandle<()>>,
    num_workers: u32,
    update_signal: Signal<()>,
}

impl ParallelRunner {
    pub fn new(shared_setup: SharedSetup, num_workers: usize) -> Self {
        let num_workers = num_workers.max(1);
        let series_length = shared_setup.series_length;
        let shared = Arc::new(Shared {
            shared_setup: Arc::new(shared_setup),
            results: Mutex::new(ResultList::new()),
            next_serial: Mutex::new(0),
            series_length,
            current_request: Mutex::new(None),
            start_signal: CountingLatch::default(),
            stop_signal: CountingLatch::default(),
            terminate: AtomicBool::new(false),
        });
        let workers = (0..num_workers)
            .map(|_| {
                let shared = Arc::clone(&shared);
                std::thread::spawn(move || worker_loop(shared))
            })
            .collect();
        Self { shared, workers, num_workers: num_workers as u32, update_signal: Signal::default() }
    }

    fn run_batch(&mut self, limit: RunLimit, stopper: &Stopper) {
        let start_count = self.shared.results.lock().unwrap().num_battles();
        {
            let mut request = self.shared.current_request.lock().unwrap();
            *request = Some(RunRequest { limit, start_count, stopper: Arc::clone(stopper) });
        }
        self.shared.start_signal.post_n(self.num_workers);
        for _ in 0..self.num_workers {
            self.shared.stop_signal.wait_one();
        }
        self.update_signal.emit(&());
    }

    /// Signals termination and wakes every worker so it can notice and
    /// exit (spec §4.2.6 `stop()`).
    pub fn stop(&mut self) {
        self.shared.terminate.store(true, Ordering::Relaxed);
        self.shared.start_signal.post_n(self.num_workers);
    }
}

impl Runner for ParallelRunner {
    fn results(&self) -> ResultList {
        self.shared.results.lock().unwrap().clone()
    }

    fn init(&mut self) -> Result<(), CoreError> {
        let stopper = crate::sim::runner::new_stopper();
        self.run_batch(RunLimit::Finite(1), &stopper);
        if self.shared.results.lock().unwrap().num_battles() == 0 {
            return Err(CoreError::Assertion("simulation produced no battles".to_string()));
        }
        Ok(())
    }

    fn run(&mut self, limit: RunLimit, stopper: &Stopper) {
        self.run_batch(limit, stopper);
    }

    fn on_update(&mut self) -> &mut Signal<()> {
        &mut self.update_signal
    }
}

impl Drop for ParallelRunner {
    fn drop(&mut self) {
        self.stop();
        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
    }
}
