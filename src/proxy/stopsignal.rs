//! A fresh cancellation flag per batch (spec §4.4 "Cancellation"). Each
//! `runFinite`/`runInfinite`/`runSeries` call allocates a new
//! `StopSignal` and hands out clones by shared ownership; `stop()` flags
//! it and the proxy drops its own reference, so a rapid
//! run→stop→run sequence never lets the first run's stop bleed into the
//! second (each run carries its own signal).

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Clone, Default)]
pub struct StopSignal {
    flag: Arc<AtomicBool>,
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_set(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    /// Bridges to `sim::Stopper`, which is the same `Arc<AtomicBool>`
    /// shape: the sim runner's `run` loop polls this directly.
    pub fn as_stopper(&self) -> crate::sim::Stopper {
        self.flag.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distinct_signals_never_cross_contaminate() {
        let first = StopSignal::new();
        let second = StopSignal::new();
        first.set();
        assert!(first.is_set());
        assert!(!second.is_set());
    }

    #[test]
    fn clones_observe_the_same_flag() {
        let signal = StopSignal::new();
        let clone = signal.clone();
        clone.set();
        assert!(signal.is_set());
    }
}
