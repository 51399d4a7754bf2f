//! Timing metrics collected during a run.
//!
//! A [`MetricsCollector`] is created by the caller and passed to whatever
//! needs to record into it. There is no process-wide registry.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// Time spent writing intake results.
pub const INTAKE_WRITE: &str = "intake.file_write.time";
/// Time spent appending clean results to the running output file.
pub const ADDRESS_UPDATE_WRITE: &str = "addrupdate.file_write.time";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TimerStats {
    pub count: u64,
    pub total: Duration,
    pub min: Duration,
    pub max: Duration,
}

impl TimerStats {
    fn update(&mut self, elapsed: Duration) {
        if self.count == 0 || elapsed < self.min {
            self.min = elapsed;
        }
        if elapsed > self.max {
            self.max = elapsed;
        }
        self.count += 1;
        self.total += elapsed;
    }

    pub fn mean(&self) -> Duration {
        match u32::try_from(self.count) {
            Ok(0) => Duration::ZERO,
            Ok(count) => self.total / count,
            Err(_) => Duration::from_secs_f64(self.total.as_secs_f64() / self.count as f64),
        }
    }
}

#[derive(Debug, Default)]
pub struct MetricsCollector {
    timers: Mutex<BTreeMap<&'static str, TimerStats>>,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, name: &'static str, elapsed: Duration) {
        self.timers.lock().entry(name).or_default().update(elapsed);
    }

    /// Runs `f` and records how long it took under `name`.
    pub fn time<T>(&self, name: &'static str, f: impl FnOnce() -> T) -> T {
        let start: Instant = Instant::now();
        let result: T = f();
        self.record(name, start.elapsed());
        result
    }

    pub fn timer(&self, name: &str) -> Option<TimerStats> {
        self.timers.lock().get(name).copied()
    }

    /// All timers, sorted by name.
    pub fn snapshot(&self) -> Vec<(&'static str, TimerStats)> {
        self.timers
            .lock()
            .iter()
            .map(|(name, stats)| (*name, *stats))
            .collect()
    }
}
