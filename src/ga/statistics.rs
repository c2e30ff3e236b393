//! Run statistics and the observer contract.
//!
//! The driver updates one [`Statistics`] value per completed generation and
//! pushes it to every registered [`Observer`]. Observers decide what to do
//! with it; [`TracingObserver`] emits a `tracing` event every few
//! generations.

use std::time::Duration;
use tracing::info;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Snapshot of one completed generation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GenerationRecord {
    /// 1-based generation number.
    pub generation_index: usize,
    /// Best fitness evaluated in this generation.
    pub best_achieved_fitness: f64,
    /// Mean fitness evaluated in this generation.
    pub mean_fitness: f64,
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum StopReason {
    /// The configured number of generations completed.
    GenerationLimit,
    /// Best fitness reached the configured cap.
    FitnessCap,
    /// Wall-clock time ran out.
    TimeLimit,
}

/// Statistics for a single algorithm run. Reset at the start of every run.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Statistics {
    best_achieved_fitness: f64,
    elapsed: Duration,
    last_generation: GenerationRecord,
    gather_history: bool,
    history: Vec<GenerationRecord>,
    stop_reason: Option<StopReason>,
}

impl Statistics {
    /// Creates empty statistics; `gather_history` keeps every generation record.
    pub fn new(gather_history: bool) -> Self {
        Self {
            gather_history,
            ..Self::default()
        }
    }

    pub(crate) fn reset(&mut self, gather_history: bool, capacity_hint: usize) {
        *self = Self::new(gather_history);
        if gather_history {
            self.history.reserve(capacity_hint);
        }
    }

    pub(crate) fn record_generation(&mut self, record: GenerationRecord, elapsed: Duration) {
        self.best_achieved_fitness = record.best_achieved_fitness;
        self.elapsed = elapsed;
        self.last_generation = record;
        if self.gather_history {
            self.history.push(record);
        }
    }

    pub(crate) fn set_stop_reason(&mut self, reason: StopReason) {
        self.stop_reason = Some(reason);
    }

    /// Best fitness reported by the latest generation.
    pub fn best_achieved_fitness(&self) -> f64 {
        self.best_achieved_fitness
    }

    /// Wall-clock time since the run started, as of the latest generation.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// [`elapsed`](Self::elapsed) in whole milliseconds.
    pub fn milliseconds_passed(&self) -> u128 {
        self.elapsed.as_millis()
    }

    /// The most recent generation record.
    pub fn last_generation(&self) -> &GenerationRecord {
        &self.last_generation
    }

    /// Number of completed generations.
    pub fn generations(&self) -> usize {
        self.last_generation.generation_index
    }

    /// Every generation record, oldest first. Empty unless history is gathered.
    pub fn history(&self) -> &[GenerationRecord] {
        &self.history
    }

    /// Whether per-generation history is being gathered.
    pub fn gathers_history(&self) -> bool {
        self.gather_history
    }

    /// Why the last run stopped, once it has.
    pub fn stop_reason(&self) -> Option<StopReason> {
        self.stop_reason
    }
}

/// Receives a statistics snapshot after every completed generation.
///
/// Any `FnMut(&Statistics)` closure is an observer.
pub trait Observer {
    fn on_generation(&mut self, stats: &Statistics);
}

impl<F> Observer for F
where
    F: FnMut(&Statistics),
{
    fn on_generation(&mut self, stats: &Statistics) {
        self(stats)
    }
}

/// Logs progress through `tracing` every `every` generations.
#[derive(Debug, Clone)]
pub struct TracingObserver {
    every: usize,
    counter: usize,
}

impl TracingObserver {
    /// Logs once per `every` generations (at least 1).
    pub fn new(every: usize) -> Self {
        Self {
            every: every.max(1),
            counter: 0,
        }
    }

    /// Logging interval in generations.
    pub fn every(&self) -> usize {
        self.every
    }
}

impl Default for TracingObserver {
    fn default() -> Self {
        Self::new(5)
    }
}

impl Observer for TracingObserver {
    fn on_generation(&mut self, stats: &Statistics) {
        self.counter += 1;
        if self.counter < self.every {
            return;
        }
        self.counter = 0;

        let record = stats.last_generation();
        info!(
            generation = record.generation_index,
            best_fitness = record.best_achieved_fitness,
            mean_fitness = record.mean_fitness,
            elapsed_ms = stats.milliseconds_passed() as u64,
            "generation completed"
        );
    }
}
