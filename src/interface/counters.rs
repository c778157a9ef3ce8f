//! Run-wide result counters
//!
//! `total_workers - retries == finished` once every job has completed, and
//! `passed + failed <= finished` holds at every point.

use serde::Serialize;

use super::retry::Outcome;

/// Counters derived from job completions
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ResultCounters {
    pub finished: u32,
    pub passed: u32,
    pub failed: u32,
    pub retries: u32,
}

/// Owns the counters plus the worker and skip totals
#[derive(Clone, Debug)]
pub struct ResultAccumulator {
    counters: ResultCounters,
    total_workers: u32,
    skipped: u32,
}

impl ResultAccumulator {
    pub fn new(total_workers: u32) -> Self {
        Self {
            counters: ResultCounters::default(),
            total_workers,
            skipped: 0,
        }
    }

    pub fn counters(&self) -> ResultCounters {
        self.counters
    }

    /// Workers including those spawned for retries
    pub fn total_workers(&self) -> u32 {
        self.total_workers
    }

    /// Jobs registered without tests
    pub fn skipped(&self) -> u32 {
        self.skipped
    }

    /// Distinct spec-file jobs, excluding retried attempts
    pub fn total_jobs(&self) -> u32 {
        self.total_workers.saturating_sub(self.counters.retries)
    }

    pub fn record_skipped_registration(&mut self) {
        self.skipped += 1;
    }

    /// Apply one classified completion
    pub fn record(&mut self, outcome: Outcome) {
        if outcome.is_finished() {
            self.counters.finished += 1;
        }

        match outcome {
            Outcome::Passed => self.counters.passed += 1,
            Outcome::Failed => self.counters.failed += 1,
            Outcome::Retry => {
                self.total_workers += 1;
                self.counters.retries += 1;
            }
            Outcome::Skipped => {}
        }
    }

    /// Zero the completion counters; worker and skip totals carry over
    pub fn reset_counters(&mut self) {
        self.counters = ResultCounters::default();
    }
}
