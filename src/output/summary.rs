//! End-of-run summary data

use serde::Serialize;
use std::time::Duration;

use crate::config::Shard;
use crate::models::SnapshotSummary;

/// Snapshot of run state taken when printing the summary
#[derive(Clone, Debug, Default, Serialize)]
pub struct RunSummary {
    pub passed: u32,
    pub failed: u32,
    pub retries: u32,
    pub skipped: u32,
    pub finished: u32,
    /// Worker count excluding retried attempts
    pub total_jobs: u32,
    pub elapsed: Duration,
    pub shard: Option<Shard>,
    pub snapshots: SnapshotSummary,
}

impl RunSummary {
    /// Finished jobs as a rounded percentage of `total_jobs`
    pub fn percent_completed(&self) -> u32 {
        if self.total_jobs == 0 {
            0
        } else {
            (f64::from(self.finished) / f64::from(self.total_jobs) * 100.0).round() as u32
        }
    }

    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}
