//! Snapshot aggregation
//!
//! The interface feeds one [`SnapshotResult`] per test file into a
//! [`SnapshotAggregator`] and reads the totals back when printing the summary.

#![allow(dead_code)]

use tracing::debug;

use crate::models::{SnapshotResult, SnapshotSummary};

/// Accumulates per-file snapshot outcomes
pub trait SnapshotAggregator: Send {
    /// Record the outcome for one test file
    fn record_result(&mut self, result: SnapshotResult);

    /// Totals across every recorded file
    fn summary(&self) -> SnapshotSummary;
}

/// Default aggregator: sums the counts reported by the snapshot engine
#[derive(Debug, Default)]
pub struct SnapshotManager {
    summary: SnapshotSummary,
    files: usize,
}

impl SnapshotManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of files recorded so far
    pub fn files(&self) -> usize {
        self.files
    }
}

impl SnapshotAggregator for SnapshotManager {
    fn record_result(&mut self, result: SnapshotResult) {
        debug!(
            "Snapshot result for {}: +{} ~{} !{} ?{}",
            result.filepath, result.added, result.updated, result.unmatched, result.unchecked
        );
        self.files += 1;
        self.summary.added += result.added;
        self.summary.updated += result.updated;
        self.summary.unmatched += result.unmatched;
        self.summary.unchecked += result.unchecked;
    }

    fn summary(&self) -> SnapshotSummary {
        self.summary
    }
}
