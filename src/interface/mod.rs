//! Run interface
//!
//! [`CliInterface`] tracks every active job, classifies completions against
//! the retry budget, buffers reporter output and renders the final summary.
//! It is a single-writer state machine: feed it one event at a time from one
//! thread (see [`crate::executor`] for the queue that guarantees this).

#![allow(dead_code)]

mod bucket;
mod counters;
mod error;
mod registry;
mod retry;
mod router;
mod shutdown;

pub use bucket::{MessageBucket, Messages, Origin};
pub use counters::{ResultAccumulator, ResultCounters};
pub use error::{EnvelopeError, HookError};
pub use registry::JobRegistry;
pub use retry::{Completion, Outcome, RetryPolicy};
pub use shutdown::ShutdownNotice;

use std::io::IsTerminal;
use tracing::{debug, info};

use crate::config::RunConfig;
use crate::models::{JobEnd, JobStart, JobStatus};
use crate::output::{PrintSink, RunSummary, StatusFormatter, StdoutSink};
use crate::snapshot::{SnapshotAggregator, SnapshotManager};
use crate::utils::RunTimer;

/// Orchestrator state for one run
pub struct CliInterface<S: PrintSink = StdoutSink> {
    config: RunConfig,
    retry: RetryPolicy,
    formatter: StatusFormatter,
    sink: S,
    snapshots: Box<dyn SnapshotAggregator>,
    jobs: JobRegistry,
    results: ResultAccumulator,
    messages: MessageBucket,
    timer: RunTimer,
    in_debug_mode: bool,
}

impl CliInterface<StdoutSink> {
    /// Interface printing to stdout
    pub fn stdout(config: RunConfig) -> Self {
        Self::new(config, StdoutSink)
    }
}

impl<S: PrintSink> CliInterface<S> {
    /// Create the interface and print the start banner
    pub fn new(config: RunConfig, sink: S) -> Self {
        let colorize = config
            .color
            .unwrap_or_else(|| std::io::stdout().is_terminal());
        let formatter =
            StatusFormatter::new(colorize).with_retry_delay(config.spec_file_retries_delay);

        let mut interface = Self {
            retry: RetryPolicy::new(config.spec_file_retries, config.spec_file_retries_delay),
            results: ResultAccumulator::new(config.total_workers),
            formatter,
            sink,
            snapshots: Box::new(SnapshotManager::new()),
            jobs: JobRegistry::new(),
            messages: MessageBucket::new(),
            timer: RunTimer::start(),
            in_debug_mode: false,
            config,
        };
        interface.setup();
        interface.on_start();
        interface
    }

    /// Replace the snapshot aggregator
    pub fn with_snapshot_aggregator(mut self, aggregator: Box<dyn SnapshotAggregator>) -> Self {
        self.snapshots = aggregator;
        self
    }

    /// Replace the formatter (retry delay is kept in sync with the config)
    pub fn with_formatter(mut self, formatter: StatusFormatter) -> Self {
        self.formatter = formatter.with_retry_delay(self.config.spec_file_retries_delay);
        self
    }

    /// Reset the run: jobs, counters, buffers and the timer
    pub fn setup(&mut self) {
        self.jobs.clear();
        self.timer.reset();
        self.results.reset_counters();
        self.messages.reset();
    }

    /// Print the start banner
    pub fn on_start(&mut self) {
        let lines = self.formatter.start_banner(
            self.results.total_workers(),
            self.config.active_shard(),
            self.timer.started_at(),
            self.in_debug_mode,
            self.config.watch,
        );
        for line in lines {
            self.print(&line);
        }
    }

    /// Register a started job (`job:start`)
    pub fn add_job(&mut self, start: JobStart) {
        let (cid, job) = start.into_parts();

        if job.has_tests {
            let line = self.formatter.job_line(&cid, JobStatus::Running, Some(&job), 0);
            self.jobs.insert(cid, job);
            self.print(&line);
        } else {
            debug!("Skipping {}: no tests found in {:?}", cid, job.specs);
            self.results.record_skipped_registration();
            self.jobs.insert(cid, job);
        }
    }

    /// Record a job completion (`job:end`)
    pub fn clear_job(&mut self, end: JobEnd) -> Completion {
        let job = self.jobs.remove(&end.cid);
        let skipped = job.as_ref().is_some_and(|j| !j.has_tests);
        let completion = self.retry.classify(end.passed, end.retries, skipped);

        self.results.record(completion.outcome);

        let status = completion.outcome.status();
        if completion.outcome == Outcome::Skipped {
            let line = self.formatter.job_line(&end.cid, status, job.as_ref(), 0);
            info!("{}", line);
        } else {
            let line =
                self.formatter
                    .job_line(&end.cid, status, job.as_ref(), completion.attempts_used);
            self.print(&line);
        }

        completion
    }

    /// Print an error raised by a hook or the framework itself
    pub fn log_hook_error(&mut self, error: &(dyn std::error::Error + 'static)) {
        let text = self.formatter.hook_error(error);
        self.print(&text);
    }

    /// Print and drain buffered reporter output
    pub fn print_reporters(&mut self) {
        let reporter = self.messages.take_reporter();
        for (name, payloads) in reporter {
            self.print("");
            let header = self.formatter.reporter_header(&name);
            self.print(&header);
            self.print(&payloads.concat());
        }
    }

    /// Snapshot of the current run state
    pub fn summary(&self) -> RunSummary {
        let counters = self.results.counters();
        RunSummary {
            passed: counters.passed,
            failed: counters.failed,
            retries: counters.retries,
            skipped: self.results.skipped(),
            finished: counters.finished,
            total_jobs: self.results.total_jobs(),
            elapsed: self.timer.elapsed(),
            shard: self.config.active_shard(),
            snapshots: self.snapshots.summary(),
        }
    }

    /// Print the snapshot section and the run summary
    pub fn print_summary(&mut self) -> RunSummary {
        let summary = self.summary();
        let mut lines = self.formatter.snapshot_summary(&summary);
        lines.extend(self.formatter.run_summary(&summary));
        for line in lines {
            self.print(&line);
        }
        summary
    }

    /// Flush reporters, then print the summary
    pub fn finalise(&mut self) -> RunSummary {
        self.print_reporters();
        self.print_summary()
    }

    pub fn result(&self) -> ResultCounters {
        self.results.counters()
    }

    pub fn total_workers(&self) -> u32 {
        self.results.total_workers()
    }

    pub fn skipped(&self) -> u32 {
        self.results.skipped()
    }

    pub fn jobs(&self) -> &JobRegistry {
        &self.jobs
    }

    pub fn is_debug_mode(&self) -> bool {
        self.in_debug_mode
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Buffered debugger output, left in place for other surfaces
    pub fn debugger_messages(&self) -> &Messages {
        self.messages.debugger()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    fn print(&mut self, text: &str) {
        self.sink.print(text);
    }
}
