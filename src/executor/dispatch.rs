//! Single-consumer event queue
//!
//! Producers push [`Inbound`] messages into a bounded channel; exactly one
//! task owns the [`CliInterface`] and applies them in delivery order.

use anyhow::{Context, Result};
use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::interface::{CliInterface, HookError, ResultCounters, ShutdownNotice};
use crate::models::{Envelope, JobEnd};
use crate::output::{PrintSink, RunSummary};

/// Default queue depth
pub const DEFAULT_CAPACITY: usize = 1024;

/// Messages accepted by the consumer task
#[derive(Clone, Debug, PartialEq)]
pub enum Inbound {
    /// Envelope from a worker, reporter or debugger
    Message(Envelope),
    /// Job completion from the scheduler
    JobEnd(JobEnd),
    /// Failure raised by a framework hook
    HookError(HookError),
    /// OS interrupt
    Interrupt,
    /// Flush reporters, print the summary and stop
    Finalise,
}

/// One line of a replay file
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ReplayRecord {
    Message(Envelope),
    JobEnd(JobEnd),
    HookError(HookError),
}

impl From<ReplayRecord> for Inbound {
    fn from(record: ReplayRecord) -> Self {
        match record {
            ReplayRecord::Message(envelope) => Inbound::Message(envelope),
            ReplayRecord::JobEnd(end) => Inbound::JobEnd(end),
            ReplayRecord::HookError(error) => Inbound::HookError(error),
        }
    }
}

/// Decode one replay line; blank lines yield `None`
pub fn decode_record(line: &str) -> Result<Option<ReplayRecord>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    serde_json::from_str(line)
        .map(Some)
        .context("Failed to decode replay record")
}

/// Outcome of a finished run
#[derive(Clone, Debug, Serialize)]
pub struct RunReport {
    pub summary: RunSummary,
    pub counters: ResultCounters,
    /// Envelopes rejected as malformed
    pub rejected: usize,
    pub interrupts: u32,
}

impl RunReport {
    /// Process exit code derived from the counters
    pub fn exit_code(&self) -> i32 {
        if self.counters.failed > 0 {
            1
        } else {
            0
        }
    }
}

/// Handle to the consumer task
pub struct Dispatcher<S: PrintSink + 'static> {
    tx: mpsc::Sender<Inbound>,
    consumer: JoinHandle<(RunReport, CliInterface<S>)>,
}

impl<S: PrintSink + 'static> Dispatcher<S> {
    /// Move the interface into a consumer task
    pub fn spawn(interface: CliInterface<S>, capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let consumer = tokio::spawn(consume(interface, rx));
        Self { tx, consumer }
    }

    /// Additional producer handle
    pub fn sender(&self) -> mpsc::Sender<Inbound> {
        self.tx.clone()
    }

    pub async fn send(&self, message: Inbound) -> Result<()> {
        self.tx
            .send(message)
            .await
            .map_err(|_| anyhow::anyhow!("Interface queue closed"))
    }

    /// Push every record from a stream, in order
    pub async fn feed<St>(&self, records: St) -> Result<usize>
    where
        St: Stream<Item = ReplayRecord>,
    {
        let mut records = std::pin::pin!(records);
        let mut sent = 0;
        while let Some(record) = records.next().await {
            self.send(record.into()).await?;
            sent += 1;
        }
        debug!("Fed {} records to the interface", sent);
        Ok(sent)
    }

    /// Finalise the run and hand back the report and the interface
    pub async fn finish(self) -> Result<(RunReport, CliInterface<S>)> {
        // The consumer may already have stopped on an earlier Finalise
        let _ = self.tx.send(Inbound::Finalise).await;
        drop(self.tx);
        self.consumer.await.context("Interface task panicked")
    }
}

async fn consume<S: PrintSink>(
    mut interface: CliInterface<S>,
    mut rx: mpsc::Receiver<Inbound>,
) -> (RunReport, CliInterface<S>) {
    let mut rejected = 0;
    let mut interrupts = 0;

    while let Some(message) = rx.recv().await {
        match message {
            Inbound::Message(envelope) => {
                let name = envelope.name.clone();
                match interface.on_message(envelope) {
                    Ok(routed) => debug!("Routed {}: {:?}", name, routed),
                    Err(e) => {
                        rejected += 1;
                        warn!("Rejected envelope: {}", e);
                    }
                }
            }
            Inbound::JobEnd(end) => {
                interface.clear_job(end);
            }
            Inbound::HookError(error) => interface.log_hook_error(&error),
            Inbound::Interrupt => {
                interrupts += 1;
                if interface.sigint_trigger() == ShutdownNotice::Ignored {
                    debug!("Interrupt left to the debugger");
                }
            }
            Inbound::Finalise => break,
        }
    }

    let summary = interface.finalise();
    info!(
        "Run finished: {} passed, {} failed, {} retries",
        summary.passed, summary.failed, summary.retries
    );

    let report = RunReport {
        counters: interface.result(),
        summary,
        rejected,
        interrupts,
    };
    (report, interface)
}
