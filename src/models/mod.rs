//! Data models for run orchestration
//!
//! This module contains the payloads exchanged between workers, the dispatch
//! layer and the interface.

#![allow(dead_code)]

mod envelope;
mod job;
mod snapshot;
mod status;

pub use envelope::{Envelope, ErrorDetails, TestErrorPayload};
pub use job::{Job, JobEnd, JobStart, UNKNOWN_RUNNER};
pub use snapshot::{SnapshotResult, SnapshotSummary};
pub use status::JobStatus;
