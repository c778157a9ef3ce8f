//! Job status tags
//!
//! Decoration (colour) is applied by the output layer; this is just the tag.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status rendered for a job
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum JobStatus {
    Running,
    Retrying,
    Passed,
    Failed,
    Skipped,
}

impl JobStatus {
    pub fn label(&self) -> &'static str {
        match self {
            JobStatus::Running => "RUNNING",
            JobStatus::Retrying => "RETRYING",
            JobStatus::Passed => "PASSED",
            JobStatus::Failed => "FAILED",
            JobStatus::Skipped => "SKIPPED",
        }
    }

    /// Whether this status ends a job attempt
    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobStatus::Running)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        assert_eq!(JobStatus::Running.to_string(), "RUNNING");
        assert_eq!(JobStatus::Retrying.to_string(), "RETRYING");
        assert_eq!(JobStatus::Skipped.label(), "SKIPPED");
    }

    #[test]
    fn test_terminal() {
        assert!(!JobStatus::Running.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
        assert!(JobStatus::Passed.is_terminal());
    }
}
