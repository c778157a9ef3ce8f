//! Retry classification
//!
//! Decides what a job completion means for the run. Scheduling the retry
//! itself is up to the caller.

use crate::models::JobStatus;

/// Terminal classification of a job completion
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Passed,
    Failed,
    /// The spec file will run again on a new job
    Retry,
    /// The job had no tests; never retried
    Skipped,
}

impl Outcome {
    /// Everything but a retry ends the spec file for good
    pub fn is_finished(&self) -> bool {
        !matches!(self, Outcome::Retry)
    }

    pub fn status(&self) -> JobStatus {
        match self {
            Outcome::Passed => JobStatus::Passed,
            Outcome::Failed => JobStatus::Failed,
            Outcome::Retry => JobStatus::Retrying,
            Outcome::Skipped => JobStatus::Skipped,
        }
    }
}

/// Result of classifying one completion
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Completion {
    pub outcome: Outcome,
    /// Retries used so far, for display only
    pub attempts_used: u32,
}

/// Per-spec-file retry budget
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retries: u32,
    delay_secs: u64,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, delay_secs: u64) -> Self {
        Self {
            max_retries,
            delay_secs,
        }
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    pub fn delay_secs(&self) -> u64 {
        self.delay_secs
    }

    /// Retries consumed given what the scheduler says is left
    pub fn attempts_used(&self, remaining: u32) -> u32 {
        self.max_retries.saturating_sub(remaining)
    }

    /// Classify a completion
    ///
    /// `skipped` marks jobs registered without tests; those never retry
    /// whatever budget the caller reports.
    pub fn classify(&self, passed: bool, remaining: u32, skipped: bool) -> Completion {
        let outcome = if skipped {
            Outcome::Skipped
        } else if passed {
            Outcome::Passed
        } else if remaining > 0 {
            Outcome::Retry
        } else {
            Outcome::Failed
        };

        Completion {
            outcome,
            attempts_used: self.attempts_used(remaining),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pass() {
        let c = RetryPolicy::new(2, 0).classify(true, 2, false);
        assert_eq!(c.outcome, Outcome::Passed);
        assert_eq!(c.attempts_used, 0);
    }

    #[test]
    fn test_pass_with_remaining_budget_is_not_retry() {
        let c = RetryPolicy::new(2, 0).classify(true, 1, false);
        assert_eq!(c.outcome, Outcome::Passed);
        assert_eq!(c.attempts_used, 1);
    }

    #[test]
    fn test_retry_then_fail() {
        let policy = RetryPolicy::new(2, 0);

        let first = policy.classify(false, 1, false);
        assert_eq!(first.outcome, Outcome::Retry);
        assert_eq!(first.attempts_used, 1);
        assert!(!first.outcome.is_finished());

        let last = policy.classify(false, 0, false);
        assert_eq!(last.outcome, Outcome::Failed);
        assert_eq!(last.attempts_used, 2);
        assert!(last.outcome.is_finished());
    }

    #[test]
    fn test_skipped_never_retries() {
        let c = RetryPolicy::new(3, 0).classify(false, 3, true);
        assert_eq!(c.outcome, Outcome::Skipped);
        assert!(c.outcome.is_finished());
    }

    #[test]
    fn test_attempts_saturate() {
        assert_eq!(RetryPolicy::new(1, 0).attempts_used(5), 0);
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(Outcome::Retry.status(), JobStatus::Retrying);
        assert_eq!(Outcome::Skipped.status(), JobStatus::Skipped);
    }
}
