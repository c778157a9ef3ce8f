//! Text formatting for interface output
//!
//! Everything here is pure: the interface decides when to print, the
//! formatter decides what the text looks like.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;

use super::RunSummary;
use crate::config::Shard;
use crate::interface::HookError;
use crate::models::{Envelope, Job, JobStatus, TestErrorPayload, UNKNOWN_RUNNER};
use crate::utils::format_hms;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const BLUE: &str = "\x1b[34m";
const MAGENTA: &str = "\x1b[35m";
const CYAN: &str = "\x1b[36m";
const GRAY: &str = "\x1b[90m";
const ERROR_BADGE: &str = "\x1b[1m\x1b[37m\x1b[41m";
const NOTICE_BADGE: &str = "\x1b[30m\x1b[43m";

const SHUTDOWN_IN_PROGRESS: &str =
    "Ending worker sessions gracefully ...\n(press ctrl+c again to hard kill the runner)";
const SHUTDOWN_COMPLETE: &str =
    "Ended worker sessions gracefully after a SIGINT signal was received!";

/// Formats status lines, failure blocks and summaries
#[derive(Clone, Debug)]
pub struct StatusFormatter {
    colorize: bool,
    cwd: Option<String>,
    retry_delay_secs: u64,
}

impl StatusFormatter {
    pub fn new(colorize: bool) -> Self {
        Self {
            colorize,
            cwd: std::env::current_dir()
                .ok()
                .map(|p| p.to_string_lossy().into_owned()),
            retry_delay_secs: 0,
        }
    }

    /// Directory prefix stripped from spec paths (`None` keeps paths intact)
    pub fn with_cwd(mut self, cwd: Option<String>) -> Self {
        self.cwd = cwd.filter(|c| !c.is_empty());
        self
    }

    /// Delay shown next to RETRYING lines
    pub fn with_retry_delay(mut self, secs: u64) -> Self {
        self.retry_delay_secs = secs;
        self
    }

    fn paint(&self, style: &str, text: &str) -> String {
        if self.colorize {
            format!("{style}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    /// Decorated status tag
    pub fn status_tag(&self, status: JobStatus) -> String {
        let tag = match status {
            JobStatus::Running => self.paint(&format!("{BOLD}{CYAN}"), status.label()),
            JobStatus::Retrying => self.paint(&format!("{BOLD}{YELLOW}"), status.label()),
            JobStatus::Passed => self.paint(&format!("{BOLD}{GREEN}"), status.label()),
            JobStatus::Failed => self.paint(&format!("{BOLD}{RED}"), status.label()),
            JobStatus::Skipped => status.label().to_string(),
        };

        if status == JobStatus::Retrying && self.retry_delay_secs > 0 {
            format!("{tag} after {}s", self.retry_delay_secs)
        } else {
            tag
        }
    }

    /// `- a.spec.js, b.spec.js` with the working directory stripped
    pub fn filenames(&self, specs: &[String]) -> String {
        if specs.is_empty() {
            return String::new();
        }
        let joined = specs.join(", ");
        let joined = match &self.cwd {
            Some(cwd) => joined.replace(cwd.as_str(), ""),
            None => joined,
        };
        format!("- {joined}")
    }

    /// `[cid] STATUS in <runner> - <specs> (<n> retries)`
    pub fn job_line(&self, cid: &str, status: JobStatus, job: Option<&Job>, retries: u32) -> String {
        let mut parts = vec![format!("[{cid}]"), self.status_tag(status)];

        match job {
            Some(job) => {
                parts.push("in".to_string());
                parts.push(job.runner_name());
                let files = self.filenames(&job.specs);
                if !files.is_empty() {
                    parts.push(files);
                }
            }
            None => {
                parts.push("in".to_string());
                parts.push(UNKNOWN_RUNNER.to_string());
            }
        }

        if retries > 0 {
            parts.push(format!("({retries} retries)"));
        }

        parts.join(" ")
    }

    /// Failure block for a single test
    pub fn test_error(&self, payload: &TestErrorPayload) -> String {
        let error = payload.normalize();
        let kind = error.kind.as_deref().unwrap_or("Error");
        let body = error
            .stack
            .as_deref()
            .or(error.message.as_deref())
            .unwrap_or_default();

        format!(
            "[{}] {} in \"{}\"\n{}",
            payload.cid,
            self.paint(RED, kind),
            payload.full_title,
            self.paint(RED, body)
        )
    }

    /// Fatal worker error notice
    pub fn fatal_error(&self, cid: &str, content: Option<&Value>) -> String {
        let text = content.map(error_text).unwrap_or_default();
        format!("[{cid}] {} {text}", self.paint(ERROR_BADGE, " Error: "))
    }

    /// Hook failures carry their origin, other errors just their message
    pub fn hook_error(&self, error: &(dyn std::error::Error + 'static)) -> String {
        match error.downcast_ref::<HookError>() {
            Some(hook) => format!(
                "{} in \"{}\"\n{}",
                self.paint(RED, &hook.name),
                hook.origin,
                self.paint(RED, hook.stack.as_deref().unwrap_or(&hook.message))
            ),
            None => format!(
                "{}: {}",
                self.paint(RED, "Error"),
                self.paint(RED, &error.to_string())
            ),
        }
    }

    /// Untyped event from an unrecognised origin
    pub fn trace_line(&self, envelope: &Envelope) -> String {
        let or_dash = |v: Option<&str>| v.unwrap_or("-").to_string();
        let mut parts = vec![
            or_dash(envelope.cid.as_deref()),
            or_dash(envelope.origin.as_deref()),
            envelope.name.clone(),
        ];
        if let Some(content) = &envelope.content {
            parts.push(value_text(content));
        }
        parts.join(" ")
    }

    pub fn reporter_header(&self, reporter: &str) -> String {
        self.paint(&format!("{BOLD}{MAGENTA}"), &format!("\"{reporter}\" Reporter:"))
    }

    pub fn debug_intro(&self, message: &str) -> String {
        self.paint(YELLOW, message)
    }

    /// Banner printed when a run is (re)initialised
    pub fn start_banner(
        &self,
        workers: u32,
        shard: Option<Shard>,
        started_at: DateTime<Utc>,
        debug: bool,
        watch: bool,
    ) -> Vec<String> {
        let shard_note = shard
            .filter(Shard::is_sharded)
            .map(|s| format!(" (Shard {} of {})", s.current, s.total))
            .unwrap_or_default();
        let headline = format!(
            "Execution of {} workers{shard_note} started at",
            self.paint(BLUE, &workers.to_string())
        );

        let mut lines = vec![
            String::new(),
            format!(
                "{} {}",
                self.paint(BOLD, &headline),
                started_at.to_rfc3339_opts(SecondsFormat::Millis, true)
            ),
        ];
        if debug {
            lines.push(self.paint(NOTICE_BADGE, "DEBUG mode enabled!"));
        }
        if watch {
            lines.push(self.paint(NOTICE_BADGE, "WATCH mode enabled!"));
        }
        lines.push(String::new());
        lines
    }

    pub fn shutdown_message(&self, still_running: bool) -> String {
        let message = if still_running {
            SHUTDOWN_IN_PROGRESS
        } else {
            SHUTDOWN_COMPLETE
        };
        format!("\n\n{message}")
    }

    /// Snapshot section; empty when there is nothing to report
    pub fn snapshot_summary(&self, summary: &RunSummary) -> Vec<String> {
        let snapshots = &summary.snapshots;
        let mut notes = Vec::new();

        if snapshots.added > 0 {
            notes.push(self.paint(GREEN, &format!("{} snapshot(s) added.", snapshots.added)));
        }
        if snapshots.updated > 0 {
            notes.push(self.paint(YELLOW, &format!("{} snapshot(s) updated.", snapshots.updated)));
        }
        if snapshots.unmatched > 0 {
            notes.push(self.paint(RED, &format!("{} snapshot(s) unmatched.", snapshots.unmatched)));
        }
        if snapshots.unchecked > 0 {
            notes.push(self.paint(GRAY, &format!("{} snapshot(s) unchecked.", snapshots.unchecked)));
        }

        if notes.is_empty() {
            return notes;
        }

        let mut lines = vec![String::new(), "Snapshot Summary:".to_string()];
        lines.extend(notes);
        lines
    }

    /// The `Spec Files:` block, optionally followed by the shard line
    pub fn run_summary(&self, summary: &RunSummary) -> Vec<String> {
        let mut counts = vec![self.paint(GREEN, &format!("{} passed", summary.passed))];
        if summary.retries > 0 {
            counts.push(self.paint(YELLOW, &format!("{} retries", summary.retries)));
        }
        if summary.failed > 0 {
            counts.push(self.paint(RED, &format!("{} failed", summary.failed)));
        }
        if summary.skipped > 0 {
            counts.push(self.paint(GRAY, &format!("{} skipped", summary.skipped)));
        }
        counts.push(format!("{} total", summary.total_jobs));

        let mut lines = vec![
            String::new(),
            format!(
                "Spec Files:\t {} ({}% completed) in {}",
                counts.join(", "),
                summary.percent_completed(),
                format_hms(summary.elapsed)
            ),
        ];
        if let Some(shard) = summary.shard.filter(Shard::is_sharded) {
            lines.push(format!("Shard:\t\t {} / {}", shard.current, shard.total));
        }
        lines.push(String::new());
        lines
    }
}

impl Default for StatusFormatter {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Render an untyped payload as text: strings verbatim, null empty, JSON otherwise
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Message, then stack, then the raw value
fn error_text(content: &Value) -> String {
    ["message", "stack"]
        .iter()
        .filter_map(|key| content.get(*key).and_then(Value::as_str))
        .find(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| value_text(content))
}
