//! Envelope routing
//!
//! Rules are checked in a fixed priority order and the first match wins.
//! Each branch validates what it needs before touching any state, so a
//! rejected envelope leaves the interface exactly as it was.

use serde_json::Value;
use tracing::debug;

use super::{CliInterface, EnvelopeError, Origin};
use crate::models::{Envelope, JobStart, SnapshotResult, TestErrorPayload};
use crate::output::{value_text, PrintSink};

/// Worker events that are never shown
const EVENT_FILTER: &[&str] = &[
    "sessionStarted",
    "sessionEnded",
    "finishedCommand",
    "ready",
    "workerResponse",
    "workerEvent",
];

/// What the router did with an envelope
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Routed {
    /// Printed straight through
    RealTime,
    /// Debug mode toggled to the carried value
    DebugMode(bool),
    /// A job was registered
    JobStarted(String),
    /// Number of snapshot results recorded
    Snapshots(usize),
    /// Fatal worker error printed
    FatalError,
    /// Filtered worker event
    Discarded,
    /// Unrecognised event printed as a trace line
    Traced,
    /// Test failure block printed
    TestError,
    /// Payload appended to a message buffer
    Buffered(Origin),
}

impl<S: PrintSink> CliInterface<S> {
    /// Route one inbound envelope
    pub fn on_message(&mut self, envelope: Envelope) -> Result<Routed, EnvelopeError> {
        if envelope.name == "reporterRealTime" {
            let content = require_content(&envelope, "reporterRealTime")?;
            let text = value_text(content);
            self.print(&text);
            return Ok(Routed::RealTime);
        }

        if envelope.origin_is("debugger") && envelope.name == "start" {
            let intro = envelope
                .params
                .as_ref()
                .and_then(|p| p.get("introMessage"))
                .and_then(Value::as_str)
                .ok_or_else(|| EnvelopeError::missing("debugger start", "params.introMessage"))?;
            let text = self.formatter.debug_intro(intro);
            self.print(&text);
            self.in_debug_mode = true;
            return Ok(Routed::DebugMode(true));
        }

        if envelope.origin_is("debugger") && envelope.name == "stop" {
            self.in_debug_mode = false;
            return Ok(Routed::DebugMode(false));
        }

        if envelope.name == "testFrameworkInit" {
            let content = require_content(&envelope, "testFrameworkInit")?;
            let start: JobStart = serde_json::from_value(content.clone())
                .map_err(|e| EnvelopeError::invalid("testFrameworkInit", e))?;
            let cid = start.cid.clone();
            self.add_job(start);
            return Ok(Routed::JobStarted(cid));
        }

        if envelope.name == "snapshot" {
            let content = require_content(&envelope, "snapshot")?;
            let results: Vec<SnapshotResult> = serde_json::from_value(content.clone())
                .map_err(|e| EnvelopeError::invalid("snapshot", e))?;
            let count = results.len();
            for result in results {
                self.snapshots.record_result(result);
            }
            return Ok(Routed::Snapshots(count));
        }

        if envelope.name == "error" {
            let cid = envelope
                .cid
                .as_deref()
                .ok_or_else(|| EnvelopeError::missing("error", "cid"))?;
            let text = self.formatter.fatal_error(cid, envelope.content.as_ref());
            self.print(&text);
            return Ok(Routed::FatalError);
        }

        let origin = envelope.origin.as_deref().and_then(Origin::parse);
        let Some(origin) = origin else {
            if EVENT_FILTER.contains(&envelope.name.as_str()) {
                return Ok(Routed::Discarded);
            }
            let text = self.formatter.trace_line(&envelope);
            self.print(&text);
            return Ok(Routed::Traced);
        };

        if envelope.name == "printFailureMessage" {
            let content = require_content(&envelope, "printFailureMessage")?;
            let payload: TestErrorPayload = serde_json::from_value(content.clone())
                .map_err(|e| EnvelopeError::invalid("printFailureMessage", e))?;
            let text = self.formatter.test_error(&payload);
            self.print(&text);
            return Ok(Routed::TestError);
        }

        let content = require_content(&envelope, "buffered")?;
        debug!("Buffering {} output for {}", origin, envelope.name);
        self.messages
            .push(origin, &envelope.name, value_text(content));
        Ok(Routed::Buffered(origin))
    }
}

fn require_content<'a>(
    envelope: &'a Envelope,
    branch: &'static str,
) -> Result<&'a Value, EnvelopeError> {
    envelope
        .content
        .as_ref()
        .ok_or_else(|| EnvelopeError::missing(branch, "content"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::config::RunConfig;
    use crate::models::{JobEnd, SnapshotSummary};
    use crate::output::{MemorySink, StatusFormatter};

    fn interface() -> CliInterface<MemorySink> {
        let mut iface = CliInterface::new(
            RunConfig::new(2).with_retries(1).with_color(false),
            MemorySink::new(),
        )
        .with_formatter(StatusFormatter::new(false).with_cwd(None));
        iface.sink_mut().take();
        iface
    }

    fn reporter(name: &str, content: &str) -> Envelope {
        Envelope::new(name).with_origin("reporter").with_content(content)
    }

    #[test]
    fn test_real_time_printed_immediately() {
        let mut iface = interface();
        let routed = iface
            .on_message(Envelope::new("reporterRealTime").with_origin("reporter").with_content("live"))
            .unwrap();
        assert_eq!(routed, Routed::RealTime);
        assert_eq!(iface.sink().lines(), ["live"]);
    }

    #[test]
    fn test_debugger_start_and_stop() {
        let mut iface = interface();
        let start = Envelope::new("start")
            .with_origin("debugger")
            .with_params(json!({ "introMessage": "Entering REPL" }));

        assert_eq!(iface.on_message(start).unwrap(), Routed::DebugMode(true));
        assert!(iface.is_debug_mode());
        assert_eq!(iface.sink().lines(), ["Entering REPL"]);

        let stop = Envelope::new("stop").with_origin("debugger");
        assert_eq!(iface.on_message(stop).unwrap(), Routed::DebugMode(false));
        assert!(!iface.is_debug_mode());
    }

    #[test]
    fn test_debugger_start_requires_intro() {
        let mut iface = interface();
        let err = iface
            .on_message(Envelope::new("start").with_origin("debugger"))
            .unwrap_err();
        assert_eq!(
            err,
            EnvelopeError::MissingField {
                branch: "debugger start",
                field: "params.introMessage"
            }
        );
        assert!(!iface.is_debug_mode());
    }

    #[test]
    fn test_framework_init_registers_job() {
        let mut iface = interface();
        let env = Envelope::new("testFrameworkInit").with_cid("0-0").with_content(json!({
            "cid": "0-0",
            "caps": { "browserName": "firefox" },
            "specs": ["/spec/a.js"],
            "hasTests": true
        }));

        assert_eq!(iface.on_message(env).unwrap(), Routed::JobStarted("0-0".into()));
        assert!(iface.jobs().contains("0-0"));
        assert_eq!(iface.sink().lines(), ["[0-0] RUNNING in firefox - /spec/a.js"]);
    }

    #[test]
    fn test_framework_init_rejects_bad_content() {
        let mut iface = interface();
        let err = iface
            .on_message(Envelope::new("testFrameworkInit").with_content(json!({ "specs": [] })))
            .unwrap_err();
        assert!(matches!(
            err,
            EnvelopeError::InvalidContent { branch: "testFrameworkInit", .. }
        ));
        assert!(iface.jobs().is_empty());
        assert!(iface.sink().is_empty());
    }

    #[test]
    fn test_snapshot_results_recorded() {
        let mut iface = interface();
        let env = Envelope::new("snapshot").with_content(json!([
            { "filepath": "/a.js", "added": 1 },
            { "filepath": "/b.js", "unmatched": 2, "unchecked": 1 }
        ]));
        assert_eq!(iface.on_message(env).unwrap(), Routed::Snapshots(2));
        assert_eq!(
            iface.summary().snapshots,
            SnapshotSummary {
                added: 1,
                updated: 0,
                unmatched: 2,
                unchecked: 1
            }
        );
    }

    #[test]
    fn test_snapshot_rejects_partial_garbage() {
        let mut iface = interface();
        let env = Envelope::new("snapshot").with_content(json!([
            { "filepath": "/a.js", "added": 1 },
            "not a result"
        ]));
        assert!(iface.on_message(env).is_err());
        assert!(iface.summary().snapshots.is_empty());
    }

    #[test]
    fn test_error_event() {
        let mut iface = interface();
        let env = Envelope::new("error")
            .with_origin("worker")
            .with_cid("0-4")
            .with_content(json!({ "message": "session not created" }));
        assert_eq!(iface.on_message(env).unwrap(), Routed::FatalError);
        assert_eq!(iface.sink().lines(), ["[0-4]  Error:  session not created"]);

        let err = iface.on_message(Envelope::new("error")).unwrap_err();
        assert_eq!(err, EnvelopeError::missing("error", "cid"));
    }

    #[test]
    fn test_filtered_worker_events_are_silent() {
        let mut iface = interface();
        for name in EVENT_FILTER {
            let env = Envelope::new(*name).with_origin("worker").with_cid("0-0");
            assert_eq!(iface.on_message(env).unwrap(), Routed::Discarded);
        }
        assert!(iface.sink().is_empty());
    }

    #[test]
    fn test_unknown_worker_event_traced() {
        let mut iface = interface();
        let env = Envelope::new("custom")
            .with_origin("worker")
            .with_cid("0-0")
            .with_content("payload");
        assert_eq!(iface.on_message(env).unwrap(), Routed::Traced);
        assert_eq!(iface.sink().lines(), ["0-0 worker custom payload"]);
    }

    #[test]
    fn test_missing_origin_is_traced() {
        let mut iface = interface();
        assert_eq!(iface.on_message(Envelope::new("hello")).unwrap(), Routed::Traced);
        assert_eq!(iface.sink().lines(), ["- - hello"]);
    }

    #[test]
    fn test_print_failure_message() {
        let mut iface = interface();
        let env = Envelope::new("printFailureMessage")
            .with_origin("reporter")
            .with_content(json!({
                "cid": "0-0",
                "fullTitle": "cart adds item",
                "error": { "type": "TypeError", "message": "x is undefined" }
            }));
        assert_eq!(iface.on_message(env).unwrap(), Routed::TestError);
        assert_eq!(
            iface.sink().output(),
            "[0-0] TypeError in \"cart adds item\"\nx is undefined"
        );
    }

    #[test]
    fn test_print_failure_message_unusual_error_values() {
        let mut iface = interface();
        for error in [json!(42), json!({ "message": 123 }), json!(["x"])] {
            let env = Envelope::new("printFailureMessage")
                .with_origin("reporter")
                .with_content(json!({ "cid": "0-0", "fullTitle": "t", "error": error }));
            assert_eq!(iface.on_message(env).unwrap(), Routed::TestError);
            assert_eq!(
                iface.sink_mut().take(),
                ["[0-0] Error in \"t\"\nUnknown error."]
            );
        }
    }

    #[test]
    fn test_print_failure_message_requires_title() {
        let mut iface = interface();
        let env = Envelope::new("printFailureMessage")
            .with_origin("reporter")
            .with_content(json!({ "cid": "0-0" }));
        assert!(iface.on_message(env).is_err());
        assert!(iface.sink().is_empty());
    }

    #[test]
    fn test_printing_failure_from_worker_is_traced() {
        // Worker origin hits the trace rule before the failure rule
        let mut iface = interface();
        let env = Envelope::new("printFailureMessage")
            .with_origin("worker")
            .with_content("x");
        assert_eq!(iface.on_message(env).unwrap(), Routed::Traced);
    }

    #[test]
    fn test_reporter_output_buffered_and_flushed_once() {
        let mut iface = interface();
        assert_eq!(
            iface.on_message(reporter("X", "hello ")).unwrap(),
            Routed::Buffered(Origin::Reporter)
        );
        iface.on_message(reporter("X", "world")).unwrap();
        assert!(iface.sink().is_empty());

        iface.print_reporters();
        assert_eq!(iface.sink().lines(), ["", "\"X\" Reporter:", "hello world"]);

        iface.sink_mut().take();
        iface.print_reporters();
        assert!(iface.sink().is_empty());
    }

    #[test]
    fn test_reporters_flushed_in_first_seen_order() {
        let mut iface = interface();
        iface.on_message(reporter("spec", "a")).unwrap();
        iface.on_message(reporter("dot", ".")).unwrap();
        iface.on_message(reporter("spec", "b")).unwrap();

        iface.print_reporters();
        let lines = iface.sink().lines();
        assert_eq!(lines[1], "\"spec\" Reporter:");
        assert_eq!(lines[2], "ab");
        assert_eq!(lines[4], "\"dot\" Reporter:");
        assert_eq!(lines[5], ".");
    }

    #[test]
    fn test_debugger_output_not_flushed() {
        let mut iface = interface();
        let env = Envelope::new("result")
            .with_origin("debugger")
            .with_content("42");
        assert_eq!(iface.on_message(env).unwrap(), Routed::Buffered(Origin::Debugger));

        iface.print_reporters();
        assert!(iface.sink().is_empty());
        assert_eq!(
            iface.debugger_messages().get("result"),
            Some(&["42".to_string()][..])
        );
    }

    #[test]
    fn test_buffered_requires_content() {
        let mut iface = interface();
        let err = iface
            .on_message(Envelope::new("X").with_origin("reporter"))
            .unwrap_err();
        assert_eq!(err, EnvelopeError::missing("buffered", "content"));
    }

    #[test]
    fn test_rejected_envelope_does_not_disturb_counters() {
        let mut iface = interface();
        iface
            .on_message(Envelope::new("testFrameworkInit").with_content(json!({
                "cid": "0-0", "specs": ["/a.js"], "hasTests": true
            })))
            .unwrap();
        let before = iface.result();

        assert!(iface.on_message(Envelope::new("testFrameworkInit")).is_err());
        assert!(iface.on_message(Envelope::new("snapshot").with_content("nope")).is_err());

        assert_eq!(iface.result(), before);
        assert!(iface.jobs().contains("0-0"));

        iface.clear_job(JobEnd::new("0-0", true, 0));
        assert_eq!(iface.result().passed, 1);
    }
}
