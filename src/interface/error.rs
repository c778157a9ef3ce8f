//! Interface error types

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An envelope rejected by the router
///
/// Rejection never touches interface state; the run continues with the
/// next envelope.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnvelopeError {
    #[error("{branch} event is missing required field `{field}`")]
    MissingField {
        branch: &'static str,
        field: &'static str,
    },

    #[error("{branch} event has invalid content: {reason}")]
    InvalidContent { branch: &'static str, reason: String },
}

impl EnvelopeError {
    pub(crate) fn missing(branch: &'static str, field: &'static str) -> Self {
        EnvelopeError::MissingField { branch, field }
    }

    pub(crate) fn invalid(branch: &'static str, err: impl std::fmt::Display) -> Self {
        EnvelopeError::InvalidContent {
            branch,
            reason: err.to_string(),
        }
    }
}

/// Failure inside a framework hook rather than a test
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{name} in \"{origin}\": {message}")]
pub struct HookError {
    #[serde(default = "hook_error_name")]
    pub name: String,
    /// Hook the error was raised in
    pub origin: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

fn hook_error_name() -> String {
    "HookError".to_string()
}

impl HookError {
    pub fn new(origin: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: hook_error_name(),
            origin: origin.into(),
            message: message.into(),
            stack: None,
        }
    }

    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_error_display() {
        let err = EnvelopeError::missing("error", "cid");
        assert_eq!(err.to_string(), "error event is missing required field `cid`");
    }

    #[test]
    fn test_hook_error_display() {
        let err = HookError::new("onPrepare", "cannot connect").with_stack("at hook.js:1");
        assert_eq!(err.to_string(), "HookError in \"onPrepare\": cannot connect");
        assert_eq!(err.stack.as_deref(), Some("at hook.js:1"));
    }

    #[test]
    fn test_hook_error_decode_defaults_name() {
        let err: HookError =
            serde_json::from_str(r#"{"origin":"onComplete","message":"boom"}"#).unwrap();
        assert_eq!(err, HookError::new("onComplete", "boom"));
    }
}
