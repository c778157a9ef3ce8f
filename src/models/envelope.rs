//! Inbound event envelopes
//!
//! Workers report everything through one loosely-typed envelope. Fields are
//! optional here; each routing branch decides which ones it requires.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One inbound event from a worker, reporter or debugger
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

impl Envelope {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    pub fn with_cid(mut self, cid: impl Into<String>) -> Self {
        self.cid = Some(cid.into());
        self
    }

    pub fn with_content(mut self, content: impl Into<Value>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_params(mut self, params: Value) -> Self {
        self.params = Some(params);
        self
    }

    pub fn origin_is(&self, origin: &str) -> bool {
        self.origin.as_deref() == Some(origin)
    }
}

/// Structured error attached to a failing test
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetails {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

/// Content of a `printFailureMessage` event
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestErrorPayload {
    pub cid: String,
    pub full_title: String,
    /// A bare string, an error object, or anything else a worker sent
    #[serde(default)]
    pub error: Option<Value>,
}

impl TestErrorPayload {
    /// Fill in defaults: type `Error`, message `Unknown error.`
    pub fn normalize(&self) -> ErrorDetails {
        let field = |name: &str| {
            self.error
                .as_ref()
                .and_then(Value::as_object)
                .and_then(|obj| obj.get(name))
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        let message = match &self.error {
            Some(Value::String(message)) => Some(message.clone()),
            _ => field("message"),
        };

        ErrorDetails {
            kind: Some(field("type").unwrap_or_else(|| "Error".to_string())),
            message: Some(message.unwrap_or_else(|| "Unknown error.".to_string())),
            stack: field("stack"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(error: Value) -> TestErrorPayload {
        serde_json::from_value(json!({
            "cid": "0-0",
            "fullTitle": "suite does a thing",
            "error": error
        }))
        .unwrap()
    }

    #[test]
    fn test_envelope_decode_minimal() {
        let env: Envelope = serde_json::from_str(r#"{"name":"ready"}"#).unwrap();
        assert_eq!(env.name, "ready");
        assert!(env.origin.is_none());
        assert!(env.content.is_none());
    }

    #[test]
    fn test_envelope_requires_name() {
        let result: Result<Envelope, _> = serde_json::from_str(r#"{"origin":"worker"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_normalize_structured() {
        let p = payload(json!({ "type": "AssertionError", "message": "expected 1", "stack": "at foo" }));
        let e = p.normalize();
        assert_eq!(e.kind.as_deref(), Some("AssertionError"));
        assert_eq!(e.message.as_deref(), Some("expected 1"));
        assert_eq!(e.stack.as_deref(), Some("at foo"));
    }

    #[test]
    fn test_normalize_plain_string() {
        let e = payload(json!("boom")).normalize();
        assert_eq!(e.kind.as_deref(), Some("Error"));
        assert_eq!(e.message.as_deref(), Some("boom"));
        assert!(e.stack.is_none());
    }

    #[test]
    fn test_normalize_missing_fields() {
        let e = payload(json!({})).normalize();
        assert_eq!(e.kind.as_deref(), Some("Error"));
        assert_eq!(e.message.as_deref(), Some("Unknown error."));

        let p = TestErrorPayload {
            cid: "0-0".into(),
            full_title: "t".into(),
            error: None,
        };
        assert_eq!(p.normalize().message.as_deref(), Some("Unknown error."));
    }

    #[test]
    fn test_normalize_non_string_values() {
        for error in [json!(42), json!(["x"]), json!(null), json!(true)] {
            let e = payload(error).normalize();
            assert_eq!(e.kind.as_deref(), Some("Error"));
            assert_eq!(e.message.as_deref(), Some("Unknown error."));
            assert!(e.stack.is_none());
        }
    }

    #[test]
    fn test_normalize_ignores_non_string_fields() {
        let e = payload(json!({ "type": 7, "message": 123, "stack": "at bar" })).normalize();
        assert_eq!(e.kind.as_deref(), Some("Error"));
        assert_eq!(e.message.as_deref(), Some("Unknown error."));
        assert_eq!(e.stack.as_deref(), Some("at bar"));
    }
}
