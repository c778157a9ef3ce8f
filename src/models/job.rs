//! Job models
//!
//! A job is one worker attempt at a list of spec files. Retried attempts
//! arrive as new jobs with a new correlation id.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Placeholder used when a runner cannot be identified
pub const UNKNOWN_RUNNER: &str = "unknown runner";

/// Capability keys that name a runner, in order of preference
const RUNNER_KEYS: &[&str] = &[
    "browserName",
    "platformName",
    "appium:platformName",
    "appium:appPackage",
    "appium:appWaitActivity",
    "appium:app",
];

/// An active job tracked by the registry
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    /// Opaque capability descriptor
    pub caps: Value,
    /// Spec files executed by this job
    pub specs: Vec<String>,
    /// Whether the spec files contain any tests at all
    pub has_tests: bool,
}

impl Job {
    pub fn new(caps: Value, specs: Vec<String>, has_tests: bool) -> Self {
        Self {
            caps,
            specs,
            has_tests,
        }
    }

    /// Display name of the runner behind this job
    pub fn runner_name(&self) -> String {
        runner_name(&self.caps)
    }
}

/// Payload announcing a job start (`testFrameworkInit` content)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStart {
    pub cid: String,
    #[serde(default, alias = "capabilities")]
    pub caps: Value,
    #[serde(default)]
    pub specs: Vec<String>,
    pub has_tests: bool,
}

impl JobStart {
    /// Split into the registry key and the job it owns
    pub fn into_parts(self) -> (String, Job) {
        (self.cid, Job::new(self.caps, self.specs, self.has_tests))
    }
}

/// Payload reporting a job completion, sent by the external scheduler
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobEnd {
    pub cid: String,
    pub passed: bool,
    /// Retries still available for the spec file
    #[serde(default)]
    pub retries: u32,
}

impl JobEnd {
    pub fn new(cid: impl Into<String>, passed: bool, retries: u32) -> Self {
        Self {
            cid: cid.into(),
            passed,
            retries,
        }
    }
}

/// Derive a runner display name from a capability descriptor
///
/// Multiremote descriptors (every value holding its own `capabilities`)
/// are reported as `MultiRemote`.
pub fn runner_name(caps: &Value) -> String {
    let Some(map) = caps.as_object() else {
        return UNKNOWN_RUNNER.to_string();
    };

    if let Some(name) = RUNNER_KEYS
        .iter()
        .filter_map(|key| map.get(*key).and_then(Value::as_str))
        .find(|name| !name.is_empty())
    {
        return name.to_string();
    }

    let multiremote = !map.is_empty()
        && map
            .values()
            .all(|v| v.get("capabilities").is_some_and(Value::is_object));
    if multiremote {
        "MultiRemote".to_string()
    } else {
        UNKNOWN_RUNNER.to_string()
    }
}
