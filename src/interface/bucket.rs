//! Buffered reporter and debugger output
//!
//! Payloads are grouped per origin, then per event name, both in first-seen
//! order. The reporter side is swapped out wholesale when printed.

#![allow(dead_code)]

use std::fmt;

/// Origins whose output is buffered instead of printed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Origin {
    Reporter,
    Debugger,
}

impl Origin {
    pub fn parse(origin: &str) -> Option<Self> {
        match origin {
            "reporter" => Some(Origin::Reporter),
            "debugger" => Some(Origin::Debugger),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Origin::Reporter => "reporter",
            Origin::Debugger => "debugger",
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Event name -> payloads, in insertion order
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Messages {
    entries: Vec<(String, Vec<String>)>,
}

impl Messages {
    fn push(&mut self, name: &str, payload: String) {
        match self.entries.iter_mut().find(|(key, _)| key == name) {
            Some((_, payloads)) => payloads.push(payload),
            None => self.entries.push((name.to_string(), vec![payload])),
        }
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, payloads)| payloads.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(key, payloads)| (key.as_str(), payloads.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl IntoIterator for Messages {
    type Item = (String, Vec<String>);
    type IntoIter = std::vec::IntoIter<(String, Vec<String>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Per-origin message buffers
#[derive(Clone, Debug, Default)]
pub struct MessageBucket {
    reporter: Messages,
    debugger: Messages,
}

impl MessageBucket {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a payload, creating the entry on first use
    pub fn push(&mut self, origin: Origin, name: &str, payload: String) {
        match origin {
            Origin::Reporter => self.reporter.push(name, payload),
            Origin::Debugger => self.debugger.push(name, payload),
        }
    }

    /// Swap the reporter buffer for an empty one and hand back the old one
    pub fn take_reporter(&mut self) -> Messages {
        std::mem::take(&mut self.reporter)
    }

    pub fn reporter(&self) -> &Messages {
        &self.reporter
    }

    /// Debugger output is informational and never drained here
    pub fn debugger(&self) -> &Messages {
        &self.debugger
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
