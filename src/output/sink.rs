//! Print sinks
//!
//! The interface writes every user-facing line through a [`PrintSink`].
//! Writes must reach the terminal in call order.

#![allow(dead_code)]

use std::io::Write;

/// Line-oriented output channel
pub trait PrintSink: Send {
    /// Write one line (may itself contain newlines)
    fn print(&mut self, text: &str);
}

/// Writes to standard output
#[derive(Debug, Default)]
pub struct StdoutSink;

impl PrintSink for StdoutSink {
    fn print(&mut self, text: &str) {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        // A closed stdout is not fatal for the run
        let _ = writeln!(handle, "{text}");
    }
}

/// Collects printed lines in memory
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    lines: Vec<String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All lines printed so far
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Printed output joined with newlines
    pub fn output(&self) -> String {
        self.lines.join("\n")
    }

    /// Drain the captured lines
    pub fn take(&mut self) -> Vec<String> {
        std::mem::take(&mut self.lines)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Whether any printed line contains `needle`
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|line| line.contains(needle))
    }
}

impl PrintSink for MemorySink {
    fn print(&mut self, text: &str) {
        self.lines.push(text.to_string());
    }
}
