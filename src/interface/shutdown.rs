//! Interrupt handling
//!
//! Only informs the user; stopping workers and exiting the process is left
//! to whoever owns them.

use super::CliInterface;
use crate::output::PrintSink;

/// Result of an interrupt signal
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShutdownNotice {
    /// Debug session active, the debugger handles interrupts itself
    Ignored,
    /// Jobs are still running (or watch mode): a second signal hard-kills
    InProgress,
    /// Nothing left running
    Completed,
}

impl<S: PrintSink> CliInterface<S> {
    /// React to an interrupt signal
    pub fn sigint_trigger(&mut self) -> ShutdownNotice {
        if self.in_debug_mode {
            return ShutdownNotice::Ignored;
        }

        let running = !self.jobs.is_empty() || self.config.watch;
        let text = self.formatter.shutdown_message(running);
        self.print(&text);

        if running {
            ShutdownNotice::InProgress
        } else {
            ShutdownNotice::Completed
        }
    }
}
