//! Output module
//!
//! Provides the line-oriented print sink and the pure text formatting used
//! for status lines, failure blocks and the run summary.

mod formatter;
mod sink;
mod summary;

pub use formatter::{value_text, StatusFormatter};
pub use sink::{MemorySink, PrintSink, StdoutSink};
pub use summary::RunSummary;
