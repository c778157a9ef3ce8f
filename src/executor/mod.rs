//! Dispatch layer
//!
//! Serialises events from many workers into the single-threaded interface.

mod dispatch;
mod signals;

pub use dispatch::{decode_record, Dispatcher, Inbound, DEFAULT_CAPACITY};
pub use signals::{forward_interrupts, InterruptOutcome};
