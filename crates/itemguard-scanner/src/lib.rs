//! Concurrent inventory scanning for itemguard.
//!
//! The [`Scanner`] owns no I/O: entities come from a host-provided
//! [`EntitySource`], and anything the host must act on (reports, write-backs,
//! deletions) leaves through an event channel.

#![forbid(unsafe_code)]

mod error;
mod host;
mod ledger;
mod scanner;

pub use error::ScannerError;
pub use host::{EntitySnapshot, EntitySource, ScanAction, ScanEvent};
pub use ledger::Ledger;
pub use scanner::{ScanSummary, Scanner, TICK_MILLIS};
