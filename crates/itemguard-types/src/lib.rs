//! Stable DTOs and IDs used across the itemguard workspace.
//!
//! This crate is intentionally boring:
//! - the violation record emitted by every detector
//! - stable string IDs for checks and a closed set of violation codes
//! - the persisted exemption file and report envelope
//! - explain registry for remediation guidance

#![forbid(unsafe_code)]

pub mod exemption;
pub mod explain;
pub mod ids;
pub mod report;
pub mod violation;

pub use exemption::{ExemptionFileV1, SCHEMA_EXEMPTIONS_V1};
pub use explain::{ExamplePair, Explanation, lookup_explanation};
pub use report::{
    EntityStats, HistoryEntry, LeaderboardEntry, ReportBody, ReportEnvelope, SCHEMA_REPORT_V1,
    ServerStats, ToolMeta,
};
pub use violation::{Severity, Violation, ViolationCode};
