//! Use case orchestration for itemguard.
//!
//! This crate is the application layer: it wires the pure domain, settings and
//! scanner crates to the filesystem (config text, exemption list, reports,
//! confiscated items) and to the host's inventory events.
//!
//! The CLI crate depends on this; it only handles argument parsing and I/O.

#![forbid(unsafe_code)]

mod check;
mod config;
mod confiscate;
mod disposition;
mod exemptions;
mod explain;
mod persist;
mod render;
mod reports;
mod scan;

pub use check::{
    CheckInput, CheckOutput, CheckReport, ItemResult, Verdict, parse_items, run_check,
    verdict_exit_code,
};
pub use config::{ConfigHandle, load_config};
pub use confiscate::{ConfiscatedItem, ConfiscationStore};
pub use disposition::{Decision, Disposition, ItemEvent, ItemEventHandler, decide};
pub use exemptions::{JsonExemptionStore, open_exemptions};
pub use explain::{ExplainOutput, format_explanation, format_not_found, run_explain};
pub use persist::PersistQueue;
pub use render::{render_markdown, render_report_summary, render_text};
pub use reports::{
    LEADERBOARD_SIZE, ReportFile, ReportStore, entity_report, entity_report_from, server_report,
    server_report_from,
};
pub use scan::{ScanInput, ScanOutput, StaticSource, parse_world, run_scan};
