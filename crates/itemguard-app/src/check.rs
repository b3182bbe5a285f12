//! The `check` and `fix` use cases over JSON-encoded items.

use crate::config::load_config;
use anyhow::Context;
use itemguard_domain::{Evaluator, ExemptionCache, Item, Remediator};
use itemguard_settings::Overrides;
use itemguard_types::{Severity, Violation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Input for the check use case.
#[derive(Clone, Debug)]
pub struct CheckInput<'a> {
    /// Config file contents (empty string if not found).
    pub config_text: &'a str,
    pub overrides: Overrides,
    /// One item object, or an array of them.
    pub items_json: &'a str,
    pub exemptions: Option<Arc<ExemptionCache>>,
    /// Also produce the remediated item for each input.
    pub fix: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Pass,
    Warn,
    Fail,
}

impl Verdict {
    pub fn from_violations<'a>(violations: impl IntoIterator<Item = &'a Violation>) -> Self {
        match violations.into_iter().map(|v| v.severity).max() {
            Some(Severity::Error) => Verdict::Fail,
            Some(Severity::Warning) => Verdict::Warn,
            Some(Severity::Info) | None => Verdict::Pass,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ItemResult {
    pub index: usize,
    pub kind: String,
    pub violations: Vec<Violation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed: Option<Item>,
    /// What still violates after remediation (unfixable codes).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub remaining: Vec<Violation>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CheckReport {
    pub verdict: Verdict,
    pub items: Vec<ItemResult>,
}

impl CheckReport {
    pub fn violation_count(&self) -> usize {
        self.items.iter().map(|r| r.violations.len()).sum()
    }
}

#[derive(Clone, Debug)]
pub struct CheckOutput {
    pub report: CheckReport,
    /// Config values that fell back to their defaults.
    pub warnings: Vec<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ItemsDoc {
    Many(Vec<Item>),
    One(Item),
}

pub fn parse_items(text: &str) -> anyhow::Result<Vec<Item>> {
    let doc: ItemsDoc = serde_json::from_str(text)
        .context("items must be an item object or an array of items")?;
    Ok(match doc {
        ItemsDoc::Many(items) => items,
        ItemsDoc::One(item) => vec![item],
    })
}

/// Run the check use case: resolve config, parse items, evaluate (and optionally fix).
pub fn run_check(input: CheckInput<'_>) -> anyhow::Result<CheckOutput> {
    let resolved = load_config(input.config_text, input.overrides.clone())?;
    let items = parse_items(input.items_json).context("parse items")?;

    let mut evaluator = Evaluator::default();
    if let Some(exemptions) = input.exemptions.clone() {
        evaluator = evaluator.with_exemptions(exemptions);
    }
    let remediator = Remediator::new(evaluator);
    let cfg = &resolved.effective;

    let results: Vec<ItemResult> = items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let violations = remediator.evaluator().evaluate(Some(item), cfg);
            let (fixed, remaining) = if input.fix {
                let fixed = remediator.remediate(item, cfg);
                let remaining = remediator.evaluator().evaluate(Some(&fixed), cfg);
                (Some(fixed), remaining)
            } else {
                (None, Vec::new())
            };
            ItemResult {
                index,
                kind: item.kind.to_string(),
                violations,
                fixed,
                remaining,
            }
        })
        .collect();

    let verdict = Verdict::from_violations(results.iter().flat_map(|r| &r.violations));
    tracing::debug!(items = results.len(), ?verdict, "check finished");
    Ok(CheckOutput {
        report: CheckReport {
            verdict,
            items: results,
        },
        warnings: resolved.warnings,
    })
}

/// Map a verdict to a process exit code.
///
/// - 0: pass (or warn-only)
/// - 2: policy failure (error-level violations present)
pub fn verdict_exit_code(verdict: Verdict) -> i32 {
    match verdict {
        Verdict::Pass | Verdict::Warn => 0,
        Verdict::Fail => 2,
    }
}
