//! Plain-text and Markdown views of check results and saved reports.

use crate::check::{CheckReport, ItemResult, Verdict};
use itemguard_types::{ReportBody, ReportEnvelope, Severity, Violation};
use std::fmt::Write;

fn verdict_label(verdict: Verdict) -> &'static str {
    match verdict {
        Verdict::Pass => "PASS",
        Verdict::Warn => "WARN",
        Verdict::Fail => "FAIL",
    }
}

fn severity_label(severity: Severity) -> &'static str {
    match severity {
        Severity::Info => "INFO",
        Severity::Warning => "WARN",
        Severity::Error => "ERROR",
    }
}

fn violating(report: &CheckReport) -> impl Iterator<Item = &ItemResult> {
    report.items.iter().filter(|r| !r.violations.is_empty())
}

pub fn render_text(report: &CheckReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}: {} violation(s) in {} of {} item(s)",
        verdict_label(report.verdict),
        report.violation_count(),
        violating(report).count(),
        report.items.len()
    );
    for result in violating(report) {
        let _ = writeln!(out, "item {} {}", result.index, result.kind);
        for v in &result.violations {
            let _ = writeln!(out, "  {}", text_line(v));
        }
        if result.fixed.is_some() {
            if result.remaining.is_empty() {
                let _ = writeln!(out, "  fixed");
            } else {
                let _ = writeln!(
                    out,
                    "  fixed, {} unfixable violation(s) remain",
                    result.remaining.len()
                );
            }
        }
    }
    out
}

fn text_line(v: &Violation) -> String {
    format!(
        "{} {}/{}: {}",
        v.severity.as_str(),
        v.check_id,
        v.code,
        v.message
    )
}

pub fn render_markdown(report: &CheckReport) -> String {
    let mut out = String::new();

    out.push_str("# Itemguard report\n\n");
    let _ = write!(
        out,
        "- Verdict: **{}**\n- Items: {} checked, {} violating\n- Violations: {}\n\n",
        verdict_label(report.verdict),
        report.items.len(),
        violating(report).count(),
        report.violation_count()
    );

    if report.violation_count() == 0 {
        out.push_str("No violations.\n");
        return out;
    }

    let blocks: Vec<String> = violating(report).map(markdown_item).collect();
    out.push_str(&blocks.join("\n"));
    out
}

fn markdown_item(result: &ItemResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "## Item {}: `{}`\n", result.index, result.kind);
    for v in &result.violations {
        let _ = writeln!(
            out,
            "- [{}] `{}` / `{}`: {}",
            severity_label(v.severity),
            v.check_id,
            v.code,
            v.message
        );
    }
    if result.fixed.is_some() {
        let _ = writeln!(
            out,
            "\nAfter fix: {} violation(s) remain.",
            result.remaining.len()
        );
    }
    out
}

/// Short human summary of a saved report.
pub fn render_report_summary(report: &ReportEnvelope) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", report.id, report.generated_at.date());
    match &report.body {
        ReportBody::Server { stats, leaderboard } => {
            let _ = writeln!(
                out,
                "entities: {}, violations: {}, monitoring: {}",
                stats.total_entities,
                stats.total_violations,
                if stats.monitoring_enabled { "on" } else { "off" }
            );
            for entry in leaderboard {
                let _ = writeln!(
                    out,
                    "{:>3}. {} ({})",
                    entry.rank,
                    entry.entity_name.as_deref().unwrap_or(&entry.entity_id),
                    entry.violations
                );
            }
        }
        ReportBody::Entity {
            entity_id,
            entity_name,
            stats,
            recent,
        } => {
            let _ = writeln!(
                out,
                "{}: {} violation(s), {} recent",
                entity_name.as_deref().unwrap_or(entity_id),
                stats.total_violations,
                stats.recent_violations
            );
            for entry in recent {
                let codes: Vec<&str> = entry.codes.iter().map(|c| c.as_str()).collect();
                let _ = writeln!(
                    out,
                    "  slot {} {}: {}",
                    entry.slot,
                    entry.item_kind,
                    codes.join(", ")
                );
            }
        }
    }
    out
}
