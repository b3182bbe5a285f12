//! The `explain` use case.

use itemguard_types::explain::{self, Explanation};
use std::fmt::Write;

#[derive(Clone, Debug)]
pub enum ExplainOutput {
    Found(Explanation),
    /// Unknown identifier, with everything that would have matched.
    NotFound {
        identifier: String,
        available_check_ids: Vec<&'static str>,
        available_codes: Vec<&'static str>,
    },
}

/// Look up a check id (`items.potion`) or a violation code (`extreme_effect`).
pub fn run_explain(identifier: &str) -> ExplainOutput {
    match explain::lookup_explanation(identifier.trim()) {
        Some(exp) => ExplainOutput::Found(exp),
        None => ExplainOutput::NotFound {
            identifier: identifier.to_string(),
            available_check_ids: explain::all_check_ids().to_vec(),
            available_codes: explain::all_codes(),
        },
    }
}

pub fn format_explanation(exp: &Explanation) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}\n{}\n", exp.title, "=".repeat(exp.title.len()));
    let _ = writeln!(out, "{}\n", exp.description);
    let _ = writeln!(out, "Remediation\n-----------\n{}\n", exp.remediation);
    out.push_str("Example\n-------\n\n");
    let _ = writeln!(out, "Before:\n```json\n{}\n```\n", exp.examples.before);
    if exp.examples.after.starts_with('{') {
        let _ = writeln!(out, "After:\n```json\n{}\n```", exp.examples.after);
    } else {
        let _ = writeln!(out, "After: {}", exp.examples.after);
    }
    out
}

pub fn format_not_found(identifier: &str, check_ids: &[&str], codes: &[&str]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Unknown check id or code: {identifier}\n");
    out.push_str("Check ids:\n");
    for id in check_ids {
        let _ = writeln!(out, "  - {id}");
    }
    out.push_str("\nCodes:\n");
    for code in codes {
        let _ = writeln!(out, "  - {code}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn found(identifier: &str) -> Explanation {
        match run_explain(identifier) {
            ExplainOutput::Found(exp) => exp,
            ExplainOutput::NotFound { .. } => panic!("no explanation for {identifier}"),
        }
    }

    #[test]
    fn checks_and_codes_are_both_explained() {
        assert_eq!(found("items.banned").title, "Banned Items");
        assert!(!found("extreme_effect").description.is_empty());
        assert_eq!(found("  items.potion ").title, found("items.potion").title);
    }

    #[test]
    fn unknown_identifiers_list_the_alternatives() {
        match run_explain("items.teleport") {
            ExplainOutput::NotFound {
                identifier,
                available_check_ids,
                available_codes,
            } => {
                assert_eq!(identifier, "items.teleport");
                assert!(available_check_ids.contains(&"items.banned"));
                assert!(available_codes.contains(&"unbreakable"));
            }
            ExplainOutput::Found(_) => panic!("unexpected explanation"),
        }
    }

    #[test]
    fn removed_items_are_shown_inline() {
        let text = format_explanation(&found("items.banned"));
        assert!(text.starts_with("Banned Items\n============\n"));
        assert!(text.contains("```json\n{\"kind\": \"BEDROCK\""));
        assert!(text.contains("After: (removed)"));
    }

    #[test]
    fn not_found_lists_everything() {
        let text = format_not_found("nope", &["a.b"], &["c_d"]);
        assert!(text.starts_with("Unknown check id or code: nope\n"));
        assert!(text.contains("  - a.b\n"));
        assert!(text.ends_with("  - c_d\n"));
    }
}
