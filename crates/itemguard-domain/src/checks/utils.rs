use crate::policy::CheckPolicy;
use itemguard_types::{Violation, ViolationCode};
use serde_json::Value;

pub fn violation(
    policy: &CheckPolicy,
    code: ViolationCode,
    message: String,
    data: Value,
) -> Violation {
    Violation::new(code, policy.severity, message).with_data(data)
}

/// First non-empty keyword contained in `text` (case-sensitive).
pub fn first_keyword<'k>(text: &str, keywords: &'k [String]) -> Option<&'k str> {
    keywords
        .iter()
        .map(String::as_str)
        .find(|k| !k.is_empty() && text.contains(k))
}
