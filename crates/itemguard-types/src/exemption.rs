use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const SCHEMA_EXEMPTIONS_V1: &str = "itemguard.exemptions.v1";

/// On-disk exemption list.
///
/// Each entry is an item fingerprint: `KIND[:display name][:lore lines joined by ';']`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ExemptionFileV1 {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Matching mode. Only `strict` (exact fingerprint) is defined.
    #[serde(default = "default_mode")]
    pub mode: String,

    #[serde(default, alias = "whitelisted-items")]
    pub entries: Vec<String>,
}

fn default_enabled() -> bool {
    true
}

fn default_mode() -> String {
    "strict".to_string()
}

impl Default for ExemptionFileV1 {
    fn default() -> Self {
        Self {
            schema: Some(SCHEMA_EXEMPTIONS_V1.to_string()),
            enabled: default_enabled(),
            mode: default_mode(),
            entries: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let file: ExemptionFileV1 = serde_json::from_str("{}").expect("parse");
        assert!(file.enabled);
        assert_eq!(file.mode, "strict");
        assert!(file.entries.is_empty());
    }

    #[test]
    fn legacy_entry_key_is_accepted() {
        let file: ExemptionFileV1 =
            serde_json::from_str(r#"{"whitelisted-items": ["DIAMOND_SWORD:Excalibur"]}"#)
                .expect("parse");
        assert_eq!(file.entries, vec!["DIAMOND_SWORD:Excalibur".to_string()]);
    }
}
