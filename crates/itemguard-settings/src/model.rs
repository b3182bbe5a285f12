use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// `itemguard.toml` schema v1.
///
/// This is a *user-facing* config model: every field is optional and numeric
/// fields are signed so out-of-range values can be reported and replaced
/// instead of failing the whole load.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ItemguardConfigV1 {
    /// Optional schema string for tooling (`itemguard.config.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Preset to start from: `default`, `strict`, `lenient`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,

    /// Master switch. `false` disables every check.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// Map of check_id -> policy override. Applied after section switches.
    #[serde(default)]
    pub checks: BTreeMap<String, CheckConfig>,

    #[serde(default)]
    pub banned: BannedSection,

    #[serde(default)]
    pub enchantments: EnchantmentSection,

    #[serde(default)]
    pub conflicts: ConflictSection,

    #[serde(default)]
    pub attributes: AttributeSection,

    #[serde(default)]
    pub op_items: OpItemSection,

    #[serde(default)]
    pub potions: PotionSection,

    #[serde(default)]
    pub fix: FixSection,

    #[serde(default)]
    pub actions: ActionSection,

    #[serde(default)]
    pub monitor: MonitorSection,

    #[serde(default)]
    pub reports: ReportSection,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CheckConfig {
    /// Override preset enable/disable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// Override preset severity: `info`, `warning`, `error`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BannedSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// `delete` (default) or `notify`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,

    #[serde(default)]
    pub kinds: Vec<String>,

    #[serde(default)]
    pub spawn_eggs: Vec<String>,

    /// Case-sensitive substrings matched against the display name.
    #[serde(default)]
    pub name_keywords: Vec<String>,

    /// Case-sensitive substrings matched against each lore line.
    #[serde(default)]
    pub lore_keywords: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EnchantmentSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_level: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_vanilla_max_for_unconfigured: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unconfigured_multiplier: Option<f64>,

    /// Per-enchantment level limits (`sharpness = 5`).
    #[serde(default)]
    pub limits: BTreeMap<String, Value>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ConflictSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AttributeSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_amount: Option<f64>,

    /// Per-attribute magnitude limits (`GENERIC_ATTACK_DAMAGE = 20.0`).
    #[serde(default)]
    pub limits: BTreeMap<String, Value>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct OpItemSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_total_enchantment_level: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_enchantment_multiplier: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_attribute_count: Option<i64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PotionSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// 0-indexed amplifier limit for effects without an override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_amplifier: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_duration_seconds: Option<i64>,

    #[serde(default)]
    pub banned_effects: Vec<String>,

    #[serde(default)]
    pub amplifier_limits: BTreeMap<String, Value>,

    #[serde(default)]
    pub duration_limits: BTreeMap<String, Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extreme_amplifier: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extreme_duration_ticks: Option<i64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FixSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub downgrade_enchantments: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub downgrade_attributes: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remove_unbreakable: Option<bool>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ActionSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confiscate_items: Option<bool>,

    /// `delete` (default), `store` or `fix`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strict_mode: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_violations: Option<bool>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MonitorSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// Scan period in game ticks (20 ticks = 1 second).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scan_interval_ticks: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_fix: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_delete: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_violation_history: Option<i64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReportSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retention_days: Option<i64>,
}
