use crate::limits::ExtremeThresholds;
use crate::model::{ItemKind, enchant_tag, upper_key};
use itemguard_types::{Severity, ids};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Clone, Debug, PartialEq)]
pub struct CheckPolicy {
    pub enabled: bool,
    pub severity: Severity,
}

impl CheckPolicy {
    pub fn enabled(severity: Severity) -> Self {
        Self {
            enabled: true,
            severity,
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            severity: Severity::Info,
        }
    }
}

/// What to do with a banned item.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BannedAction {
    #[default]
    Delete,
    Notify,
}

/// What to do with a violating item when confiscation is on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConfiscateMode {
    #[default]
    Delete,
    Store,
    Fix,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct BannedRules {
    pub action: BannedAction,
    pub kinds: BTreeSet<ItemKind>,
    pub spawn_eggs: BTreeSet<ItemKind>,
    pub name_keywords: Vec<String>,
    pub lore_keywords: Vec<String>,
}

impl BannedRules {
    pub fn is_banned(&self, kind: &ItemKind) -> bool {
        self.kinds.contains(kind) || self.spawn_eggs.contains(kind)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct EnchantmentRules {
    pub max_level: u32,
    pub use_vanilla_max_for_unconfigured: bool,
    pub unconfigured_multiplier: f64,
    /// Per-tag overrides keyed by normalized tag.
    pub overrides: BTreeMap<String, u32>,
}

impl Default for EnchantmentRules {
    fn default() -> Self {
        Self {
            max_level: 10,
            use_vanilla_max_for_unconfigured: true,
            unconfigured_multiplier: 1.0,
            overrides: BTreeMap::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AttributeRules {
    pub max_amount: f64,
    pub overrides: BTreeMap<String, f64>,
}

impl Default for AttributeRules {
    fn default() -> Self {
        Self {
            max_amount: 100.0,
            overrides: BTreeMap::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct OpItemRules {
    pub max_total_enchantment_level: u64,
    pub max_enchantment_multiplier: f64,
    pub max_attribute_count: usize,
}

impl Default for OpItemRules {
    fn default() -> Self {
        Self {
            max_total_enchantment_level: 50,
            max_enchantment_multiplier: 2.0,
            max_attribute_count: 10,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PotionRules {
    pub max_amplifier: u32,
    pub max_duration_seconds: u32,
    pub amplifier_overrides: BTreeMap<String, u32>,
    pub duration_overrides: BTreeMap<String, u32>,
    pub banned_effects: BTreeSet<String>,
    pub extreme: ExtremeThresholds,
}

impl Default for PotionRules {
    fn default() -> Self {
        Self {
            max_amplifier: 2,
            max_duration_seconds: 600,
            amplifier_overrides: BTreeMap::new(),
            duration_overrides: BTreeMap::new(),
            banned_effects: BTreeSet::new(),
            extreme: ExtremeThresholds::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FixSettings {
    pub downgrade_enchantments: bool,
    pub downgrade_attributes: bool,
    /// Also gates detection of the unbreakable flag.
    pub remove_unbreakable: bool,
}

impl Default for FixSettings {
    fn default() -> Self {
        Self {
            downgrade_enchantments: false,
            downgrade_attributes: false,
            remove_unbreakable: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ActionSettings {
    pub confiscate_items: bool,
    pub mode: ConfiscateMode,
    pub strict_mode: bool,
    pub log_violations: bool,
}

impl Default for ActionSettings {
    fn default() -> Self {
        Self {
            confiscate_items: true,
            mode: ConfiscateMode::Delete,
            strict_mode: false,
            log_violations: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MonitorSettings {
    pub enabled: bool,
    pub scan_interval_ticks: u32,
    pub auto_fix: bool,
    pub auto_delete: bool,
    pub max_violation_history: usize,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            scan_interval_ticks: 20,
            auto_fix: false,
            auto_delete: false,
            max_violation_history: 100,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ReportSettings {
    pub enabled: bool,
    pub retention_days: u32,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            retention_days: 30,
        }
    }
}

/// Immutable rule snapshot. Built once per load; never mutated afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct RuleConfig {
    pub profile: String,
    pub checks: BTreeMap<String, CheckPolicy>,
    pub banned: BannedRules,
    pub enchantments: EnchantmentRules,
    pub attributes: AttributeRules,
    pub op_items: OpItemRules,
    pub potions: PotionRules,
    pub fix: FixSettings,
    pub actions: ActionSettings,
    pub monitor: MonitorSettings,
    pub reports: ReportSettings,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            profile: "default".to_string(),
            checks: ids::ALL_CHECKS
                .iter()
                .map(|id| ((*id).to_string(), CheckPolicy::enabled(Severity::Error)))
                .collect(),
            banned: BannedRules::default(),
            enchantments: EnchantmentRules::default(),
            attributes: AttributeRules::default(),
            op_items: OpItemRules::default(),
            potions: PotionRules::default(),
            fix: FixSettings::default(),
            actions: ActionSettings::default(),
            monitor: MonitorSettings::default(),
            reports: ReportSettings::default(),
        }
    }
}

impl RuleConfig {
    pub fn check_policy(&self, check_id: &str) -> Option<&CheckPolicy> {
        self.checks.get(check_id).filter(|p| p.enabled)
    }

    pub fn is_enabled(&self, check_id: &str) -> bool {
        self.check_policy(check_id).is_some()
    }

    /// Configured amplifier limit for an effect: override, else `max_amplifier`.
    pub fn effect_amplifier_limit(&self, effect: &str) -> u32 {
        self.potions
            .amplifier_overrides
            .get(&upper_key(effect))
            .copied()
            .unwrap_or(self.potions.max_amplifier)
    }

    /// Duration limit in seconds: override, else `max_duration_seconds`.
    pub fn effect_duration_limit(&self, effect: &str) -> u32 {
        self.potions
            .duration_overrides
            .get(&upper_key(effect))
            .copied()
            .unwrap_or(self.potions.max_duration_seconds)
    }

    pub fn attribute_limit(&self, attribute: &str) -> f64 {
        self.attributes
            .overrides
            .get(&upper_key(attribute))
            .copied()
            .unwrap_or(self.attributes.max_amount)
    }

    pub fn enchant_override(&self, tag: &str) -> Option<u32> {
        self.enchantments.overrides.get(&enchant_tag(tag)).copied()
    }
}
