use itemguard_domain::policy::{CheckPolicy, ConfiscateMode, RuleConfig};
use itemguard_types::{Severity, ids};
use std::collections::BTreeMap;

pub const PRESETS: &[&str] = &["default", "strict", "lenient"];

/// Preset profiles are opinionated defaults.
///
/// Unknown names return `None`; the resolver warns and falls back to `default`.
pub fn preset(profile: &str) -> Option<RuleConfig> {
    match profile {
        "default" => Some(default_profile()),
        "strict" => Some(strict_profile()),
        "lenient" => Some(lenient_profile()),
        _ => None,
    }
}

fn default_profile() -> RuleConfig {
    RuleConfig::default()
}

fn strict_profile() -> RuleConfig {
    let mut cfg = RuleConfig {
        profile: "strict".to_string(),
        checks: default_checks(Severity::Error),
        ..RuleConfig::default()
    };
    cfg.op_items.max_total_enchantment_level = 40;
    cfg.op_items.max_enchantment_multiplier = 1.5;
    cfg.potions.max_amplifier = 1;
    cfg.actions.strict_mode = true;
    cfg.monitor.auto_delete = true;
    cfg
}

// Reports as warnings and repairs in place instead of deleting.
fn lenient_profile() -> RuleConfig {
    let mut cfg = RuleConfig {
        profile: "lenient".to_string(),
        checks: default_checks(Severity::Warning),
        ..RuleConfig::default()
    };
    cfg.op_items.max_total_enchantment_level = 100;
    cfg.fix.downgrade_enchantments = true;
    cfg.fix.downgrade_attributes = true;
    cfg.actions.mode = ConfiscateMode::Fix;
    cfg.monitor.auto_fix = true;
    cfg
}

fn default_checks(severity: Severity) -> BTreeMap<String, CheckPolicy> {
    ids::ALL_CHECKS
        .iter()
        .map(|id| ((*id).to_string(), CheckPolicy::enabled(severity)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_preset_resolves_and_names_itself() {
        for name in PRESETS {
            let cfg = preset(name).expect("known preset");
            assert_eq!(cfg.profile, *name);
            assert_eq!(cfg.checks.len(), ids::ALL_CHECKS.len());
        }
        assert!(preset("paranoid").is_none());
    }

    #[test]
    fn lenient_reports_warnings_and_fixes() {
        let cfg = preset("lenient").expect("lenient");
        assert!(cfg.checks.values().all(|p| p.severity == Severity::Warning));
        assert_eq!(cfg.actions.mode, ConfiscateMode::Fix);
        assert!(cfg.fix.downgrade_enchantments);
    }
}
