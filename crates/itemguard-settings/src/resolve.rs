use crate::{model::ItemguardConfigV1, presets};
use itemguard_domain::ItemKind;
use itemguard_domain::model::{enchant_tag, upper_key};
use itemguard_domain::policy::{BannedAction, CheckPolicy, ConfiscateMode, RuleConfig};
use itemguard_types::{Severity, ids};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::warn;

#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub profile: Option<String>,
}

#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    pub effective: RuleConfig,
    /// Every value that was ignored or replaced by its default.
    pub warnings: Vec<String>,
}

/// Collects fallback warnings and mirrors each one to the log.
#[derive(Default)]
struct Warnings(Vec<String>);

impl Warnings {
    fn push(&mut self, field: &str, message: String) {
        warn!(field = field, "{message}");
        self.0.push(format!("{field}: {message}"));
    }
}

pub fn resolve_config(cfg: ItemguardConfigV1, overrides: Overrides) -> ResolvedConfig {
    let mut w = Warnings::default();

    let requested = overrides
        .profile
        .or(cfg.profile.clone())
        .unwrap_or_else(|| "default".to_string());
    let mut effective = match presets::preset(&requested) {
        Some(preset) => preset,
        None => {
            w.push(
                "profile",
                format!(
                    "unknown profile '{requested}' (expected one of {}); using 'default'",
                    presets::PRESETS.join(", ")
                ),
            );
            RuleConfig::default()
        }
    };

    apply_banned(&cfg, &mut effective, &mut w);
    apply_enchantments(&cfg, &mut effective, &mut w);
    apply_attributes(&cfg, &mut effective, &mut w);
    apply_op_items(&cfg, &mut effective, &mut w);
    apply_potions(&cfg, &mut effective, &mut w);
    apply_settings(&cfg, &mut effective, &mut w);
    apply_check_switches(&cfg, &mut effective, &mut w);

    ResolvedConfig {
        effective,
        warnings: w.0,
    }
}

fn apply_banned(cfg: &ItemguardConfigV1, out: &mut RuleConfig, w: &mut Warnings) {
    let section = &cfg.banned;
    if let Some(action) = section.action.as_deref() {
        match action {
            "delete" => out.banned.action = BannedAction::Delete,
            "notify" => out.banned.action = BannedAction::Notify,
            other => w.push(
                "banned.action",
                format!("unknown action '{other}' (expected delete|notify); using 'delete'"),
            ),
        }
    }
    for raw in &section.kinds {
        match kind_name(raw) {
            Some(kind) => {
                out.banned.kinds.insert(kind);
            }
            None => w.push("banned.kinds", format!("ignoring blank item kind '{raw}'")),
        }
    }
    for raw in &section.spawn_eggs {
        match kind_name(raw).filter(|k| k.as_str().ends_with("_SPAWN_EGG")) {
            Some(kind) => {
                out.banned.spawn_eggs.insert(kind);
            }
            None => w.push("banned.spawn_eggs", format!("'{raw}' is not a spawn egg kind")),
        }
    }
    out.banned
        .name_keywords
        .extend(section.name_keywords.iter().filter(|k| !k.is_empty()).cloned());
    out.banned
        .lore_keywords
        .extend(section.lore_keywords.iter().filter(|k| !k.is_empty()).cloned());
}

fn apply_enchantments(cfg: &ItemguardConfigV1, out: &mut RuleConfig, w: &mut Warnings) {
    let section = &cfg.enchantments;
    let rules = &mut out.enchantments;
    if let Some(v) = section.max_level {
        rules.max_level = to_u32("enchantments.max_level", v, rules.max_level, w);
    }
    if let Some(v) = section.use_vanilla_max_for_unconfigured {
        rules.use_vanilla_max_for_unconfigured = v;
    }
    if let Some(v) = section.unconfigured_multiplier {
        rules.unconfigured_multiplier = positive_f64(
            "enchantments.unconfigured_multiplier",
            v,
            rules.unconfigured_multiplier,
            w,
        );
    }
    let limits = integer_table("enchantments.limits", &section.limits, w);
    rules
        .overrides
        .extend(limits.into_iter().map(|(k, v)| (enchant_tag(&k), v)));
}

fn apply_attributes(cfg: &ItemguardConfigV1, out: &mut RuleConfig, w: &mut Warnings) {
    let section = &cfg.attributes;
    if let Some(v) = section.max_amount {
        out.attributes.max_amount =
            positive_f64("attributes.max_amount", v, out.attributes.max_amount, w);
    }
    for (key, value) in &section.limits {
        let field = format!("attributes.limits.{key}");
        match value.as_f64().filter(|v| v.is_finite() && *v >= 0.0) {
            Some(limit) => {
                out.attributes.overrides.insert(upper_key(key), limit);
            }
            None => w.push(&field, format!("invalid limit {value}; entry ignored")),
        }
    }
}

fn apply_op_items(cfg: &ItemguardConfigV1, out: &mut RuleConfig, w: &mut Warnings) {
    let section = &cfg.op_items;
    let rules = &mut out.op_items;
    if let Some(v) = section.max_total_enchantment_level {
        rules.max_total_enchantment_level = match u64::try_from(v) {
            Ok(v) => v,
            Err(_) => {
                w.push(
                    "op_items.max_total_enchantment_level",
                    format!("{v} is negative; using {}", rules.max_total_enchantment_level),
                );
                rules.max_total_enchantment_level
            }
        };
    }
    if let Some(v) = section.max_enchantment_multiplier {
        rules.max_enchantment_multiplier = positive_f64(
            "op_items.max_enchantment_multiplier",
            v,
            rules.max_enchantment_multiplier,
            w,
        );
    }
    if let Some(v) = section.max_attribute_count {
        rules.max_attribute_count = match usize::try_from(v) {
            Ok(v) => v,
            Err(_) => {
                w.push(
                    "op_items.max_attribute_count",
                    format!("{v} is negative; using {}", rules.max_attribute_count),
                );
                rules.max_attribute_count
            }
        };
    }
}

fn apply_potions(cfg: &ItemguardConfigV1, out: &mut RuleConfig, w: &mut Warnings) {
    let section = &cfg.potions;
    let rules = &mut out.potions;
    if let Some(v) = section.max_amplifier {
        rules.max_amplifier = to_u32("potions.max_amplifier", v, rules.max_amplifier, w);
    }
    if let Some(v) = section.max_duration_seconds {
        rules.max_duration_seconds =
            to_u32("potions.max_duration_seconds", v, rules.max_duration_seconds, w);
    }
    if let Some(v) = section.extreme_amplifier {
        rules.extreme.amplifier =
            to_u32("potions.extreme_amplifier", v, rules.extreme.amplifier, w);
    }
    if let Some(v) = section.extreme_duration_ticks {
        rules.extreme.duration_ticks = to_u32(
            "potions.extreme_duration_ticks",
            v,
            rules.extreme.duration_ticks,
            w,
        );
    }
    rules.banned_effects.extend(
        section
            .banned_effects
            .iter()
            .map(|e| upper_key(e.as_str()))
            .filter(|e| !e.is_empty()),
    );
    let amplifiers = integer_table("potions.amplifier_limits", &section.amplifier_limits, w);
    rules
        .amplifier_overrides
        .extend(amplifiers.into_iter().map(|(k, v)| (upper_key(&k), v)));
    let durations = integer_table("potions.duration_limits", &section.duration_limits, w);
    rules
        .duration_overrides
        .extend(durations.into_iter().map(|(k, v)| (upper_key(&k), v)));
}

fn apply_settings(cfg: &ItemguardConfigV1, out: &mut RuleConfig, w: &mut Warnings) {
    let fix = &cfg.fix;
    set(&mut out.fix.downgrade_enchantments, fix.downgrade_enchantments);
    set(&mut out.fix.downgrade_attributes, fix.downgrade_attributes);
    set(&mut out.fix.remove_unbreakable, fix.remove_unbreakable);

    let actions = &cfg.actions;
    set(&mut out.actions.confiscate_items, actions.confiscate_items);
    set(&mut out.actions.strict_mode, actions.strict_mode);
    set(&mut out.actions.log_violations, actions.log_violations);
    if let Some(mode) = actions.mode.as_deref() {
        match mode {
            "delete" => out.actions.mode = ConfiscateMode::Delete,
            "store" => out.actions.mode = ConfiscateMode::Store,
            "fix" => out.actions.mode = ConfiscateMode::Fix,
            other => w.push(
                "actions.mode",
                format!("unknown mode '{other}' (expected delete|store|fix); using 'delete'"),
            ),
        }
    }

    let monitor = &cfg.monitor;
    set(&mut out.monitor.enabled, monitor.enabled);
    set(&mut out.monitor.auto_fix, monitor.auto_fix);
    set(&mut out.monitor.auto_delete, monitor.auto_delete);
    if let Some(v) = monitor.scan_interval_ticks {
        let ticks = to_u32("monitor.scan_interval_ticks", v, out.monitor.scan_interval_ticks, w);
        if ticks == 0 {
            w.push(
                "monitor.scan_interval_ticks",
                format!("0 is not a valid interval; using {}", out.monitor.scan_interval_ticks),
            );
        } else {
            out.monitor.scan_interval_ticks = ticks;
        }
    }
    if let Some(v) = monitor.max_violation_history {
        out.monitor.max_violation_history = match usize::try_from(v) {
            Ok(v) => v,
            Err(_) => {
                w.push(
                    "monitor.max_violation_history",
                    format!("{v} is negative; using {}", out.monitor.max_violation_history),
                );
                out.monitor.max_violation_history
            }
        };
    }

    let reports = &cfg.reports;
    set(&mut out.reports.enabled, reports.enabled);
    if let Some(v) = reports.retention_days {
        out.reports.retention_days =
            to_u32("reports.retention_days", v, out.reports.retention_days, w);
    }
}

/// Section switches first, then the master switch, then explicit per-check
/// policy. A later layer always wins.
fn apply_check_switches(cfg: &ItemguardConfigV1, out: &mut RuleConfig, w: &mut Warnings) {
    let sections = [
        (ids::CHECK_ITEMS_BANNED, cfg.banned.enabled),
        (ids::CHECK_ITEMS_ENCHANT_CONFLICT, cfg.conflicts.enabled),
        (ids::CHECK_ITEMS_OP_ITEM, cfg.op_items.enabled),
        (ids::CHECK_ITEMS_POTION, cfg.potions.enabled),
    ];
    for (check_id, enabled) in sections {
        if let (Some(enabled), Some(policy)) = (enabled, out.checks.get_mut(check_id)) {
            policy.enabled = enabled;
        }
    }

    if cfg.enabled == Some(false) {
        for policy in out.checks.values_mut() {
            policy.enabled = false;
        }
    }

    for (check_id, cc) in &cfg.checks {
        if !ids::ALL_CHECKS.contains(&check_id.as_str()) {
            w.push("checks", format!("unknown check id '{check_id}'; entry ignored"));
            continue;
        }
        let entry = out
            .checks
            .entry(check_id.clone())
            .or_insert_with(CheckPolicy::disabled);
        if let Some(enabled) = cc.enabled {
            entry.enabled = enabled;
        }
        if let Some(sev) = cc.severity.as_deref() {
            match parse_severity(sev) {
                Some(severity) => entry.severity = severity,
                None => w.push(
                    &format!("checks.{check_id}.severity"),
                    format!(
                        "unknown severity '{sev}' (expected info|warning|error); keeping {}",
                        entry.severity.as_str()
                    ),
                ),
            }
        }
    }
}

fn parse_severity(v: &str) -> Option<Severity> {
    match v {
        "info" => Some(Severity::Info),
        "warning" | "warn" => Some(Severity::Warning),
        "error" => Some(Severity::Error),
        _ => None,
    }
}

fn set(slot: &mut bool, value: Option<bool>) {
    if let Some(value) = value {
        *slot = value;
    }
}

fn kind_name(raw: &str) -> Option<ItemKind> {
    let kind = ItemKind::new(raw);
    (!kind.as_str().is_empty()).then_some(kind)
}

fn to_u32(field: &str, value: i64, default: u32, w: &mut Warnings) -> u32 {
    match u32::try_from(value) {
        Ok(v) => v,
        Err(_) => {
            w.push(field, format!("{value} is out of range; using {default}"));
            default
        }
    }
}

fn positive_f64(field: &str, value: f64, default: f64, w: &mut Warnings) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        w.push(field, format!("{value} must be a positive number; using {default}"));
        default
    }
}

/// Non-negative integer entries of a `key = n` table; anything else is
/// dropped with a warning.
fn integer_table(
    field: &str,
    table: &BTreeMap<String, Value>,
    w: &mut Warnings,
) -> BTreeMap<String, u32> {
    let mut out = BTreeMap::new();
    for (key, value) in table {
        match value.as_u64().and_then(|v| u32::try_from(v).ok()) {
            Some(v) => {
                out.insert(key.clone(), v);
            }
            None => w.push(
                &format!("{field}.{key}"),
                format!("invalid limit {value}; entry ignored"),
            ),
        }
    }
    out
}
