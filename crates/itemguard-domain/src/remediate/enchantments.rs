use crate::checks::enchant_levels::enchant_limit;
use crate::checks::legality::is_illegal;
use crate::checks::op_items::op_level_cap;
use crate::engine::Ctx;
use crate::model::Item;
use itemguard_types::ids;
use std::collections::HashSet;

pub(super) fn strip_illegal(item: &mut Item, ctx: &Ctx<'_>) {
    if !ctx.cfg.is_enabled(ids::CHECK_ITEMS_ENCHANT_LEGALITY) {
        return;
    }
    let family = item.kind.family();
    let Some(meta) = item.meta.as_mut() else { return };
    meta.enchantments.retain(|tag, _| !is_illegal(family, tag));
}

/// Both sides of every conflict go; there is no winner.
pub(super) fn strip_conflicts(item: &mut Item, ctx: &Ctx<'_>) {
    if !ctx.cfg.is_enabled(ids::CHECK_ITEMS_ENCHANT_CONFLICT) {
        return;
    }
    let kind = item.kind.clone();
    let Some(meta) = item.meta.as_mut() else { return };
    let doomed: HashSet<String> = ctx
        .conflicts
        .groups_for(&kind, &meta.enchantments)
        .into_iter()
        .flatten()
        .collect();
    if !doomed.is_empty() {
        meta.enchantments.retain(|tag, _| !doomed.contains(tag));
    }
}

/// Downgrade or drop anything over its per-tag limit.
pub(super) fn enforce_levels(item: &mut Item, ctx: &Ctx<'_>) {
    let cfg = ctx.cfg;
    let level_check = cfg.is_enabled(ids::CHECK_ITEMS_ENCHANT_LEVEL);
    let op_check = cfg.is_enabled(ids::CHECK_ITEMS_OP_ITEM);
    if !level_check && !op_check {
        return;
    }
    let Some(meta) = item.meta.as_mut() else { return };

    let limit_of = |tag: &str| -> Option<u32> {
        let configured = level_check.then(|| enchant_limit(cfg, tag));
        let op = if op_check { op_level_cap(cfg, tag) } else { None };
        match (configured, op) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    };

    let mut downgrades = Vec::new();
    let mut removals = Vec::new();
    for (tag, level) in meta.enchantments.iter() {
        let Some(limit) = limit_of(tag) else { continue };
        if level <= limit {
            continue;
        }
        if limit > 0 && cfg.fix.downgrade_enchantments {
            downgrades.push((tag.to_string(), limit));
        } else {
            removals.push(tag.to_string());
        }
    }
    for (tag, limit) in downgrades {
        meta.enchantments.insert(&tag, limit);
    }
    for tag in removals {
        meta.enchantments.remove(&tag);
    }
}

/// Remove highest-level-first until the total fits. Ties go to the earliest tag.
pub(super) fn enforce_total(item: &mut Item, ctx: &Ctx<'_>) {
    if !ctx.cfg.is_enabled(ids::CHECK_ITEMS_OP_ITEM) {
        return;
    }
    let cap = ctx.cfg.op_items.max_total_enchantment_level;
    let Some(meta) = item.meta.as_mut() else { return };

    while meta.enchantments.total_level() > cap {
        let mut highest: Option<(&str, u32)> = None;
        for (tag, level) in meta.enchantments.iter() {
            if highest.is_none_or(|(_, best)| level > best) {
                highest = Some((tag, level));
            }
        }
        let Some((tag, _)) = highest else { break };
        let tag = tag.to_string();
        meta.enchantments.remove(&tag);
    }
}
