use super::utils::violation;
use crate::catalog;
use crate::engine::Ctx;
use crate::model::Item;
use crate::policy::RuleConfig;
use itemguard_types::{Violation, ViolationCode, ids};
use serde_json::json;

/// Configured limit: override, then scaled vanilla max, then the global cap.
pub(crate) fn enchant_limit(cfg: &RuleConfig, tag: &str) -> u32 {
    if let Some(limit) = cfg.enchant_override(tag) {
        return limit;
    }
    let rules = &cfg.enchantments;
    if rules.use_vanilla_max_for_unconfigured
        && let Some(max) = catalog::vanilla_max_level(tag)
    {
        return scaled(max, rules.unconfigured_multiplier).ceil() as u32;
    }
    rules.max_level
}

pub(crate) fn scaled(max: u32, multiplier: f64) -> f64 {
    f64::from(max) * multiplier
}

pub fn run(item: &Item, ctx: &Ctx<'_>, out: &mut Vec<Violation>) {
    let Some(policy) = ctx.cfg.check_policy(ids::CHECK_ITEMS_ENCHANT_LEVEL) else {
        return;
    };
    let Some(enchantments) = item.enchantments() else {
        return;
    };

    for (tag, level) in enchantments.iter() {
        let limit = enchant_limit(ctx.cfg, tag);
        if level > limit {
            out.push(violation(
                policy,
                ViolationCode::EnchantOverLimit,
                format!("enchantment {tag} level {level} exceeds limit {limit}"),
                json!({ "enchantment": tag, "level": level, "limit": limit }),
            ));
        }
    }
}
