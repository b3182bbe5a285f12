use super::enchant_levels::scaled;
use super::utils::violation;
use crate::catalog;
use crate::engine::Ctx;
use crate::model::Item;
use crate::policy::RuleConfig;
use itemguard_types::{Violation, ViolationCode, ids};
use serde_json::json;

/// Highest single level an OP check tolerates; `None` for tags without a
/// known vanilla max.
pub(crate) fn op_level_cap(cfg: &RuleConfig, tag: &str) -> Option<u32> {
    let max = catalog::vanilla_max_level(tag)?;
    Some(scaled(max, cfg.op_items.max_enchantment_multiplier).floor() as u32)
}

pub fn run(item: &Item, ctx: &Ctx<'_>, out: &mut Vec<Violation>) {
    let Some(policy) = ctx.cfg.check_policy(ids::CHECK_ITEMS_OP_ITEM) else {
        return;
    };
    let Some(meta) = &item.meta else { return };
    let rules = &ctx.cfg.op_items;

    let total = meta.enchantments.total_level();
    if total > rules.max_total_enchantment_level {
        out.push(violation(
            policy,
            ViolationCode::OpTotalLevel,
            format!(
                "total enchantment level {total} exceeds cap {}",
                rules.max_total_enchantment_level
            ),
            json!({ "total": total, "cap": rules.max_total_enchantment_level }),
        ));
    }

    for (tag, level) in meta.enchantments.iter() {
        let Some(cap) = op_level_cap(ctx.cfg, tag) else { continue };
        if level > cap {
            out.push(violation(
                policy,
                ViolationCode::OpEnchantLevel,
                format!(
                    "enchantment {tag} level {level} exceeds {}x vanilla max ({cap})",
                    rules.max_enchantment_multiplier
                ),
                json!({ "enchantment": tag, "level": level, "cap": cap }),
            ));
        }
    }

    let count = meta.attribute_count();
    if count > rules.max_attribute_count {
        out.push(violation(
            policy,
            ViolationCode::OpAttributeCount,
            format!(
                "{count} attribute modifiers exceed cap {}",
                rules.max_attribute_count
            ),
            json!({ "count": count, "cap": rules.max_attribute_count }),
        ));
    }
}
