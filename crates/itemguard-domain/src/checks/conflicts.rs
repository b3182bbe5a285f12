use super::utils::violation;
use crate::engine::Ctx;
use crate::model::Item;
use itemguard_types::{Violation, ViolationCode, ids};
use serde_json::json;

pub fn run(item: &Item, ctx: &Ctx<'_>, out: &mut Vec<Violation>) {
    let Some(policy) = ctx.cfg.check_policy(ids::CHECK_ITEMS_ENCHANT_CONFLICT) else {
        return;
    };
    let Some(enchantments) = item.enchantments() else {
        return;
    };

    for group in ctx.conflicts.groups_for(&item.kind, enchantments) {
        out.push(violation(
            policy,
            ViolationCode::ConflictingEnchants,
            format!("conflicting enchantments: {}", group.join(", ")),
            json!({ "enchantments": group }),
        ));
    }
}
