use super::utils::violation;
use crate::catalog::{self, KindFamily};
use crate::engine::Ctx;
use crate::model::Item;
use itemguard_types::{Violation, ViolationCode, ids};
use serde_json::json;

/// Tags a clean item of this kind could never carry. Unknowable answers are
/// treated as legal.
pub(crate) fn is_illegal(family: KindFamily, tag: &str) -> bool {
    catalog::can_enchant(tag, family) == Some(false)
}

pub fn run(item: &Item, ctx: &Ctx<'_>, out: &mut Vec<Violation>) {
    let Some(policy) = ctx.cfg.check_policy(ids::CHECK_ITEMS_ENCHANT_LEGALITY) else {
        return;
    };
    let Some(enchantments) = item.enchantments() else {
        return;
    };

    let family = item.kind.family();
    for tag in enchantments.tags() {
        if is_illegal(family, tag) {
            out.push(violation(
                policy,
                ViolationCode::IllegalEnchant,
                format!("enchantment {tag} cannot be applied to {}", item.kind),
                json!({ "enchantment": tag, "kind": item.kind.as_str() }),
            ));
        }
    }
}
