use super::utils::violation;
use crate::engine::Ctx;
use crate::model::Item;
use crate::policy::{CheckPolicy, RuleConfig};
use itemguard_types::{Violation, ViolationCode, ids};
use serde_json::json;

/// No obtainable item is unbreakable. Detection follows the fix switch.
pub(crate) fn policy(cfg: &RuleConfig) -> Option<&CheckPolicy> {
    cfg.check_policy(ids::CHECK_ITEMS_UNBREAKABLE)
        .filter(|_| cfg.fix.remove_unbreakable)
}

pub fn run(item: &Item, ctx: &Ctx<'_>, out: &mut Vec<Violation>) {
    let Some(policy) = policy(ctx.cfg) else { return };
    if item.meta.as_ref().is_some_and(|m| m.unbreakable) {
        out.push(violation(
            policy,
            ViolationCode::Unbreakable,
            format!("{} is flagged unbreakable", item.kind),
            json!({ "kind": item.kind.as_str() }),
        ));
    }
}
