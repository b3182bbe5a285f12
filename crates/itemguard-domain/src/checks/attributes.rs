use super::utils::violation;
use crate::engine::Ctx;
use crate::model::Item;
use itemguard_types::{Violation, ViolationCode, ids};
use serde_json::json;

/// `|amount| > limit`. NaN amounts never exceed a limit.
pub(crate) fn over_limit(amount: f64, limit: f64) -> bool {
    amount.abs() > limit
}

pub fn run(item: &Item, ctx: &Ctx<'_>, out: &mut Vec<Violation>) {
    let Some(policy) = ctx.cfg.check_policy(ids::CHECK_ITEMS_ATTRIBUTES) else {
        return;
    };
    let Some(meta) = &item.meta else { return };

    for group in &meta.attribute_modifiers {
        let limit = ctx.cfg.attribute_limit(&group.attribute);
        for modifier in &group.modifiers {
            if over_limit(modifier.amount, limit) {
                out.push(violation(
                    policy,
                    ViolationCode::AttributeOverLimit,
                    format!(
                        "attribute {} modifier {} exceeds limit {}",
                        group.attribute, modifier.amount, limit
                    ),
                    json!({
                        "attribute": group.attribute,
                        "amount": modifier.amount,
                        "limit": limit,
                    }),
                ));
            }
        }
    }
}
