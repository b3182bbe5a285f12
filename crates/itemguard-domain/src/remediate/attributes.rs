use crate::checks::attributes::over_limit;
use crate::engine::Ctx;
use crate::model::Item;
use itemguard_types::ids;

pub(super) fn fix_modifiers(item: &mut Item, ctx: &Ctx<'_>) {
    let cfg = ctx.cfg;
    let Some(meta) = item.meta.as_mut() else { return };

    if cfg.is_enabled(ids::CHECK_ITEMS_ATTRIBUTES) {
        for group in &mut meta.attribute_modifiers {
            let limit = cfg.attribute_limit(&group.attribute);
            if cfg.fix.downgrade_attributes && limit > 0.0 {
                for modifier in &mut group.modifiers {
                    if over_limit(modifier.amount, limit) {
                        modifier.amount = limit.copysign(modifier.amount);
                    }
                }
            } else {
                group.modifiers.retain(|m| !over_limit(m.amount, limit));
            }
        }
    }

    if cfg.is_enabled(ids::CHECK_ITEMS_OP_ITEM) {
        let cap = cfg.op_items.max_attribute_count;
        let mut excess = meta.attribute_count().saturating_sub(cap);
        // Trim from the back: last group, last modifier.
        for group in meta.attribute_modifiers.iter_mut().rev() {
            while excess > 0 && group.modifiers.pop().is_some() {
                excess -= 1;
            }
            if excess == 0 {
                break;
            }
        }
    }
}
