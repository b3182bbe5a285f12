use super::remediate_at;
use crate::catalog;
use crate::checks::structural::{child_is_violating, is_entity_tampered};
use crate::engine::{Ctx, MAX_CONTAINER_DEPTH};
use crate::model::{Item, KindData};
use itemguard_types::ids;

/// Recursively fix contents; drop whatever cannot be made compliant.
pub(super) fn fix_contents(item: &mut Item, ctx: &Ctx<'_>) {
    if !ctx.cfg.is_enabled(ids::CHECK_ITEMS_STRUCTURE) {
        return;
    }
    let family = item.kind.family();
    if !family.holds_items() {
        return;
    }
    let capacity = catalog::capacity_of(item.kind.as_str(), family);
    let Some(KindData::Container(held) | KindData::Bundle(held)) =
        item.meta.as_mut().and_then(|m| m.data.as_mut())
    else {
        return;
    };
    if held.items.is_empty() {
        return;
    }
    if ctx.depth >= MAX_CONTAINER_DEPTH {
        held.items.clear();
        return;
    }
    if let Some(capacity) = capacity {
        held.items.truncate(capacity);
    }

    let banned_check = ctx.cfg.is_enabled(ids::CHECK_ITEMS_BANNED);
    let nested = ctx.nested();
    let children = std::mem::take(&mut held.items);
    held.items = children
        .into_iter()
        .filter_map(|child| {
            if nested.is_exempt(&child) {
                return Some(child);
            }
            if (banned_check && ctx.cfg.banned.is_banned(&child.kind)) || is_entity_tampered(&child)
            {
                return None;
            }
            let fixed = remediate_at(&child, &nested);
            (!child_is_violating(&fixed, &nested)).then_some(fixed)
        })
        .collect();
}
