use crate::engine::Ctx;
use crate::model::Item;
use itemguard_types::Violation;

pub(crate) mod attributes;
pub(crate) mod banned;
pub(crate) mod conflicts;
pub(crate) mod empty_data;
pub(crate) mod enchant_levels;
pub(crate) mod legality;
pub(crate) mod op_items;
pub(crate) mod potions;
pub(crate) mod structural;
pub(crate) mod unbreakable;
mod utils;

#[cfg(test)]
mod tests;

/// Detector passes in their fixed order.
pub(crate) fn run_all(item: &Item, ctx: &Ctx<'_>, out: &mut Vec<Violation>) {
    banned::run(item, ctx, out);
    attributes::run(item, ctx, out);
    enchant_levels::run(item, ctx, out);
    legality::run(item, ctx, out);
    conflicts::run(item, ctx, out);
    op_items::run(item, ctx, out);
    unbreakable::run(item, ctx, out);
    potions::run(item, ctx, out);
    structural::run(item, ctx, out);
    empty_data::run(item, ctx, out);
}
