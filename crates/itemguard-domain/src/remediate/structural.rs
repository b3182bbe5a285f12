use crate::catalog;
use crate::checks::empty_data::{has_stray_glint, payload_faults};
use crate::checks::structural::{
    FIREWORK_MAX_POWER, FIREWORK_MIN_POWER, piston_faults, spawn_egg_faults,
};
use crate::checks::unbreakable;
use crate::engine::Ctx;
use crate::model::{Item, KindData};
use itemguard_types::ids;

pub(super) fn clear_unbreakable(item: &mut Item, ctx: &Ctx<'_>) {
    if unbreakable::policy(ctx.cfg).is_none() {
        return;
    }
    if let Some(meta) = item.meta.as_mut() {
        meta.unbreakable = false;
    }
}

/// Tampered eggs are rebuilt from a clean template of the same kind.
pub(super) fn rebuild_spawn_egg(item: &mut Item, ctx: &Ctx<'_>) {
    if ctx.cfg.is_enabled(ids::CHECK_ITEMS_STRUCTURE) && !spawn_egg_faults(item).is_empty() {
        *item = item.clean_copy();
    }
}

pub(super) fn clamp_firework(item: &mut Item, ctx: &Ctx<'_>) {
    if !ctx.cfg.is_enabled(ids::CHECK_ITEMS_STRUCTURE) {
        return;
    }
    if let Some(KindData::Firework(firework)) = item.meta.as_mut().and_then(|m| m.data.as_mut())
        && item.kind.family() == catalog::KindFamily::FireworkRocket
    {
        firework.power = firework.power.clamp(FIREWORK_MIN_POWER, FIREWORK_MAX_POWER);
    }
}

pub(super) fn rebuild_piston(item: &mut Item, ctx: &Ctx<'_>) {
    if ctx.cfg.is_enabled(ids::CHECK_ITEMS_STRUCTURE) && !piston_faults(item).is_empty() {
        *item = item.clean_copy();
    }
}

/// Hollow books and maps become the blank item of their family; only the
/// amount survives.
pub(super) fn replace_empty_data(item: &mut Item, ctx: &Ctx<'_>) {
    if !ctx.cfg.is_enabled(ids::CHECK_ITEMS_EMPTY_DATA) {
        return;
    }
    if !payload_faults(item).is_empty()
        && let Some(blank) = catalog::blank_replacement(item.kind.family())
    {
        *item = Item::new(blank, item.amount);
        return;
    }
    if has_stray_glint(item)
        && let Some(meta) = item.meta.as_mut()
    {
        meta.glint = None;
    }
}
