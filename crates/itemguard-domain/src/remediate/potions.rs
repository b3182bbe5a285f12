use crate::catalog;
use crate::checks::potions::{EffectFault, effect_faults};
use crate::engine::Ctx;
use crate::model::{Item, KindData, upper_key};
use itemguard_types::ids;

/// An extreme effect anywhere wipes every custom effect; otherwise only the
/// faulted ones go. A faulted base type is cleared.
pub(super) fn fix_effects(item: &mut Item, ctx: &Ctx<'_>) {
    if !ctx.cfg.is_enabled(ids::CHECK_ITEMS_POTION) || !item.kind.family().is_potion_like() {
        return;
    }
    let Some(KindData::Potion(potion)) = item.meta.as_mut().and_then(|m| m.data.as_mut()) else {
        return;
    };

    let base = potion
        .base
        .as_deref()
        .map(|b| catalog::base_potion_effects(&upper_key(b)))
        .unwrap_or_default();
    let base_faults: Vec<Vec<EffectFault>> = base.iter().map(|e| effect_faults(e, ctx)).collect();

    let extreme = potion
        .custom_effects
        .iter()
        .map(|e| effect_faults(e, ctx))
        .chain(base_faults.iter().cloned())
        .any(|faults| faults.contains(&EffectFault::Extreme));

    if extreme {
        potion.custom_effects.clear();
    } else {
        potion
            .custom_effects
            .retain(|e| effect_faults(e, ctx).is_empty());
    }
    if base_faults.iter().any(|f| !f.is_empty()) {
        potion.base = None;
    }
}
