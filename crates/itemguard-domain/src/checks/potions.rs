use super::utils::violation;
use crate::catalog;
use crate::engine::Ctx;
use crate::model::{Item, KindData, PotionData, PotionEffect, upper_key};
use itemguard_types::{Violation, ViolationCode, ids};
use serde_json::json;

/// One reason an effect is out of bounds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum EffectFault {
    Banned,
    Extreme,
    /// Over `LimitTable` tolerance; `limit` is the highest passing amplifier.
    OverTolerance { limit: u32 },
    OverAmplifierLimit { limit: u32 },
    OverDurationLimit { limit_seconds: u32 },
}

/// Faults for one effect. Banned and extreme short-circuit everything else.
pub(crate) fn effect_faults(effect: &PotionEffect, ctx: &Ctx<'_>) -> Vec<EffectFault> {
    let cfg = ctx.cfg;
    let key = upper_key(&effect.effect);
    if cfg.potions.banned_effects.contains(&key) {
        return vec![EffectFault::Banned];
    }
    if cfg
        .potions
        .extreme
        .is_extreme(effect.amplifier, effect.duration_ticks)
    {
        return vec![EffectFault::Extreme];
    }

    let mut faults = Vec::new();
    if !ctx.limits.within_tolerance(&key, effect.amplifier) {
        faults.push(EffectFault::OverTolerance {
            limit: ctx.limits.limit_amplifier(&key),
        });
    } else {
        let limit = cfg.effect_amplifier_limit(&key);
        if effect.amplifier > limit {
            faults.push(EffectFault::OverAmplifierLimit { limit });
        }
    }

    let limit_seconds = cfg.effect_duration_limit(&key);
    if effect.duration_ticks / 20 > limit_seconds {
        faults.push(EffectFault::OverDurationLimit { limit_seconds });
    }
    faults
}

pub(crate) fn potion_data(item: &Item) -> Option<&PotionData> {
    if !item.kind.family().is_potion_like() {
        return None;
    }
    match item.data()? {
        KindData::Potion(p) => Some(p),
        _ => None,
    }
}

pub fn run(item: &Item, ctx: &Ctx<'_>, out: &mut Vec<Violation>) {
    let Some(policy) = ctx.cfg.check_policy(ids::CHECK_ITEMS_POTION) else {
        return;
    };
    let Some(potion) = potion_data(item) else { return };

    let base = potion
        .base
        .as_deref()
        .map(|b| catalog::base_potion_effects(&upper_key(b)))
        .unwrap_or_default();

    let effects = potion
        .custom_effects
        .iter()
        .map(|e| (e, "custom"))
        .chain(base.iter().map(|e| (e, "base")));

    for (effect, source) in effects {
        for fault in effect_faults(effect, ctx) {
            let (code, message, limit) = describe(effect, &fault);
            out.push(violation(
                policy,
                code,
                message,
                json!({
                    "effect": effect.effect,
                    "source": source,
                    "amplifier": effect.amplifier,
                    "duration_ticks": effect.duration_ticks,
                    "limit": limit,
                }),
            ));
        }
    }
}

/// Levels are shown 1-based, durations in seconds.
fn describe(effect: &PotionEffect, fault: &EffectFault) -> (ViolationCode, String, Option<u32>) {
    let name = &effect.effect;
    let level = u64::from(effect.amplifier) + 1;
    match fault {
        EffectFault::Banned => (
            ViolationCode::BannedEffect,
            format!("banned potion effect: {name}"),
            None,
        ),
        EffectFault::Extreme => (
            ViolationCode::ExtremeEffect,
            format!(
                "extreme potion effect {name}: level {level}, {} ticks",
                effect.duration_ticks
            ),
            None,
        ),
        EffectFault::OverTolerance { limit } => (
            ViolationCode::EffectOverTolerance,
            format!(
                "effect {name} level {level} exceeds obtainable level {}",
                u64::from(*limit) + 1
            ),
            Some(*limit),
        ),
        EffectFault::OverAmplifierLimit { limit } => (
            ViolationCode::EffectAmplifierOverLimit,
            format!(
                "effect {name} level {level} exceeds configured level {}",
                u64::from(*limit) + 1
            ),
            Some(*limit),
        ),
        EffectFault::OverDurationLimit { limit_seconds } => (
            ViolationCode::EffectDurationOverLimit,
            format!(
                "effect {name} lasts {}s, over the {limit_seconds}s limit",
                effect.duration_ticks / 20
            ),
            Some(*limit_seconds),
        ),
    }
}
