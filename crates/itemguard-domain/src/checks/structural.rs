//! Kind-specific structure: spawn eggs, firework rockets, pistons and
//! anything that holds other items.

use super::utils::violation;
use crate::catalog::{self, KindFamily};
use crate::engine::{Ctx, MAX_CONTAINER_DEPTH, evaluate_at};
use crate::model::{Item, KindData, upper_key};
use crate::policy::CheckPolicy;
use itemguard_types::{Violation, ViolationCode, ids};
use serde_json::json;

pub const FIREWORK_MIN_POWER: i32 = 0;
pub const FIREWORK_MAX_POWER: i32 = 3;

/// Display-name fragments used to smuggle invisible or posed entities.
pub const TAMPER_MARKERS: &[&str] = &["Invisible", "隐形", "arms", "Arms", "small", "Small"];

/// Item frames and armor stands carrying plugin data or a tamper marker.
pub fn is_entity_tampered(item: &Item) -> bool {
    if !catalog::is_entity_item(item.kind.family()) {
        return false;
    }
    let Some(meta) = &item.meta else { return false };
    !meta.persistent_data.is_empty()
        || meta
            .display_name
            .as_deref()
            .is_some_and(|name| TAMPER_MARKERS.iter().any(|m| name.contains(m)))
}

/// Spawn-egg tampering codes, in report order.
pub(crate) fn spawn_egg_faults(item: &Item) -> Vec<ViolationCode> {
    let mut faults = Vec::new();
    if item.kind.family() != KindFamily::SpawnEgg {
        return faults;
    }
    let Some(meta) = &item.meta else { return faults };

    if meta.unbreakable {
        faults.push(ViolationCode::SpawnEggUnbreakable);
    }
    if !meta.enchantments.is_empty() {
        faults.push(ViolationCode::SpawnEggEnchanted);
    }
    if !meta.attribute_modifiers.is_empty() {
        faults.push(ViolationCode::SpawnEggAttributes);
    }
    if let Some(KindData::SpawnEgg(egg)) = &meta.data {
        let implied = catalog::spawn_egg_entity(item.kind.as_str());
        if let (Some(spawned), Some(implied)) = (&egg.spawned_type, implied)
            && upper_key(spawned) != implied
        {
            faults.push(ViolationCode::SpawnEggEntityMismatch);
        }
        if egg.entity_snapshot.as_ref().is_some_and(|v| !v.is_null()) {
            faults.push(ViolationCode::SpawnEggCustomEntity);
        }
    }
    if !meta.persistent_data.is_empty() {
        faults.push(ViolationCode::SpawnEggPersistentData);
    }
    faults
}

pub(crate) fn firework_power(item: &Item) -> Option<i32> {
    if item.kind.family() != KindFamily::FireworkRocket {
        return None;
    }
    match item.data()? {
        KindData::Firework(f) => Some(f.power),
        _ => None,
    }
}

pub(crate) fn piston_faults(item: &Item) -> Vec<ViolationCode> {
    let mut faults = Vec::new();
    if item.kind.family() != KindFamily::Piston {
        return faults;
    }
    let Some(meta) = &item.meta else { return faults };
    if matches!(&meta.data, Some(KindData::Piston(state)) if state.extended) {
        faults.push(ViolationCode::PistonExtended);
    }
    if meta.unbreakable {
        faults.push(ViolationCode::PistonUnbreakable);
    }
    faults
}

/// Whether a contained item counts against its container.
pub(crate) fn child_is_violating(child: &Item, ctx: &Ctx<'_>) -> bool {
    if ctx.is_exempt(child) {
        return false;
    }
    is_entity_tampered(child) || !evaluate_at(child, ctx).is_empty()
}

pub fn run(item: &Item, ctx: &Ctx<'_>, out: &mut Vec<Violation>) {
    let Some(policy) = ctx.cfg.check_policy(ids::CHECK_ITEMS_STRUCTURE) else {
        return;
    };

    for code in spawn_egg_faults(item) {
        out.push(violation(
            policy,
            code,
            spawn_egg_message(item, code),
            json!({ "kind": item.kind.as_str() }),
        ));
    }

    if let Some(power) = firework_power(item)
        && !(FIREWORK_MIN_POWER..=FIREWORK_MAX_POWER).contains(&power)
    {
        out.push(violation(
            policy,
            ViolationCode::FireworkPowerOutOfRange,
            format!(
                "firework power {power} outside [{FIREWORK_MIN_POWER}, {FIREWORK_MAX_POWER}]"
            ),
            json!({ "power": power }),
        ));
    }

    for code in piston_faults(item) {
        let message = match code {
            ViolationCode::PistonExtended => format!("{} carries extended block state", item.kind),
            _ => format!("{} is flagged unbreakable", item.kind),
        };
        out.push(violation(policy, code, message, json!({ "kind": item.kind.as_str() })));
    }

    if item.kind.family().holds_items() {
        check_contents(item, ctx, policy, out);
    }
}

fn spawn_egg_message(item: &Item, code: ViolationCode) -> String {
    let kind = &item.kind;
    match code {
        ViolationCode::SpawnEggUnbreakable => format!("spawn egg {kind} is unbreakable"),
        ViolationCode::SpawnEggEnchanted => format!("spawn egg {kind} carries enchantments"),
        ViolationCode::SpawnEggAttributes => format!("spawn egg {kind} carries attribute modifiers"),
        ViolationCode::SpawnEggEntityMismatch => {
            format!("spawn egg {kind} spawns a different entity")
        }
        ViolationCode::SpawnEggCustomEntity => format!("spawn egg {kind} carries custom entity data"),
        _ => format!("spawn egg {kind} carries persistent data"),
    }
}

fn check_contents(item: &Item, ctx: &Ctx<'_>, policy: &CheckPolicy, out: &mut Vec<Violation>) {
    let Some(contents) = item.contents() else { return };
    if contents.is_empty() {
        return;
    }

    if ctx.depth >= MAX_CONTAINER_DEPTH {
        out.push(violation(
            policy,
            ViolationCode::ContainerTooDeep,
            format!("{} nested deeper than {MAX_CONTAINER_DEPTH} levels", item.kind),
            json!({ "depth": ctx.depth }),
        ));
        return;
    }

    if let Some(capacity) = catalog::capacity_of(item.kind.as_str(), item.kind.family())
        && contents.len() > capacity
    {
        out.push(violation(
            policy,
            ViolationCode::ContainerOverCapacity,
            format!(
                "{} holds {} entries, capacity {capacity}",
                item.kind,
                contents.len()
            ),
            json!({ "count": contents.len(), "capacity": capacity }),
        ));
    }

    let nested = ctx.nested();
    let mut details = Vec::new();
    for (slot, child) in contents.iter().enumerate() {
        if nested.is_exempt(child) {
            continue;
        }
        let found = evaluate_at(child, &nested);
        let tampered = is_entity_tampered(child);
        if found.is_empty() && !tampered {
            continue;
        }
        let mut codes: Vec<&str> = found.iter().map(|v| v.code.as_str()).collect();
        let reason = match found.first() {
            Some(first) => first.message.clone(),
            None => "tampered entity item".to_string(),
        };
        if tampered {
            codes.push("entity_tampering");
        }
        details.push(violation(
            policy,
            ViolationCode::ContainedItemViolation,
            format!("slot {slot}: {}: {reason}", child.kind),
            json!({ "slot": slot, "kind": child.kind.as_str(), "codes": codes }),
        ));
    }

    if details.is_empty() {
        return;
    }
    out.push(violation(
        policy,
        ViolationCode::ContainerViolations,
        format!(
            "contains {} violating items (of {})",
            details.len(),
            contents.len()
        ),
        json!({ "violating": details.len(), "total": contents.len() }),
    ));
    out.extend(details);
}
