//! Explain registry for checks and codes.
//!
//! Maps check IDs and violation codes to human-readable explanations with remediation guidance.

use crate::ids;
use crate::violation::ViolationCode;

/// Explanation entry for a check or code.
#[derive(Debug, Clone)]
pub struct Explanation {
    /// Short description of the check/code.
    pub title: &'static str,
    /// What the check does and why it exists.
    pub description: &'static str,
    /// What the remediator does, or what an operator should do.
    pub remediation: &'static str,
    /// Before/after item examples (JSON).
    pub examples: ExamplePair,
}

/// Before and after item examples.
#[derive(Debug, Clone)]
pub struct ExamplePair {
    /// An item that would trigger a violation.
    pub before: &'static str,
    /// The same item after remediation.
    pub after: &'static str,
}

/// Look up an explanation by check_id or code.
///
/// Returns `None` if the identifier is not recognized.
pub fn lookup_explanation(identifier: &str) -> Option<Explanation> {
    if let Some(check) = explain_check(identifier) {
        return Some(check);
    }
    let code: ViolationCode = identifier.parse().ok()?;
    let (title, description) = code_summary(code);
    let check = explain_check(code.check_id())?;
    Some(Explanation {
        title,
        description,
        ..check
    })
}

/// List all known check IDs.
pub fn all_check_ids() -> &'static [&'static str] {
    ids::ALL_CHECKS
}

/// List all known codes.
pub fn all_codes() -> Vec<&'static str> {
    ViolationCode::ALL.iter().map(|c| c.as_str()).collect()
}

fn explain_check(check_id: &str) -> Option<Explanation> {
    let explanation = match check_id {
        ids::CHECK_ITEMS_BANNED => Explanation {
            title: "Banned Items",
            description: "\
Flags items whose kind is on the banned list (including banned spawn eggs), and items
whose display name or any lore line contains a banned keyword.

Keyword matching is a plain substring match. At most one violation is reported for the
display name and at most one per lore line.",
            remediation: "\
Banned items cannot be repaired. They are deleted (or, with the `notify` banned-item
action mode, only reported). Inside containers they are dropped.",
            examples: ExamplePair {
                before: r#"{"kind": "BEDROCK", "amount": 64}"#,
                after: "(removed)",
            },
        },
        ids::CHECK_ITEMS_ATTRIBUTES => Explanation {
            title: "Attribute Modifier Magnitude",
            description: "\
Flags attribute modifiers whose absolute amount exceeds the configured limit for that
attribute (falling back to `max_attribute_modifier_amount`, default 100).",
            remediation: "\
With `downgrade_attributes` the modifier is clamped to +/- the limit; otherwise it is
removed. Afterwards the total modifier count is capped.",
            examples: ExamplePair {
                before: r#"{"kind": "DIAMOND_SWORD", "amount": 1, "meta": {"attribute_modifiers": [{"attribute": "GENERIC_ATTACK_DAMAGE", "modifiers": [{"amount": 1000.0, "operation": "add_number"}]}]}}"#,
                after: r#"{"kind": "DIAMOND_SWORD", "amount": 1, "meta": {}}"#,
            },
        },
        ids::CHECK_ITEMS_ENCHANT_LEVEL => Explanation {
            title: "Enchantment Level Limit",
            description: "\
Flags enchantments above their limit. The limit is the per-enchantment override if one
is configured, else the vanilla maximum times `unconfigured_multiplier` rounded up
(when `use_vanilla_max_for_unconfigured` is on), else `max_enchantment_level`.",
            remediation: "\
With `downgrade_enchantments` the level is lowered to the limit; otherwise the
enchantment is removed.",
            examples: ExamplePair {
                before: r#"{"kind": "DIAMOND_SWORD", "amount": 1, "meta": {"enchantments": [["sharpness", 9]]}}"#,
                after: r#"{"kind": "DIAMOND_SWORD", "amount": 1, "meta": {}}"#,
            },
        },
        ids::CHECK_ITEMS_ENCHANT_LEGALITY => Explanation {
            title: "Enchantment Legality",
            description: "\
Flags enchantments that a clean item of the same kind could never carry, such as
sharpness on a pickaxe or any enchantment on a block.",
            remediation: "The illegal enchantment is removed.",
            examples: ExamplePair {
                before: r#"{"kind": "STONE", "amount": 1, "meta": {"enchantments": [["sharpness", 1]]}}"#,
                after: r#"{"kind": "STONE", "amount": 1, "meta": {}}"#,
            },
        },
        ids::CHECK_ITEMS_ENCHANT_CONFLICT => Explanation {
            title: "Conflicting Enchantments",
            description: "\
Flags groups of mutually exclusive enchantments present on the same item, for example
sharpness together with smite, or infinity together with mending on a bow. One
violation is reported per group.",
            remediation: "\
Every enchantment in every conflicting group is removed. No member of a group is kept.",
            examples: ExamplePair {
                before: r#"{"kind": "BOW", "amount": 1, "meta": {"enchantments": [["infinity", 1], ["mending", 1], ["power", 5]]}}"#,
                after: r#"{"kind": "BOW", "amount": 1, "meta": {"enchantments": [["power", 5]]}}"#,
            },
        },
        ids::CHECK_ITEMS_OP_ITEM => Explanation {
            title: "Overpowered Items",
            description: "\
Aggregate checks: total enchantment level above `max_total_enchantment_level`, any
single enchantment above vanilla max times `max_enchantment_multiplier`, or more
attribute modifiers than `max_attribute_count`.",
            remediation: "\
Enchantments are removed highest level first until the total fits. Surplus attribute
modifiers are removed.",
            examples: ExamplePair {
                before: r#"{"kind": "NETHERITE_SWORD", "amount": 1, "meta": {"enchantments": [["sharpness", 30], ["looting", 30]]}}"#,
                after: r#"{"kind": "NETHERITE_SWORD", "amount": 1, "meta": {}}"#,
            },
        },
        ids::CHECK_ITEMS_UNBREAKABLE => Explanation {
            title: "Unbreakable Flag",
            description: "Flags items carrying the unbreakable flag while `remove_unbreakable` is enabled.",
            remediation: "The unbreakable flag is cleared.",
            examples: ExamplePair {
                before: r#"{"kind": "DIAMOND_PICKAXE", "amount": 1, "meta": {"unbreakable": true}}"#,
                after: r#"{"kind": "DIAMOND_PICKAXE", "amount": 1, "meta": {}}"#,
            },
        },
        ids::CHECK_ITEMS_POTION => Explanation {
            title: "Potion Effects",
            description: "\
Checks every base and custom effect on potions, splash and lingering potions and tipped
arrows. Banned effects and extreme values (amplifier or duration at the overflow
thresholds) are reported on their own; otherwise the amplifier is compared to the
legitimate baseline plus a tolerance of 2, then to the configured amplifier limit, and
the duration to the configured duration limit.",
            remediation: "\
If any effect is extreme, all custom effects are discarded. Otherwise only the offending
effects are removed.",
            examples: ExamplePair {
                before: r#"{"kind": "POTION", "amount": 1, "meta": {"data": {"type": "potion", "base": "SWIFTNESS", "custom_effects": [{"effect": "SPEED", "amplifier": 124, "duration_ticks": 2147483647}]}}}"#,
                after: r#"{"kind": "POTION", "amount": 1, "meta": {"data": {"type": "potion", "base": "SWIFTNESS", "custom_effects": []}}}"#,
            },
        },
        ids::CHECK_ITEMS_STRUCTURE => Explanation {
            title: "Structural Tampering",
            description: "\
Kind-specific checks: spawn eggs with attached data or a mismatched entity, firework
rockets with a flight power above 3, pistons carrying an extended block state, and
containers or bundles holding violating items.",
            remediation: "\
Spawn eggs and pistons are rebuilt from a clean item keeping name and lore. Firework
power is clamped. Containers keep only contents that are clean after remediation.",
            examples: ExamplePair {
                before: r#"{"kind": "PISTON", "amount": 1, "meta": {"data": {"type": "piston", "extended": true}}}"#,
                after: r#"{"kind": "PISTON", "amount": 1}"#,
            },
        },
        ids::CHECK_ITEMS_EMPTY_DATA => Explanation {
            title: "Empty Item Data",
            description: "\
Flags items whose kind requires data they do not have: written books without pages,
author or title, enchanted books without stored enchantments, filled maps without a
map view, knowledge books without recipes, and glint without any enchantment.",
            remediation: "\
The item is replaced by its blank equivalent (writable book, book, map) keeping only
the amount. A stray glint flag is cleared.",
            examples: ExamplePair {
                before: r#"{"kind": "ENCHANTED_BOOK", "amount": 3, "meta": {"data": {"type": "enchantment_storage", "stored": []}}}"#,
                after: r#"{"kind": "BOOK", "amount": 3}"#,
            },
        },
        _ => return None,
    };
    Some(explanation)
}

fn code_summary(code: ViolationCode) -> (&'static str, &'static str) {
    use ViolationCode::*;
    match code {
        BannedKind => ("Banned Item Kind", "The item kind is on the banned list."),
        BannedName => ("Banned Name", "The display name contains a banned keyword."),
        BannedLore => ("Banned Lore", "A lore line contains a banned keyword."),
        AttributeOverLimit => (
            "Attribute Over Limit",
            "An attribute modifier's absolute amount exceeds its limit.",
        ),
        EnchantOverLimit => (
            "Enchantment Over Limit",
            "An enchantment level exceeds its resolved limit.",
        ),
        IllegalEnchant => (
            "Illegal Enchantment",
            "The enchantment cannot be applied to this item kind.",
        ),
        ConflictingEnchants => (
            "Conflicting Enchantments",
            "Mutually exclusive enchantments are present together.",
        ),
        OpTotalLevel => (
            "Total Enchantment Level",
            "The sum of all enchantment levels exceeds the aggregate cap.",
        ),
        OpEnchantLevel => (
            "Overpowered Enchantment",
            "A single enchantment exceeds vanilla max times the OP multiplier.",
        ),
        OpAttributeCount => (
            "Too Many Attribute Modifiers",
            "The item carries more attribute modifiers than the cap allows.",
        ),
        Unbreakable => ("Unbreakable", "The item carries the unbreakable flag."),
        BannedEffect => ("Banned Effect", "A potion effect is on the banned list."),
        ExtremeEffect => (
            "Extreme Effect",
            "An effect amplifier or duration sits at an integer-overflow threshold.",
        ),
        EffectOverTolerance => (
            "Effect Over Tolerance",
            "An effect amplifier exceeds the legitimate baseline plus tolerance.",
        ),
        EffectAmplifierOverLimit => (
            "Effect Amplifier Over Limit",
            "An effect amplifier exceeds the configured amplifier limit.",
        ),
        EffectDurationOverLimit => (
            "Effect Duration Over Limit",
            "An effect duration exceeds the configured duration limit.",
        ),
        SpawnEggUnbreakable => ("Unbreakable Spawn Egg", "A spawn egg carries the unbreakable flag."),
        SpawnEggEntityMismatch => (
            "Spawn Egg Entity Mismatch",
            "The spawn egg spawns a different entity than its kind implies.",
        ),
        SpawnEggCustomEntity => (
            "Spawn Egg Custom Entity",
            "The spawn egg carries a captured entity snapshot.",
        ),
        SpawnEggPersistentData => (
            "Spawn Egg Persistent Data",
            "The spawn egg carries custom persistent data.",
        ),
        SpawnEggEnchanted => ("Enchanted Spawn Egg", "The spawn egg carries enchantments."),
        SpawnEggAttributes => (
            "Spawn Egg Attributes",
            "The spawn egg carries attribute modifiers.",
        ),
        FireworkPowerOutOfRange => (
            "Firework Power Out Of Range",
            "The firework rocket's flight power is outside the legal range.",
        ),
        PistonExtended => ("Extended Piston", "The piston item carries an extended block state."),
        PistonUnbreakable => ("Unbreakable Piston", "The piston item carries the unbreakable flag."),
        ContainerViolations => (
            "Container Holds Violating Items",
            "Summary: some contained items violate rules.",
        ),
        ContainedItemViolation => (
            "Contained Item Violation",
            "Detail for one violating contained item.",
        ),
        ContainerOverCapacity => (
            "Container Over Capacity",
            "The container holds more entries than its capacity.",
        ),
        ContainerTooDeep => (
            "Container Nesting Too Deep",
            "Containers are nested beyond the supported depth.",
        ),
        MissingItemData => (
            "Missing Item Data",
            "The item kind requires metadata but none is present.",
        ),
        EmptyBook => ("Empty Book", "A written book has no pages."),
        UnsignedBook => ("Unsigned Book", "A written book is missing its author or title."),
        EmptyEnchantmentStorage => (
            "Empty Enchantment Book",
            "An enchanted book stores no enchantments.",
        ),
        EmptyMap => ("Empty Map", "A filled map has no map view."),
        EmptyKnowledgeBook => ("Empty Knowledge Book", "A knowledge book holds no recipes."),
        GlintWithoutEnchantments => (
            "Glint Without Enchantments",
            "The glint flag is set but nothing is enchanted.",
        ),
    }
}
