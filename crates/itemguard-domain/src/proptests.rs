//! Property-based tests for the evaluator and remediator.
//!
//! The item strategy deliberately mixes every payload variant with every
//! kind, so mismatched data (potion payloads on swords, containers on
//! books) is exercised as well as the well-formed shapes.

use crate::conflicts::{ConflictCategory, ConflictMatrix};
use crate::limits::{LimitTable, TOLERANCE};
use crate::model::{
    AttributeGroup, AttributeModifier, AttributeOperation, BlockStateData, BookData,
    ContainerData, FireworkData, Item, ItemKind, ItemMeta, KindData, MapData, PotionData,
    PotionEffect, RecipeData, SpawnEggData, StoredEnchantments,
};
use crate::policy::{CheckPolicy, RuleConfig};
use crate::test_support::{evaluate, item, remediate};
use itemguard_types::{Severity, ViolationCode, ids};
use proptest::prelude::*;
use serde_json::json;

// ============================================================================
// Strategies
// ============================================================================

const KINDS: &[&str] = &[
    "DIAMOND_SWORD",
    "NETHERITE_AXE",
    "IRON_PICKAXE",
    "BOW",
    "TRIDENT",
    "IRON_HELMET",
    "DIAMOND_BOOTS",
    "STONE",
    "BEDROCK",
    "FROBNICATOR",
    "POTION",
    "SPLASH_POTION",
    "TIPPED_ARROW",
    "ZOMBIE_SPAWN_EGG",
    "FIREWORK_ROCKET",
    "PISTON",
    "CHEST",
    "HOPPER",
    "SHULKER_BOX",
    "BUNDLE",
    "WRITTEN_BOOK",
    "WRITABLE_BOOK",
    "ENCHANTED_BOOK",
    "KNOWLEDGE_BOOK",
    "FILLED_MAP",
    "ITEM_FRAME",
    "ARMOR_STAND",
];

const TAGS: &[&str] = &[
    "sharpness",
    "smite",
    "bane_of_arthropods",
    "unbreaking",
    "mending",
    "infinity",
    "power",
    "fortune",
    "silk_touch",
    "protection",
    "fire_protection",
    "riptide",
    "loyalty",
    "efficiency",
    "plugin_glow",
];

const EFFECTS: &[&str] = &[
    "SPEED",
    "STRENGTH",
    "POISON",
    "RESISTANCE",
    "NIGHT_VISION",
    "CONDUIT_POWER",
    "MADE_UP",
];

const BASES: &[&str] = &[
    "SWIFTNESS",
    "STRONG_SWIFTNESS",
    "STRONG_TURTLE_MASTER",
    "LONG_POISON",
    "WATER",
];

const ATTRIBUTES: &[&str] = &["GENERIC_ATTACK_DAMAGE", "GENERIC_ARMOR", "GENERIC_MAX_HEALTH"];

fn arb_text(choices: &'static [&'static str]) -> impl Strategy<Value = String> {
    prop::sample::select(choices).prop_map(str::to_string)
}

fn arb_enchantments() -> impl Strategy<Value = Vec<(&'static str, u32)>> {
    prop::collection::vec((prop::sample::select(TAGS), 0u32..40), 0..4)
}

fn arb_effect() -> impl Strategy<Value = PotionEffect> {
    (
        prop::sample::select(EFFECTS),
        prop_oneof![4 => 0u32..10, 1 => 110u32..130],
        prop_oneof![4 => 0u32..20_000, 1 => Just(2_147_483_647u32)],
    )
        .prop_map(|(effect, amp, ticks)| PotionEffect::new(effect, amp, ticks))
}

fn arb_attribute_group() -> impl Strategy<Value = AttributeGroup> {
    (
        arb_text(ATTRIBUTES),
        prop::collection::vec(-300.0f64..300.0, 0..3),
    )
        .prop_map(|(attribute, amounts)| AttributeGroup {
            attribute,
            modifiers: amounts
                .into_iter()
                .map(|amount| AttributeModifier {
                    amount,
                    operation: AttributeOperation::AddNumber,
                    slot: None,
                })
                .collect(),
        })
}

fn arb_data(children: BoxedStrategy<Vec<Item>>) -> BoxedStrategy<Option<KindData>> {
    prop_oneof![
        3 => Just(None),
        1 => (
            prop::collection::vec(arb_text(&["p1", ""]), 0..2),
            prop::option::of(arb_text(&["Notch"])),
            prop::option::of(arb_text(&["Diary"])),
        )
            .prop_map(|(pages, author, title)| Some(KindData::Book(BookData {
                pages,
                author,
                title,
            }))),
        1 => (
            prop::option::of(arb_text(BASES)),
            prop::collection::vec(arb_effect(), 0..3),
        )
            .prop_map(|(base, custom_effects)| Some(KindData::Potion(PotionData {
                base,
                custom_effects,
            }))),
        1 => (
            prop::option::of(arb_text(&["ZOMBIE", "WITHER"])),
            any::<bool>(),
        )
            .prop_map(|(spawned_type, custom)| Some(KindData::SpawnEgg(SpawnEggData {
                spawned_type,
                entity_snapshot: custom.then(|| json!({ "Health": 1024 })),
            }))),
        1 => (-5i32..10).prop_map(|power| Some(KindData::Firework(FireworkData { power }))),
        1 => prop::option::of(0u32..5).prop_map(|map_id| Some(KindData::Map(MapData { map_id }))),
        1 => arb_enchantments().prop_map(|pairs| {
            let mut storage = StoredEnchantments::default();
            for (tag, level) in pairs {
                storage.stored.insert(tag, level);
            }
            Some(KindData::EnchantmentStorage(storage))
        }),
        1 => any::<bool>().prop_map(|extended| Some(KindData::Piston(BlockStateData { extended }))),
        1 => prop::collection::vec(arb_text(&["minecraft:bread"]), 0..2)
            .prop_map(|recipes| Some(KindData::KnowledgeBook(RecipeData { recipes }))),
        2 => children.clone().prop_map(|items| Some(KindData::Container(ContainerData { items }))),
        1 => children.prop_map(|items| Some(KindData::Bundle(ContainerData { items }))),
    ]
    .boxed()
}

fn arb_meta(children: BoxedStrategy<Vec<Item>>) -> impl Strategy<Value = ItemMeta> {
    (
        prop::option::of(arb_text(&["Relic", "Invisible", "Hacked Blade", "small"])),
        prop::option::of(prop::collection::vec(arb_text(&["forged", "dupe glitch"]), 0..2)),
        arb_enchantments(),
        prop::collection::vec(arb_attribute_group(), 0..3),
        any::<bool>(),
        prop::option::of(any::<bool>()),
        prop::bool::weighted(0.15),
        arb_data(children),
    )
        .prop_map(
            |(display_name, lore, enchants, attribute_modifiers, unbreakable, glint, tagged, data)| {
                let mut meta = ItemMeta {
                    display_name,
                    lore,
                    attribute_modifiers,
                    unbreakable,
                    glint,
                    data,
                    ..ItemMeta::default()
                };
                for (tag, level) in enchants {
                    meta.enchantments.insert(tag, level);
                }
                if tagged {
                    meta.persistent_data.insert("plugin:owner".into(), json!("admin"));
                }
                meta
            },
        )
}

fn arb_item_with(children: BoxedStrategy<Vec<Item>>) -> BoxedStrategy<Item> {
    (
        prop::sample::select(KINDS),
        1u32..65,
        prop::option::weighted(0.85, arb_meta(children)),
    )
        .prop_map(|(kind, amount, meta)| Item {
            kind: ItemKind::new(kind),
            amount,
            meta,
        })
        .boxed()
}

fn arb_item() -> impl Strategy<Value = Item> {
    arb_item_with(Just(Vec::new()).boxed()).prop_recursive(3, 32, 6, |inner| {
        arb_item_with(prop::collection::vec(inner, 0..7).boxed())
    })
}

/// A rule set with random check toggles and fix modes.
fn arb_config() -> impl Strategy<Value = RuleConfig> {
    (
        prop::collection::vec(prop::bool::weighted(0.8), ids::ALL_CHECKS.len()),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        prop::option::of(0u32..8),
    )
        .prop_map(|(enabled, downgrade_enchants, downgrade_attrs, remove_unbreakable, sharp)| {
            let mut cfg = RuleConfig::default();
            for (id, on) in ids::ALL_CHECKS.iter().zip(enabled) {
                let policy = if on {
                    CheckPolicy::enabled(Severity::Warning)
                } else {
                    CheckPolicy::disabled()
                };
                cfg.checks.insert((*id).to_string(), policy);
            }
            cfg.banned.kinds.insert(ItemKind::new("BEDROCK"));
            cfg.banned.name_keywords = vec!["Hacked".into()];
            cfg.banned.lore_keywords = vec!["dupe".into()];
            cfg.potions.banned_effects.insert("POISON".into());
            cfg.fix.downgrade_enchantments = downgrade_enchants;
            cfg.fix.downgrade_attributes = downgrade_attrs;
            cfg.fix.remove_unbreakable = remove_unbreakable;
            if let Some(limit) = sharp {
                cfg.enchantments.overrides.insert("sharpness".into(), limit);
            }
            cfg
        })
}

// ============================================================================
// Remediation properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// A second pass never changes what the first pass produced.
    #[test]
    fn remediation_is_idempotent(item in arb_item(), cfg in arb_config()) {
        let once = remediate(&item, &cfg);
        let twice = remediate(&once, &cfg);
        prop_assert_eq!(once, twice);
    }

    /// After remediation only the violations that cannot be fixed in place
    /// remain.
    #[test]
    fn remediated_items_carry_only_unfixable_violations(item in arb_item(), cfg in arb_config()) {
        let fixed = remediate(&item, &cfg);
        for v in evaluate(&fixed, &cfg) {
            prop_assert!(v.code.is_unfixable(), "left over: {} ({})", v.code, v.message);
        }
    }

    /// Items without violations are returned unchanged.
    #[test]
    fn clean_items_survive_remediation(item in arb_item(), cfg in arb_config()) {
        if evaluate(&item, &cfg).is_empty() {
            prop_assert_eq!(remediate(&item, &cfg), item);
        }
    }

    /// Violations only come from checks that are switched on.
    #[test]
    fn violations_respect_check_gating(item in arb_item(), cfg in arb_config()) {
        for v in evaluate(&item, &cfg) {
            prop_assert!(cfg.is_enabled(v.code.check_id()), "{} from a disabled check", v.code);
            prop_assert_eq!(v.severity, Severity::Warning);
        }
    }

    #[test]
    fn evaluation_is_deterministic(item in arb_item(), cfg in arb_config()) {
        prop_assert_eq!(evaluate(&item, &cfg), evaluate(&item.clone(), &cfg));
    }
}

// ============================================================================
// Bare items
// ============================================================================

proptest! {
    /// A kind with no metadata is clean unless its kind is banned. Written
    /// books, enchanted books and filled maps are meaningless without their
    /// payload and are left out.
    #[test]
    fn bare_items_are_clean_unless_banned(kind in prop::sample::select(KINDS), banned in any::<bool>()) {
        prop_assume!(!matches!(kind, "WRITTEN_BOOK" | "ENCHANTED_BOOK" | "FILLED_MAP"));
        let mut cfg = RuleConfig::default();
        if banned {
            cfg.banned.kinds.insert(ItemKind::new(kind));
        }
        let codes: Vec<ViolationCode> = evaluate(&item(kind), &cfg).iter().map(|v| v.code).collect();
        if banned {
            prop_assert_eq!(codes, vec![ViolationCode::BannedKind]);
        } else {
            prop_assert!(codes.is_empty(), "{kind}: {codes:?}");
        }
    }
}

// ============================================================================
// Conflict matrix and limit table
// ============================================================================

proptest! {
    #[test]
    fn conflict_matrix_is_symmetric(
        pairs in prop::collection::vec(
            (
                prop::sample::select(ConflictCategory::ALL),
                prop::sample::select(TAGS),
                prop::sample::select(TAGS),
            ),
            0..12,
        ),
    ) {
        let mut matrix = ConflictMatrix::vanilla();
        for (category, a, b) in &pairs {
            matrix.insert(*category, a, b);
        }
        for (category, a, b) in matrix.edges() {
            prop_assert!(matrix.are_conflicting(category, a, b));
            prop_assert!(matrix.are_conflicting(category, b, a));
        }
        for (category, a, b) in &pairs {
            prop_assert_eq!(
                matrix.are_conflicting(*category, a, b),
                matrix.are_conflicting(*category, b, a)
            );
        }
    }

    /// Tolerance admits `baseline + 2` and rejects anything above.
    #[test]
    fn tolerance_band_is_exactly_two_levels(key in "[A-Z_]{1,16}", known in any::<bool>()) {
        let table = LimitTable::vanilla();
        let key = if known {
            table.keys().next().unwrap_or("SPEED").to_string()
        } else {
            key
        };
        let baseline = table.max_baseline(&key);
        prop_assert!(table.within_tolerance(&key, baseline + TOLERANCE));
        prop_assert!(!table.within_tolerance(&key, baseline + TOLERANCE + 1));
    }

    #[test]
    fn every_vanilla_key_honours_tolerance(index in 0usize..64) {
        let table = LimitTable::vanilla();
        let keys: Vec<&str> = table.keys().collect();
        let key = keys[index % keys.len()];
        let baseline = table.max_baseline(key);
        prop_assert!(table.within_tolerance(key, baseline + 2));
        prop_assert!(!table.within_tolerance(key, baseline + 3));
    }
}
