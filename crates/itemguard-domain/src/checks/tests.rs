use crate::engine::{Ctx, MAX_CONTAINER_DEPTH, evaluate_at};
use crate::exemption::ExemptionCache;
use crate::model::{
    BlockStateData, BookData, FireworkData, ItemKind, KindData, MapData, PotionEffect, RecipeData,
    SpawnEggData, StoredEnchantments,
};
use crate::policy::RuleConfig;
use crate::test_support::{
    attribute, codes, config_with_check, container, enchanted, evaluate, item, potion, with_meta,
};
use crate::{Evaluator, Item};
use itemguard_types::{Severity, ViolationCode, ids};
use serde_json::json;
use std::sync::Arc;

#[test]
fn absent_item_has_no_violations() {
    assert!(Evaluator::default().evaluate(None, &RuleConfig::default()).is_empty());
}

#[test]
fn banned_kind_name_and_lore() {
    let mut cfg = config_with_check(ids::CHECK_ITEMS_BANNED, Severity::Error);
    cfg.banned.kinds.insert(ItemKind::new("bedrock"));
    cfg.banned.name_keywords = vec!["Hack".into(), "Hacked".into()];
    cfg.banned.lore_keywords = vec!["dupe".into(), String::new()];

    assert_eq!(codes(&evaluate(&item("BEDROCK"), &cfg)), vec![ViolationCode::BannedKind]);

    let named = with_meta("DIAMOND_SWORD", |m| {
        m.display_name = Some("Hacked Blade".into());
        m.lore = Some(vec!["dupe one".into(), "clean".into(), "dupe two".into()]);
    });
    let found = evaluate(&named, &cfg);
    assert_eq!(
        codes(&found),
        vec![
            ViolationCode::BannedName,
            ViolationCode::BannedLore,
            ViolationCode::BannedLore
        ]
    );
    assert_eq!(found[0].data["keyword"], "Hack");
    assert_eq!(found[2].data["line"], 2);
}

#[test]
fn keyword_match_is_case_sensitive() {
    let mut cfg = config_with_check(ids::CHECK_ITEMS_BANNED, Severity::Error);
    cfg.banned.name_keywords = vec!["Hack".into()];
    let named = with_meta("STONE", |m| m.display_name = Some("hacker".into()));
    assert!(evaluate(&named, &cfg).is_empty());
}

#[test]
fn banned_spawn_eggs_share_the_kind_code() {
    let mut cfg = config_with_check(ids::CHECK_ITEMS_BANNED, Severity::Warning);
    cfg.banned.spawn_eggs.insert(ItemKind::new("WITHER_SPAWN_EGG"));
    let found = evaluate(&item("WITHER_SPAWN_EGG"), &cfg);
    assert_eq!(codes(&found), vec![ViolationCode::BannedKind]);
    assert_eq!(found[0].severity, Severity::Warning);
}

#[test]
fn attribute_magnitude_uses_override_then_default() {
    let mut cfg = config_with_check(ids::CHECK_ITEMS_ATTRIBUTES, Severity::Error);
    let sword = with_meta("DIAMOND_SWORD", |m| {
        m.attribute_modifiers = vec![attribute("GENERIC_ATTACK_DAMAGE", &[50.0, -150.0])];
    });
    assert_eq!(evaluate(&sword, &cfg).len(), 1);

    cfg.attributes
        .overrides
        .insert("GENERIC_ATTACK_DAMAGE".into(), 20.0);
    assert_eq!(evaluate(&sword, &cfg).len(), 2);
}

#[test]
fn enchant_limit_resolution_order() {
    let mut cfg = config_with_check(ids::CHECK_ITEMS_ENCHANT_LEVEL, Severity::Error);
    let sword = enchanted("DIAMOND_SWORD", &[("sharpness", 6), ("custom_glow", 10)]);

    // sharpness: vanilla 5 x 1.0; unknown tag: global 10.
    let found = evaluate(&sword, &cfg);
    assert_eq!(codes(&found), vec![ViolationCode::EnchantOverLimit]);
    assert_eq!(found[0].data, json!({"enchantment": "sharpness", "level": 6, "limit": 5}));

    cfg.enchantments.unconfigured_multiplier = 1.5;
    assert!(evaluate(&sword, &cfg).is_empty(), "ceil(5 * 1.5) = 8");

    cfg.enchantments.overrides.insert("custom_glow".into(), 3);
    assert_eq!(evaluate(&sword, &cfg).len(), 1);

    cfg.enchantments.overrides.clear();
    cfg.enchantments.use_vanilla_max_for_unconfigured = false;
    cfg.enchantments.max_level = 5;
    assert_eq!(evaluate(&sword, &cfg).len(), 2);
}

#[test]
fn legality_uses_the_kind_family() {
    let cfg = config_with_check(ids::CHECK_ITEMS_ENCHANT_LEGALITY, Severity::Error);
    assert_eq!(
        codes(&evaluate(&enchanted("IRON_PICKAXE", &[("sharpness", 1)]), &cfg)),
        vec![ViolationCode::IllegalEnchant]
    );
    assert!(evaluate(&enchanted("IRON_SWORD", &[("sharpness", 1)]), &cfg).is_empty());
    assert_eq!(evaluate(&enchanted("STONE", &[("mending", 1)]), &cfg).len(), 1);
    assert!(evaluate(&enchanted("FROBNICATOR", &[("sharpness", 1)]), &cfg).is_empty());
    assert!(evaluate(&enchanted("DIAMOND_SWORD", &[("plugin_tag", 1)]), &cfg).is_empty());
}

#[test]
fn conflict_groups_are_reported_once_each() {
    let cfg = config_with_check(ids::CHECK_ITEMS_ENCHANT_CONFLICT, Severity::Error);
    let found = evaluate(&enchanted("BOW", &[("infinity", 1), ("power", 5), ("mending", 1)]), &cfg);
    assert_eq!(codes(&found), vec![ViolationCode::ConflictingEnchants]);
    assert_eq!(found[0].data["enchantments"], json!(["infinity", "mending"]));
}

#[test]
fn op_check_covers_total_single_level_and_attribute_count() {
    let cfg = config_with_check(ids::CHECK_ITEMS_OP_ITEM, Severity::Error);
    let sword = with_meta("NETHERITE_SWORD", |m| {
        m.enchantments.insert("sharpness", 30);
        m.enchantments.insert("unbreaking", 30);
        m.attribute_modifiers = vec![attribute("GENERIC_ATTACK_DAMAGE", &[1.0; 11])];
    });
    assert_eq!(
        codes(&evaluate(&sword, &cfg)),
        vec![
            ViolationCode::OpTotalLevel,
            ViolationCode::OpEnchantLevel,
            ViolationCode::OpEnchantLevel,
            ViolationCode::OpAttributeCount,
        ]
    );

    // 2x vanilla is the last passing level.
    assert!(evaluate(&enchanted("IRON_SWORD", &[("sharpness", 10)]), &cfg).is_empty());
    assert!(evaluate(&enchanted("IRON_SWORD", &[("plugin_tag", 40)]), &cfg).is_empty());
}

#[test]
fn unbreakable_detection_follows_the_fix_switch() {
    let mut cfg = config_with_check(ids::CHECK_ITEMS_UNBREAKABLE, Severity::Error);
    let pick = with_meta("IRON_PICKAXE", |m| m.unbreakable = true);
    assert_eq!(codes(&evaluate(&pick, &cfg)), vec![ViolationCode::Unbreakable]);

    cfg.fix.remove_unbreakable = false;
    assert!(evaluate(&pick, &cfg).is_empty());
}

#[test]
fn potion_tolerance_then_configured_limit_then_duration() {
    let cfg = config_with_check(ids::CHECK_ITEMS_POTION, Severity::Error);

    // SPEED baseline 1: amplifier 3 is within tolerance but over max_amplifier 2.
    let within = potion(vec![PotionEffect::new("speed", 3, 200)], None);
    assert_eq!(codes(&evaluate(&within, &cfg)), vec![ViolationCode::EffectAmplifierOverLimit]);

    let over = potion(vec![PotionEffect::new("SPEED", 4, 601 * 20)], None);
    assert_eq!(
        codes(&evaluate(&over, &cfg)),
        vec![
            ViolationCode::EffectOverTolerance,
            ViolationCode::EffectDurationOverLimit
        ]
    );

    // Exactly at the duration limit passes.
    let at_limit = potion(vec![PotionEffect::new("SPEED", 0, 600 * 20 + 19)], None);
    assert!(evaluate(&at_limit, &cfg).is_empty());
}

#[test]
fn banned_effect_suppresses_other_potion_checks() {
    let mut cfg = config_with_check(ids::CHECK_ITEMS_POTION, Severity::Error);
    cfg.potions.banned_effects.insert("POISON".into());
    let p = potion(vec![PotionEffect::new("POISON", 200, 1_000_000)], None);
    assert_eq!(codes(&evaluate(&p, &cfg)), vec![ViolationCode::BannedEffect]);
}

#[test]
fn custom_effects_are_reported_before_base_effects() {
    let cfg = config_with_check(ids::CHECK_ITEMS_POTION, Severity::Error);
    let p = potion(
        vec![PotionEffect::new("HASTE", 3, 100)],
        Some("STRONG_TURTLE_MASTER"),
    );
    let found = evaluate(&p, &cfg);
    let sources: Vec<_> = found.iter().map(|v| v.data["source"].clone()).collect();
    assert_eq!(sources, vec![json!("custom"), json!("base"), json!("base")]);
}

#[test]
fn potion_checks_ignore_other_families() {
    let cfg = config_with_check(ids::CHECK_ITEMS_POTION, Severity::Error);
    let mut apple = potion(vec![PotionEffect::new("SPEED", 100, 20)], None);
    apple.kind = ItemKind::new("GOLDEN_APPLE");
    assert!(evaluate(&apple, &cfg).is_empty());

    let mut arrow = potion(vec![PotionEffect::new("SPEED", 100, 20)], None);
    arrow.kind = ItemKind::new("TIPPED_ARROW");
    assert_eq!(evaluate(&arrow, &cfg).len(), 1);
}

#[test]
fn spawn_egg_tampering() {
    let cfg = config_with_check(ids::CHECK_ITEMS_STRUCTURE, Severity::Error);
    let egg = with_meta("ALLAY_SPAWN_EGG", |m| {
        m.unbreakable = true;
        m.enchantments.insert("mending", 1);
        m.data = Some(KindData::SpawnEgg(SpawnEggData {
            spawned_type: Some("minecraft:tnt_minecart".into()),
            entity_snapshot: Some(json!({"id": "tnt_minecart"})),
        }));
        m.persistent_data.insert("plugin:key".into(), json!(1));
    });
    assert_eq!(
        codes(&evaluate(&egg, &cfg)),
        vec![
            ViolationCode::SpawnEggUnbreakable,
            ViolationCode::SpawnEggEnchanted,
            ViolationCode::SpawnEggEntityMismatch,
            ViolationCode::SpawnEggCustomEntity,
            ViolationCode::SpawnEggPersistentData,
        ]
    );

    let honest = with_meta("ALLAY_SPAWN_EGG", |m| {
        m.data = Some(KindData::SpawnEgg(SpawnEggData {
            spawned_type: Some("allay".into()),
            entity_snapshot: None,
        }));
    });
    assert!(evaluate(&honest, &cfg).is_empty());
}

#[test]
fn firework_power_range() {
    let cfg = config_with_check(ids::CHECK_ITEMS_STRUCTURE, Severity::Error);
    let rocket = |power| {
        with_meta("FIREWORK_ROCKET", |m| {
            m.data = Some(KindData::Firework(FireworkData { power }))
        })
    };
    assert!(evaluate(&rocket(3), &cfg).is_empty());
    assert!(evaluate(&rocket(0), &cfg).is_empty());
    assert_eq!(evaluate(&rocket(4), &cfg).len(), 1);
    assert_eq!(evaluate(&rocket(-1), &cfg).len(), 1);
}

#[test]
fn piston_block_state_and_unbreakable() {
    let cfg = config_with_check(ids::CHECK_ITEMS_STRUCTURE, Severity::Error);
    let piston = with_meta("STICKY_PISTON", |m| {
        m.unbreakable = true;
        m.data = Some(KindData::Piston(BlockStateData { extended: true }));
    });
    assert_eq!(
        codes(&evaluate(&piston, &cfg)),
        vec![ViolationCode::PistonExtended, ViolationCode::PistonUnbreakable]
    );
}

#[test]
fn container_summary_precedes_details() {
    let mut cfg = RuleConfig::default();
    cfg.banned.kinds.insert(ItemKind::new("BEDROCK"));
    let chest = container(
        "CHEST",
        vec![item("STONE"), item("BEDROCK"), enchanted("BOW", &[("infinity", 1), ("mending", 1)])],
    );
    let found = evaluate(&chest, &cfg);
    assert_eq!(
        codes(&found),
        vec![
            ViolationCode::ContainerViolations,
            ViolationCode::ContainedItemViolation,
            ViolationCode::ContainedItemViolation,
        ]
    );
    assert_eq!(found[0].message, "contains 2 violating items (of 3)");
    assert_eq!(found[1].data["slot"], 1);
    assert_eq!(found[2].data["codes"], json!(["conflicting_enchants"]));
}

#[test]
fn tampered_entity_items_count_against_the_container() {
    let cfg = RuleConfig::default();
    let frame = with_meta("ITEM_FRAME", |m| m.display_name = Some("Invisible Frame".into()));
    let stand = with_meta("ARMOR_STAND", |m| {
        m.persistent_data.insert("ShowArms".into(), json!(true));
    });
    let plain_frame = with_meta("GLOW_ITEM_FRAME", |m| m.display_name = Some("Frame".into()));
    let bundle = with_meta("BUNDLE", |m| {
        m.data = Some(KindData::Bundle(crate::model::ContainerData {
            items: vec![frame, plain_frame, stand],
        }));
    });
    let found = evaluate(&bundle, &cfg);
    assert_eq!(found[0].message, "contains 2 violating items (of 3)");
    assert_eq!(found[1].data["codes"], json!(["entity_tampering"]));
}

#[test]
fn container_capacity_is_enforced() {
    let cfg = config_with_check(ids::CHECK_ITEMS_STRUCTURE, Severity::Error);
    let hopper = container("HOPPER", vec![item("STONE"); 6]);
    assert_eq!(codes(&evaluate(&hopper, &cfg)), vec![ViolationCode::ContainerOverCapacity]);
}

fn nest(levels: usize) -> Item {
    (0..levels).fold(item("STONE"), |inner, _| container("SHULKER_BOX", vec![inner]))
}

#[test]
fn deep_nesting_is_reported_not_followed() {
    let cfg = config_with_check(ids::CHECK_ITEMS_STRUCTURE, Severity::Error);
    assert!(evaluate(&nest(8), &cfg).is_empty());
    let found = evaluate(&nest(10), &cfg);
    assert_eq!(
        codes(&found),
        vec![ViolationCode::ContainerViolations, ViolationCode::ContainedItemViolation]
    );
    assert_eq!(
        found[1].data["codes"],
        json!(["container_violations", "contained_item_violation"])
    );

    let evaluator = Evaluator::default();
    let at_cap = Ctx {
        depth: MAX_CONTAINER_DEPTH,
        ..evaluator.ctx(&cfg)
    };
    assert_eq!(
        codes(&evaluate_at(&nest(1), &at_cap)),
        vec![ViolationCode::ContainerTooDeep]
    );
}

#[test]
fn empty_data_payloads() {
    let cfg = config_with_check(ids::CHECK_ITEMS_EMPTY_DATA, Severity::Error);
    assert_eq!(codes(&evaluate(&item("WRITTEN_BOOK"), &cfg)), vec![ViolationCode::MissingItemData]);
    assert_eq!(codes(&evaluate(&item("FILLED_MAP"), &cfg)), vec![ViolationCode::MissingItemData]);
    assert!(evaluate(&item("KNOWLEDGE_BOOK"), &cfg).is_empty());

    let book = with_meta("WRITTEN_BOOK", |m| m.data = Some(KindData::Book(BookData::default())));
    assert_eq!(
        codes(&evaluate(&book, &cfg)),
        vec![ViolationCode::EmptyBook, ViolationCode::UnsignedBook]
    );

    let signed = with_meta("WRITTEN_BOOK", |m| {
        m.data = Some(KindData::Book(BookData {
            pages: vec!["hello".into()],
            author: Some("Alex".into()),
            title: Some("Notes".into()),
        }))
    });
    assert!(evaluate(&signed, &cfg).is_empty());

    let storage = with_meta("ENCHANTED_BOOK", |m| {
        m.data = Some(KindData::EnchantmentStorage(StoredEnchantments::default()))
    });
    assert_eq!(codes(&evaluate(&storage, &cfg)), vec![ViolationCode::EmptyEnchantmentStorage]);

    let map = with_meta("FILLED_MAP", |m| m.data = Some(KindData::Map(MapData { map_id: None })));
    assert_eq!(codes(&evaluate(&map, &cfg)), vec![ViolationCode::EmptyMap]);

    let recipes = with_meta("KNOWLEDGE_BOOK", |m| {
        m.data = Some(KindData::KnowledgeBook(RecipeData::default()))
    });
    assert_eq!(codes(&evaluate(&recipes, &cfg)), vec![ViolationCode::EmptyKnowledgeBook]);
}

#[test]
fn glint_needs_backing_enchantments() {
    let cfg = config_with_check(ids::CHECK_ITEMS_EMPTY_DATA, Severity::Error);
    let shiny = with_meta("STICK", |m| m.glint = Some(true));
    assert_eq!(codes(&evaluate(&shiny, &cfg)), vec![ViolationCode::GlintWithoutEnchantments]);

    let backed = with_meta("DIAMOND_SWORD", |m| {
        m.glint = Some(true);
        m.enchantments.insert("sharpness", 1);
    });
    assert!(evaluate(&backed, &cfg).is_empty());

    let mut stored = StoredEnchantments::default();
    stored.stored.insert("mending", 1);
    let book = with_meta("ENCHANTED_BOOK", |m| {
        m.glint = Some(true);
        m.data = Some(KindData::EnchantmentStorage(stored));
    });
    assert!(evaluate(&book, &cfg).is_empty());

    let unknown = with_meta("STICK", |m| m.glint = None);
    assert!(evaluate(&unknown, &cfg).is_empty());
}

#[test]
fn disabled_checks_emit_nothing() {
    let cfg = config_with_check("items.none", Severity::Error);
    let messy = with_meta("IRON_PICKAXE", |m| {
        m.unbreakable = true;
        m.glint = Some(true);
        m.enchantments.insert("sharpness", 100);
    });
    assert!(evaluate(&messy, &cfg).is_empty());
}

#[test]
fn exempt_items_skip_every_check() {
    let mut cfg = RuleConfig::default();
    cfg.banned.kinds.insert(ItemKind::new("BEDROCK"));
    let relic = with_meta("BEDROCK", |m| m.display_name = Some("Spawn Relic".into()));

    let exemptions = Arc::new(ExemptionCache::default());
    exemptions.add(&relic);
    let evaluator = Evaluator::default().with_exemptions(exemptions);

    assert!(evaluator.evaluate(Some(&relic), &cfg).is_empty());
    assert!(evaluator.is_violating(Some(&item("BEDROCK")), &cfg));
}
