//! End-to-end evaluate/remediate scenarios.

use crate::conflicts::{ConflictCategory, ConflictMatrix};
use crate::limits::LimitTable;
use crate::model::{ItemKind, KindData, PotionEffect, StoredEnchantments};
use crate::policy::RuleConfig;
use crate::test_support::{codes, container, enchanted, evaluate, item, potion, remediate, with_meta};
use crate::{Evaluator, Remediator};
use itemguard_types::ViolationCode;
use std::sync::Arc;

#[test]
fn sharpness_over_configured_limit_is_removed() {
    let mut cfg = RuleConfig::default();
    cfg.enchantments.overrides.insert("sharpness".into(), 5);
    let sword = enchanted("DIAMOND_SWORD", &[("sharpness", 9)]);

    let found = evaluate(&sword, &cfg);
    assert_eq!(codes(&found), vec![ViolationCode::EnchantOverLimit]);
    assert_eq!(found[0].data["limit"], 5);

    let fixed = remediate(&sword, &cfg);
    assert_eq!(fixed.meta.as_ref().and_then(|m| m.enchantments.get("sharpness")), None);
    assert!(evaluate(&fixed, &cfg).is_empty());
}

#[test]
fn extreme_potion_reports_once_and_wipes_all_custom_effects() {
    let cfg = RuleConfig::default();
    let brew = potion(
        vec![
            PotionEffect::new("NIGHT_VISION", 0, 200),
            PotionEffect::new("SPEED", 124, 2_147_483_647),
        ],
        Some("SWIFTNESS"),
    );

    let found = evaluate(&brew, &cfg);
    assert_eq!(codes(&found), vec![ViolationCode::ExtremeEffect]);

    let fixed = remediate(&brew, &cfg);
    let Some(KindData::Potion(data)) = fixed.data() else {
        panic!("potion data kept");
    };
    assert!(data.custom_effects.is_empty());
    assert_eq!(data.base.as_deref(), Some("SWIFTNESS"));
    assert!(evaluate(&fixed, &cfg).is_empty());
}

#[test]
fn container_keeps_only_the_legitimate_item() {
    let mut cfg = RuleConfig::default();
    cfg.banned.kinds.insert(ItemKind::new("BEDROCK"));
    let chest = container("CHEST", vec![item("OAK_PLANKS"), item("BEDROCK")]);

    let found = evaluate(&chest, &cfg);
    assert_eq!(
        codes(&found),
        vec![ViolationCode::ContainerViolations, ViolationCode::ContainedItemViolation]
    );
    assert_eq!(found[0].data["violating"], 1);
    assert_eq!(found[0].data["total"], 2);

    let fixed = remediate(&chest, &cfg);
    assert_eq!(fixed.contents(), Some(&[item("OAK_PLANKS")][..]));
}

#[test]
fn empty_enchanted_book_becomes_a_plain_book() {
    let cfg = RuleConfig::default();
    let mut book = with_meta("ENCHANTED_BOOK", |m| {
        m.data = Some(KindData::EnchantmentStorage(StoredEnchantments::default()))
    });
    book.amount = 3;

    let found = evaluate(&book, &cfg);
    assert_eq!(codes(&found), vec![ViolationCode::EmptyEnchantmentStorage]);
    assert_eq!(found[0].message, "empty enchantment book");

    let fixed = remediate(&book, &cfg);
    assert_eq!(fixed.kind.as_str(), "BOOK");
    assert_eq!(fixed.amount, 3);
    assert!(fixed.meta.is_none());
}

#[test]
fn both_sides_of_a_conflict_are_removed() {
    let cfg = RuleConfig::default();
    let sword = enchanted("DIAMOND_SWORD", &[("sharpness", 3), ("unbreaking", 2), ("smite", 3)]);

    let found = evaluate(&sword, &cfg);
    assert_eq!(codes(&found), vec![ViolationCode::ConflictingEnchants]);
    assert!(found[0].message.contains("sharpness") && found[0].message.contains("smite"));

    let fixed = remediate(&sword, &cfg);
    let left: Vec<_> = fixed
        .enchantments()
        .map(|e| e.tags().map(str::to_string).collect())
        .unwrap_or_default();
    assert_eq!(left, vec!["unbreaking".to_string()]);
}

#[test]
fn custom_conflict_rules_apply_both_ways() {
    let mut matrix = ConflictMatrix::empty();
    matrix.insert(ConflictCategory::Helmet, "respiration", "aqua_affinity");
    let evaluator = Evaluator::new(Arc::new(matrix), Arc::new(LimitTable::vanilla()));
    let remediator = Remediator::new(evaluator.clone());
    let cfg = RuleConfig::default();

    let helmet = enchanted("IRON_HELMET", &[("aqua_affinity", 1), ("respiration", 3)]);
    let found = evaluator.evaluate(Some(&helmet), &cfg);
    assert_eq!(codes(&found), vec![ViolationCode::ConflictingEnchants]);

    let fixed = remediator.remediate(&helmet, &cfg);
    assert!(fixed.enchantments().is_none());
}
