//! Stable identifiers for detector passes.
//!
//! `check_id` is a dotted namespace; it keys per-check policy in config and
//! is carried on every emitted violation.

pub const CHECK_ITEMS_BANNED: &str = "items.banned";
pub const CHECK_ITEMS_ATTRIBUTES: &str = "items.attributes";
pub const CHECK_ITEMS_ENCHANT_LEVEL: &str = "items.enchant_level";
pub const CHECK_ITEMS_ENCHANT_LEGALITY: &str = "items.enchant_legality";
pub const CHECK_ITEMS_ENCHANT_CONFLICT: &str = "items.enchant_conflict";
pub const CHECK_ITEMS_OP_ITEM: &str = "items.op_item";
pub const CHECK_ITEMS_UNBREAKABLE: &str = "items.unbreakable";
pub const CHECK_ITEMS_POTION: &str = "items.potion";
pub const CHECK_ITEMS_STRUCTURE: &str = "items.structure";
pub const CHECK_ITEMS_EMPTY_DATA: &str = "items.empty_data";

/// All check ids in pass order.
pub const ALL_CHECKS: &[&str] = &[
    CHECK_ITEMS_BANNED,
    CHECK_ITEMS_ATTRIBUTES,
    CHECK_ITEMS_ENCHANT_LEVEL,
    CHECK_ITEMS_ENCHANT_LEGALITY,
    CHECK_ITEMS_ENCHANT_CONFLICT,
    CHECK_ITEMS_OP_ITEM,
    CHECK_ITEMS_UNBREAKABLE,
    CHECK_ITEMS_POTION,
    CHECK_ITEMS_STRUCTURE,
    CHECK_ITEMS_EMPTY_DATA,
];
