use crate::ids;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use std::str::FromStr;

/// Severity is intentionally small: it maps cleanly to log levels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

macro_rules! violation_codes {
    ($( $variant:ident => $code:literal, $check:path; )*) => {
        /// Machine-readable discriminator of a violation.
        ///
        /// Serialized as the snake_case code string; the set is closed so that
        /// consumers can match exhaustively.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema)]
        #[serde(rename_all = "snake_case")]
        pub enum ViolationCode {
            $( $variant, )*
        }

        impl ViolationCode {
            pub const ALL: &'static [ViolationCode] = &[ $( ViolationCode::$variant, )* ];

            pub fn as_str(self) -> &'static str {
                match self {
                    $( ViolationCode::$variant => $code, )*
                }
            }

            /// The detector pass that emits this code.
            pub fn check_id(self) -> &'static str {
                match self {
                    $( ViolationCode::$variant => $check, )*
                }
            }
        }

        impl FromStr for ViolationCode {
            type Err = UnknownCode;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $code => Ok(ViolationCode::$variant), )*
                    other => Err(UnknownCode(other.to_string())),
                }
            }
        }
    };
}

violation_codes! {
    BannedKind => "banned_kind", ids::CHECK_ITEMS_BANNED;
    BannedName => "banned_name", ids::CHECK_ITEMS_BANNED;
    BannedLore => "banned_lore", ids::CHECK_ITEMS_BANNED;
    AttributeOverLimit => "attribute_over_limit", ids::CHECK_ITEMS_ATTRIBUTES;
    EnchantOverLimit => "enchant_over_limit", ids::CHECK_ITEMS_ENCHANT_LEVEL;
    IllegalEnchant => "illegal_enchant", ids::CHECK_ITEMS_ENCHANT_LEGALITY;
    ConflictingEnchants => "conflicting_enchants", ids::CHECK_ITEMS_ENCHANT_CONFLICT;
    OpTotalLevel => "op_total_level", ids::CHECK_ITEMS_OP_ITEM;
    OpEnchantLevel => "op_enchant_level", ids::CHECK_ITEMS_OP_ITEM;
    OpAttributeCount => "op_attribute_count", ids::CHECK_ITEMS_OP_ITEM;
    Unbreakable => "unbreakable", ids::CHECK_ITEMS_UNBREAKABLE;
    BannedEffect => "banned_effect", ids::CHECK_ITEMS_POTION;
    ExtremeEffect => "extreme_effect", ids::CHECK_ITEMS_POTION;
    EffectOverTolerance => "effect_over_tolerance", ids::CHECK_ITEMS_POTION;
    EffectAmplifierOverLimit => "effect_amplifier_over_limit", ids::CHECK_ITEMS_POTION;
    EffectDurationOverLimit => "effect_duration_over_limit", ids::CHECK_ITEMS_POTION;
    SpawnEggUnbreakable => "spawn_egg_unbreakable", ids::CHECK_ITEMS_STRUCTURE;
    SpawnEggEntityMismatch => "spawn_egg_entity_mismatch", ids::CHECK_ITEMS_STRUCTURE;
    SpawnEggCustomEntity => "spawn_egg_custom_entity", ids::CHECK_ITEMS_STRUCTURE;
    SpawnEggPersistentData => "spawn_egg_persistent_data", ids::CHECK_ITEMS_STRUCTURE;
    SpawnEggEnchanted => "spawn_egg_enchanted", ids::CHECK_ITEMS_STRUCTURE;
    SpawnEggAttributes => "spawn_egg_attributes", ids::CHECK_ITEMS_STRUCTURE;
    FireworkPowerOutOfRange => "firework_power_out_of_range", ids::CHECK_ITEMS_STRUCTURE;
    PistonExtended => "piston_extended", ids::CHECK_ITEMS_STRUCTURE;
    PistonUnbreakable => "piston_unbreakable", ids::CHECK_ITEMS_STRUCTURE;
    ContainerViolations => "container_violations", ids::CHECK_ITEMS_STRUCTURE;
    ContainedItemViolation => "contained_item_violation", ids::CHECK_ITEMS_STRUCTURE;
    ContainerOverCapacity => "container_over_capacity", ids::CHECK_ITEMS_STRUCTURE;
    ContainerTooDeep => "container_too_deep", ids::CHECK_ITEMS_STRUCTURE;
    MissingItemData => "missing_item_data", ids::CHECK_ITEMS_EMPTY_DATA;
    EmptyBook => "empty_book", ids::CHECK_ITEMS_EMPTY_DATA;
    UnsignedBook => "unsigned_book", ids::CHECK_ITEMS_EMPTY_DATA;
    EmptyEnchantmentStorage => "empty_enchantment_storage", ids::CHECK_ITEMS_EMPTY_DATA;
    EmptyMap => "empty_map", ids::CHECK_ITEMS_EMPTY_DATA;
    EmptyKnowledgeBook => "empty_knowledge_book", ids::CHECK_ITEMS_EMPTY_DATA;
    GlintWithoutEnchantments => "glint_without_enchantments", ids::CHECK_ITEMS_EMPTY_DATA;
}

impl ViolationCode {
    /// Codes that no amount of remediation can clear; the item must go.
    pub fn is_unfixable(self) -> bool {
        matches!(
            self,
            ViolationCode::BannedKind | ViolationCode::BannedName | ViolationCode::BannedLore
        )
    }
}

impl fmt::Display for ViolationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownCode(pub String);

impl fmt::Display for UnknownCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown violation code: {}", self.0)
    }
}

impl std::error::Error for UnknownCode {}

/// A single non-compliance finding on one item.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Violation {
    pub severity: Severity,
    pub check_id: String,
    pub code: ViolationCode,
    pub message: String,

    /// Check-specific structured payload (kept open-ended for forward compatibility).
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub data: JsonValue,
}

impl Violation {
    pub fn new(code: ViolationCode, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            check_id: code.check_id().to_string(),
            code,
            message: message.into(),
            data: JsonValue::Null,
        }
    }

    pub fn with_data(mut self, data: JsonValue) -> Self {
        self.data = data;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip_through_their_string_form() {
        for code in ViolationCode::ALL {
            assert_eq!(code.as_str().parse::<ViolationCode>(), Ok(*code));
        }
    }

    #[test]
    fn serde_uses_the_code_string() {
        let json = serde_json::to_string(&ViolationCode::ExtremeEffect).expect("serialize");
        assert_eq!(json, "\"extreme_effect\"");
    }

    #[test]
    fn every_code_maps_to_a_known_check() {
        for code in ViolationCode::ALL {
            assert!(ids::ALL_CHECKS.contains(&code.check_id()), "{code}");
        }
    }

    #[test]
    fn null_data_is_omitted() {
        let v = Violation::new(ViolationCode::Unbreakable, Severity::Error, "unbreakable");
        let json = serde_json::to_value(&v).expect("serialize");
        assert!(json.get("data").is_none());
        assert_eq!(json["check_id"], "items.unbreakable");
    }
}
