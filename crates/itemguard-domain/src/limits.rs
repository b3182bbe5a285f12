//! Per-effect amplifier baselines.
//!
//! A baseline is the highest amplifier reachable through legitimate play
//! (0-indexed, level I = 0). Anything within `baseline + TOLERANCE` passes.

use crate::model::upper_key;
use std::collections::BTreeMap;

pub const TOLERANCE: u32 = 2;

/// Baseline for effects the table does not know (level X).
pub const DEFAULT_BASELINE: u32 = 9;

/// Values at which a host's integer encoding has clearly been abused.
///
/// These bypass the tolerance rule entirely.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExtremeThresholds {
    pub amplifier: u32,
    pub duration_ticks: u32,
}

impl ExtremeThresholds {
    pub const AMPLIFIER: u32 = 117;
    pub const DURATION_TICKS: u32 = 2_147_483_640;

    pub fn is_extreme(&self, amplifier: u32, duration_ticks: u32) -> bool {
        amplifier >= self.amplifier || duration_ticks >= self.duration_ticks
    }
}

impl Default for ExtremeThresholds {
    fn default() -> Self {
        Self {
            amplifier: Self::AMPLIFIER,
            duration_ticks: Self::DURATION_TICKS,
        }
    }
}

const VANILLA_BASELINES: &[(&str, u32)] = &[
    ("REGENERATION", 1),
    ("SPEED", 1),
    ("FIRE_RESISTANCE", 0),
    ("INSTANT_HEALTH", 1),
    ("HEAL", 1),
    ("NIGHT_VISION", 0),
    ("STRENGTH", 1),
    ("INCREASE_DAMAGE", 1),
    ("JUMP_BOOST", 1),
    ("JUMP", 1),
    ("WATER_BREATHING", 0),
    ("INVISIBILITY", 0),
    ("SLOW_FALLING", 0),
    ("LUCK", 0),
    ("POISON", 1),
    ("WEAKNESS", 0),
    ("SLOWNESS", 5),
    ("SLOW", 5),
    ("INSTANT_DAMAGE", 1),
    ("HARM", 1),
    ("WITHER", 0),
    ("RESISTANCE", 3),
    ("DAMAGE_RESISTANCE", 3),
    ("WIND_CHARGED", 0),
    ("WEAVING", 0),
    ("OOZING", 0),
    ("INFESTED", 0),
    ("HASTE", 1),
    ("FAST_DIGGING", 1),
    ("DOLPHINS_GRACE", 0),
    ("ABSORPTION", 3),
    ("HERO_OF_THE_VILLAGE", 4),
    ("SATURATION", 0),
    ("GLOWING", 0),
    ("LEVITATION", 0),
    ("MINING_FATIGUE", 2),
    ("SLOW_DIGGING", 2),
    ("NAUSEA", 0),
    ("CONFUSION", 0),
    ("BLINDNESS", 0),
    ("HUNGER", 2),
    ("HEALTH_BOOST", 1),
    ("CONDUIT_POWER", 2),
    ("BAD_OMEN", 4),
    ("DARKNESS", 0),
];

/// Effects a player can get from a brewed potion (as opposed to beacons,
/// mobs or environment).
const POTION_OBTAINABLE: &[&str] = &[
    "REGENERATION",
    "SPEED",
    "FIRE_RESISTANCE",
    "INSTANT_HEALTH",
    "HEAL",
    "NIGHT_VISION",
    "STRENGTH",
    "INCREASE_DAMAGE",
    "JUMP_BOOST",
    "JUMP",
    "WATER_BREATHING",
    "INVISIBILITY",
    "SLOW_FALLING",
    "LUCK",
    "POISON",
    "WEAKNESS",
    "SLOWNESS",
    "SLOW",
    "INSTANT_DAMAGE",
    "HARM",
    "RESISTANCE",
    "DAMAGE_RESISTANCE",
    "WIND_CHARGED",
    "WEAVING",
    "OOZING",
    "INFESTED",
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LimitTable {
    baselines: BTreeMap<String, u32>,
    default_baseline: u32,
}

impl Default for LimitTable {
    fn default() -> Self {
        Self::vanilla()
    }
}

impl LimitTable {
    pub fn vanilla() -> Self {
        Self {
            baselines: VANILLA_BASELINES
                .iter()
                .map(|(k, v)| ((*k).to_string(), *v))
                .collect(),
            default_baseline: DEFAULT_BASELINE,
        }
    }

    pub fn with_baseline(mut self, key: &str, baseline: u32) -> Self {
        self.baselines.insert(upper_key(key), baseline);
        self
    }

    pub fn with_default_baseline(mut self, baseline: u32) -> Self {
        self.default_baseline = baseline;
        self
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.baselines.keys().map(String::as_str)
    }

    pub fn is_known(&self, key: &str) -> bool {
        self.baselines.contains_key(&upper_key(key))
    }

    pub fn max_baseline(&self, key: &str) -> u32 {
        self.baselines
            .get(&upper_key(key))
            .copied()
            .unwrap_or(self.default_baseline)
    }

    /// Highest amplifier that still passes (`baseline + TOLERANCE`).
    pub fn limit_amplifier(&self, key: &str) -> u32 {
        self.max_baseline(key).saturating_add(TOLERANCE)
    }

    pub fn within_tolerance(&self, key: &str, amplifier: u32) -> bool {
        amplifier <= self.limit_amplifier(key)
    }

    pub fn is_potion_obtainable(&self, key: &str) -> bool {
        POTION_OBTAINABLE.contains(&upper_key(key).as_str())
    }

    /// Decide whether a freshly applied status effect should be blocked.
    pub fn gate_effect(&self, key: &str, amplifier: u32) -> EffectDecision {
        if self.within_tolerance(key, amplifier) {
            return EffectDecision::Allow;
        }
        EffectDecision::Block {
            effect: upper_key(key),
            applied_level: amplifier.saturating_add(1),
            limit_level: self.limit_amplifier(key).saturating_add(1),
            potion_obtainable: self.is_potion_obtainable(key),
        }
    }
}

/// Outcome of [`LimitTable::gate_effect`]. Levels are 1-based for display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EffectDecision {
    Allow,
    Block {
        effect: String,
        applied_level: u32,
        limit_level: u32,
        potion_obtainable: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tolerance_boundary_for_every_known_key() {
        let table = LimitTable::vanilla();
        for key in table.keys() {
            let base = table.max_baseline(key);
            assert!(table.within_tolerance(key, base + TOLERANCE), "{key}");
            assert!(!table.within_tolerance(key, base + TOLERANCE + 1), "{key}");
        }
    }

    #[test]
    fn unknown_keys_use_default_baseline() {
        let table = LimitTable::vanilla();
        assert_eq!(table.max_baseline("MADE_UP"), DEFAULT_BASELINE);
        assert!(table.within_tolerance("MADE_UP", 11));
        assert!(!table.within_tolerance("MADE_UP", 12));
    }

    #[test]
    fn keys_are_normalized() {
        let table = LimitTable::vanilla();
        assert_eq!(table.max_baseline("minecraft:slowness"), 5);
        assert!(table.is_potion_obtainable("speed"));
        assert!(!table.is_potion_obtainable("CONDUIT_POWER"));
    }

    #[test]
    fn extreme_values_are_recognized() {
        let x = ExtremeThresholds::default();
        assert!(x.is_extreme(124, 0));
        assert!(x.is_extreme(0, 2_147_483_647));
        assert!(!x.is_extreme(116, 2_147_483_639));
    }

    #[test]
    fn gate_blocks_over_tolerance() {
        let table = LimitTable::vanilla();
        assert_eq!(table.gate_effect("SPEED", 3), EffectDecision::Allow);
        assert_eq!(
            table.gate_effect("SPEED", 4),
            EffectDecision::Block {
                effect: "SPEED".to_string(),
                applied_level: 5,
                limit_level: 4,
                potion_obtainable: true,
            }
        );
    }
}
