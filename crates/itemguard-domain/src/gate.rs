//! Live check for status effects being applied to an entity.

use crate::limits::{EffectDecision, LimitTable};
use std::sync::Arc;

/// How an entity's effect set is changing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EffectChange {
    Added,
    Changed,
    Removed,
    Cleared,
}

#[derive(Clone, Debug, Default)]
pub struct EffectGate {
    limits: Arc<LimitTable>,
}

impl EffectGate {
    pub fn new(limits: Arc<LimitTable>) -> Self {
        Self { limits }
    }

    /// Only additions and upgrades can be blocked.
    pub fn check(&self, change: EffectChange, effect: &str, amplifier: u32) -> EffectDecision {
        match change {
            EffectChange::Added | EffectChange::Changed => self.limits.gate_effect(effect, amplifier),
            EffectChange::Removed | EffectChange::Cleared => EffectDecision::Allow,
        }
    }
}
