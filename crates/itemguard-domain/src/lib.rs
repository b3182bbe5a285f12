//! Pure item rule evaluation and remediation (no IO).
//!
//! Input: an [`Item`] built by the host adapter and a [`RuleConfig`] snapshot.
//! Output: ordered violations, and optionally a corrected copy of the item.

#![forbid(unsafe_code)]

pub mod catalog;
pub mod conflicts;
pub mod exemption;
pub mod gate;
pub mod limits;
pub mod model;
pub mod policy;

mod checks;
mod engine;
mod remediate;

#[cfg(test)]
mod proptests;
#[cfg(test)]
mod scenarios;
#[cfg(test)]
pub(crate) mod test_support;

pub use checks::structural::{TAMPER_MARKERS, is_entity_tampered};
pub use conflicts::{ConflictCategory, ConflictMatrix};
pub use engine::{Evaluator, MAX_CONTAINER_DEPTH};
pub use exemption::{ExemptionCache, ExemptionStore, StoreError, fingerprint};
pub use gate::{EffectChange, EffectGate};
pub use limits::{EffectDecision, ExtremeThresholds, LimitTable};
pub use model::{Item, ItemKind, ItemMeta};
pub use policy::{CheckPolicy, RuleConfig};
pub use remediate::Remediator;
