//! Config parsing and preset resolution.
//!
//! This crate is intentionally IO-free: it parses and resolves configuration provided as strings.
//! Only TOML syntax errors fail; invalid values fall back to their default with a warning.

#![forbid(unsafe_code)]

mod model;
mod presets;
mod resolve;

pub use model::{
    ActionSection, AttributeSection, BannedSection, CheckConfig, ConflictSection,
    EnchantmentSection, FixSection, ItemguardConfigV1, MonitorSection, OpItemSection,
    PotionSection, ReportSection,
};
pub use presets::PRESETS;
pub use resolve::{Overrides, ResolvedConfig};

/// Stable schema identifier for `itemguard.toml`.
pub const SCHEMA_CONFIG_V1: &str = "itemguard.config.v1";

/// Parse `itemguard.toml` (or equivalent) into a typed model.
pub fn parse_config_toml(input: &str) -> anyhow::Result<ItemguardConfigV1> {
    let cfg: ItemguardConfigV1 = toml::from_str(input)?;
    Ok(cfg)
}

/// Resolve the effective rule set used by the engine (preset + sections + per-check policy).
pub fn resolve_config(cfg: ItemguardConfigV1, overrides: Overrides) -> ResolvedConfig {
    resolve::resolve_config(cfg, overrides)
}
