//! Live configuration: one immutable [`RuleConfig`] snapshot, swapped on reload.

use anyhow::Context;
use arc_swap::ArcSwap;
use itemguard_domain::{ExemptionCache, RuleConfig};
use itemguard_settings::{ItemguardConfigV1, Overrides, ResolvedConfig};
use std::sync::Arc;
use tracing::{error, info};

/// Parse and resolve config text. Empty text means all defaults.
pub fn load_config(text: &str, overrides: Overrides) -> anyhow::Result<ResolvedConfig> {
    let cfg = if text.trim().is_empty() {
        ItemguardConfigV1::default()
    } else {
        itemguard_settings::parse_config_toml(text).context("parse config")?
    };
    Ok(itemguard_settings::resolve_config(cfg, overrides))
}

/// Readers call [`ConfigHandle::snapshot`] once per unit of work and keep
/// using that snapshot even if a reload lands halfway through.
#[derive(Clone, Debug)]
pub struct ConfigHandle {
    current: Arc<ArcSwap<RuleConfig>>,
    overrides: Overrides,
    exemptions: Option<Arc<ExemptionCache>>,
}

impl ConfigHandle {
    pub fn new(cfg: RuleConfig) -> Self {
        Self {
            current: Arc::new(ArcSwap::from_pointee(cfg)),
            overrides: Overrides::default(),
            exemptions: None,
        }
    }

    /// Build from config text; returns the handle and any fallback warnings.
    pub fn from_toml(text: &str, overrides: Overrides) -> anyhow::Result<(Self, Vec<String>)> {
        let resolved = load_config(text, overrides.clone())?;
        let handle = Self {
            current: Arc::new(ArcSwap::from_pointee(resolved.effective)),
            overrides,
            exemptions: None,
        };
        Ok((handle, resolved.warnings))
    }

    /// Exemption cache to reload alongside the rules.
    pub fn with_exemptions(mut self, exemptions: Arc<ExemptionCache>) -> Self {
        self.exemptions = Some(exemptions);
        self
    }

    pub fn snapshot(&self) -> Arc<RuleConfig> {
        self.current.load_full()
    }

    /// The swap cell itself, for components such as the scanner that load
    /// snapshots on their own schedule.
    pub fn shared(&self) -> Arc<ArcSwap<RuleConfig>> {
        Arc::clone(&self.current)
    }

    /// Replace the rules with the result of parsing `text`.
    ///
    /// A syntax error leaves the current snapshot in place. Exemption reload
    /// failures are logged; the new rules are kept either way.
    pub fn reload_from_str(&self, text: &str) -> anyhow::Result<Vec<String>> {
        let resolved = load_config(text, self.overrides.clone()).context("reload config")?;
        let profile = resolved.effective.profile.clone();
        self.current.store(Arc::new(resolved.effective));
        if let Some(exemptions) = &self.exemptions
            && let Err(err) = exemptions.reload()
        {
            error!(error = %err, "exemption reload failed; keeping previous list");
        }
        info!(
            profile = %profile,
            warnings = resolved.warnings.len(),
            "configuration reloaded"
        );
        Ok(resolved.warnings)
    }
}
