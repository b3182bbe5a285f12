//! What to do with an item the host is about to move, pick up or use.

use crate::config::ConfigHandle;
use crate::confiscate::ConfiscationStore;
use itemguard_domain::policy::{BannedAction, ConfiscateMode};
use itemguard_domain::{Item, Remediator, RuleConfig};
use itemguard_types::Violation;
use std::sync::Arc;
use time::OffsetDateTime;
use tracing::{error, warn};

/// Inventory interactions the host reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ItemEvent {
    /// Clicking an item in any inventory view.
    Click,
    /// Picking an item up from the ground.
    Pickup,
    /// Container-to-container transfer with no entity involved (hoppers).
    Move,
    Drag,
    Drop,
    /// Switching the held hotbar slot onto the item.
    HeldChange,
    SwapHands,
    /// Using the item in the main hand.
    Interact,
}

impl ItemEvent {
    /// Events that are only inspected with `strict_mode` on.
    pub fn strict_only(self) -> bool {
        !matches!(self, ItemEvent::Click | ItemEvent::Pickup)
    }

    /// Events whose only lever is cancelling; the item cannot be taken.
    fn cancel_only(self) -> bool {
        matches!(self, ItemEvent::Drag | ItemEvent::SwapHands)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Disposition {
    Allow,
    /// Let it through and report the violations.
    Notify,
    /// Cancel the interaction; the item stays where it was.
    Block,
    Delete,
    /// Take the item into the confiscation store.
    Confiscate,
    /// Put this corrected item in place of the original.
    Replace(Item),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Decision {
    pub violations: Vec<Violation>,
    pub disposition: Disposition,
}

impl Decision {
    fn allow() -> Self {
        Self {
            violations: Vec::new(),
            disposition: Disposition::Allow,
        }
    }
}

/// Pure decision for one event under one config snapshot.
pub fn decide(remediator: &Remediator, item: &Item, event: ItemEvent, cfg: &RuleConfig) -> Decision {
    if event.strict_only() && !cfg.actions.strict_mode {
        return Decision::allow();
    }
    let violations = remediator.evaluator().evaluate(Some(item), cfg);
    if violations.is_empty() {
        return Decision::allow();
    }
    let disposition = dispose(remediator, item, event, cfg, &violations);
    Decision {
        violations,
        disposition,
    }
}

fn dispose(
    remediator: &Remediator,
    item: &Item,
    event: ItemEvent,
    cfg: &RuleConfig,
    violations: &[Violation],
) -> Disposition {
    if !cfg.actions.confiscate_items {
        return Disposition::Notify;
    }
    if event.cancel_only() {
        return Disposition::Block;
    }
    let unfixable = violations.iter().any(|v| v.code.is_unfixable());
    if unfixable {
        return match cfg.banned.action {
            BannedAction::Notify => Disposition::Notify,
            BannedAction::Delete => Disposition::Delete,
        };
    }
    if event == ItemEvent::Drop {
        return Disposition::Delete;
    }
    match cfg.actions.mode {
        ConfiscateMode::Delete => Disposition::Delete,
        // The hotbar switch has nowhere to hand a stored item back from.
        ConfiscateMode::Store if event == ItemEvent::HeldChange => Disposition::Notify,
        ConfiscateMode::Store => Disposition::Confiscate,
        ConfiscateMode::Fix => Disposition::Replace(remediator.remediate(item, cfg)),
    }
}

/// Event entry point for a running server: decides, then stores confiscated items.
#[derive(Debug)]
pub struct ItemEventHandler {
    config: ConfigHandle,
    remediator: Remediator,
    confiscations: Option<Arc<ConfiscationStore>>,
}

impl ItemEventHandler {
    pub fn new(config: ConfigHandle, remediator: Remediator) -> Self {
        Self {
            config,
            remediator,
            confiscations: None,
        }
    }

    pub fn with_confiscation_store(mut self, store: Arc<ConfiscationStore>) -> Self {
        self.confiscations = Some(store);
        self
    }

    pub fn handle(&self, entity: Option<&str>, event: ItemEvent, item: &Item) -> Decision {
        let cfg = self.config.snapshot();
        let decision = decide(&self.remediator, item, event, &cfg);
        if decision.violations.is_empty() {
            return decision;
        }
        if cfg.actions.log_violations {
            let codes: Vec<&str> = decision.violations.iter().map(|v| v.code.as_str()).collect();
            warn!(
                entity = entity.unwrap_or("-"),
                kind = %item.kind,
                ?event,
                codes = ?codes,
                "violating item"
            );
        }
        if decision.disposition == Disposition::Confiscate
            && let Some(store) = &self.confiscations
            && let Err(err) = store.store(entity, item, OffsetDateTime::now_utc())
        {
            error!(error = %err, kind = %item.kind, "failed to store confiscated item");
        }
        decision
    }
}
