//! Deterministic fixer: `Item x RuleConfig -> Item`.
//!
//! Each step re-reads the state left by the previous one and only touches
//! what the matching detector pass would report under the same config, so
//! a compliant item comes back unchanged and the pipeline is idempotent.

use crate::engine::{Ctx, Evaluator};
use crate::model::Item;
use crate::policy::RuleConfig;

mod attributes;
mod containers;
mod enchantments;
mod potions;
mod structural;


#[derive(Clone, Debug, Default)]
pub struct Remediator {
    evaluator: Evaluator,
}

impl Remediator {
    pub fn new(evaluator: Evaluator) -> Self {
        Self { evaluator }
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    /// Corrected copy of `item`; the argument is never modified.
    pub fn remediate(&self, item: &Item, cfg: &RuleConfig) -> Item {
        remediate_at(item, &self.evaluator.ctx(cfg))
    }
}

pub(crate) fn remediate_at(item: &Item, ctx: &Ctx<'_>) -> Item {
    if ctx.is_exempt(item) {
        return item.clone();
    }
    let mut item = item.clone();

    structural::clear_unbreakable(&mut item, ctx);
    enchantments::strip_illegal(&mut item, ctx);
    enchantments::strip_conflicts(&mut item, ctx);
    enchantments::enforce_levels(&mut item, ctx);
    enchantments::enforce_total(&mut item, ctx);
    structural::rebuild_spawn_egg(&mut item, ctx);
    potions::fix_effects(&mut item, ctx);
    structural::clamp_firework(&mut item, ctx);
    structural::rebuild_piston(&mut item, ctx);
    containers::fix_contents(&mut item, ctx);
    structural::replace_empty_data(&mut item, ctx);
    attributes::fix_modifiers(&mut item, ctx);

    item
}
