use crate::checks;
use crate::conflicts::ConflictMatrix;
use crate::exemption::ExemptionCache;
use crate::limits::LimitTable;
use crate::model::Item;
use crate::policy::RuleConfig;
use itemguard_types::Violation;
use std::sync::Arc;

/// Deepest container nesting that is still inspected.
pub const MAX_CONTAINER_DEPTH: usize = 8;

/// Rule data shared by the detector and fixer passes for one call.
#[derive(Clone, Copy)]
pub(crate) struct Ctx<'a> {
    pub cfg: &'a RuleConfig,
    pub conflicts: &'a ConflictMatrix,
    pub limits: &'a LimitTable,
    pub exemptions: Option<&'a ExemptionCache>,
    pub depth: usize,
}

impl<'a> Ctx<'a> {
    pub fn nested(&self) -> Ctx<'a> {
        Ctx {
            depth: self.depth + 1,
            ..*self
        }
    }

    pub fn is_exempt(&self, item: &Item) -> bool {
        self.exemptions.is_some_and(|e| e.is_exempt(item))
    }
}

/// Pure detector: `Item x RuleConfig -> [Violation]`.
#[derive(Clone, Debug)]
pub struct Evaluator {
    conflicts: Arc<ConflictMatrix>,
    limits: Arc<LimitTable>,
    exemptions: Option<Arc<ExemptionCache>>,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new(
            Arc::new(ConflictMatrix::vanilla()),
            Arc::new(LimitTable::vanilla()),
        )
    }
}

impl Evaluator {
    pub fn new(conflicts: Arc<ConflictMatrix>, limits: Arc<LimitTable>) -> Self {
        Self {
            conflicts,
            limits,
            exemptions: None,
        }
    }

    pub fn with_exemptions(mut self, exemptions: Arc<ExemptionCache>) -> Self {
        self.exemptions = Some(exemptions);
        self
    }

    pub fn conflicts(&self) -> &ConflictMatrix {
        &self.conflicts
    }

    pub fn limits(&self) -> &LimitTable {
        &self.limits
    }

    pub fn exemptions(&self) -> Option<&ExemptionCache> {
        self.exemptions.as_deref()
    }

    /// Violations in pass order. An absent item has none.
    pub fn evaluate(&self, item: Option<&Item>, cfg: &RuleConfig) -> Vec<Violation> {
        let Some(item) = item else {
            return Vec::new();
        };
        evaluate_at(item, &self.ctx(cfg))
    }

    pub fn is_violating(&self, item: Option<&Item>, cfg: &RuleConfig) -> bool {
        !self.evaluate(item, cfg).is_empty()
    }

    pub(crate) fn ctx<'a>(&'a self, cfg: &'a RuleConfig) -> Ctx<'a> {
        Ctx {
            cfg,
            conflicts: &self.conflicts,
            limits: &self.limits,
            exemptions: self.exemptions.as_deref(),
            depth: 0,
        }
    }
}

pub(crate) fn evaluate_at(item: &Item, ctx: &Ctx<'_>) -> Vec<Violation> {
    let mut out = Vec::new();
    if ctx.is_exempt(item) {
        return out;
    }
    checks::run_all(item, ctx, &mut out);
    out
}
