//! The `scan` use case: one full scan over a captured world snapshot.

use crate::config::ConfigHandle;
use crate::reports::{entity_report_from, server_report_from};
use anyhow::Context;
use itemguard_domain::{Evaluator, ExemptionCache, Item, Remediator};
use itemguard_scanner::{EntitySnapshot, EntitySource, ScanEvent, ScanSummary, Scanner};
use itemguard_settings::Overrides;
use itemguard_types::ReportEnvelope;
use serde::Deserialize;
use std::sync::Arc;
use time::OffsetDateTime;

#[derive(Clone, Debug, Deserialize)]
struct SlotDoc {
    slot: u32,
    item: Item,
}

#[derive(Clone, Debug, Deserialize)]
struct EntityDoc {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    bypass: bool,
    #[serde(default)]
    slots: Vec<SlotDoc>,
}

impl From<EntityDoc> for EntitySnapshot {
    fn from(doc: EntityDoc) -> Self {
        EntitySnapshot {
            id: doc.id,
            name: doc.name,
            bypass: doc.bypass,
            slots: doc.slots.into_iter().map(|s| (s.slot, s.item)).collect(),
        }
    }
}

/// Entities from a JSON array of `{id, name?, bypass?, slots: [{slot, item}]}`.
pub fn parse_world(text: &str) -> anyhow::Result<Vec<EntitySnapshot>> {
    let docs: Vec<EntityDoc> = serde_json::from_str(text).context("parse world snapshot")?;
    Ok(docs.into_iter().map(EntitySnapshot::from).collect())
}

/// A fixed set of entities, as captured once.
#[derive(Debug)]
pub struct StaticSource(Vec<EntitySnapshot>);

impl StaticSource {
    pub fn new(entities: Vec<EntitySnapshot>) -> Self {
        Self(entities)
    }
}

impl EntitySource for StaticSource {
    fn active_entities(&self) -> Vec<EntitySnapshot> {
        self.0.clone()
    }
}

#[derive(Clone, Debug)]
pub struct ScanInput<'a> {
    pub config_text: &'a str,
    pub overrides: Overrides,
    pub world_json: &'a str,
    pub exemptions: Option<Arc<ExemptionCache>>,
}

#[derive(Clone, Debug)]
pub struct ScanOutput {
    pub summary: ScanSummary,
    /// Every event the scan produced, in emission order per entity.
    pub events: Vec<ScanEvent>,
    pub server_report: ReportEnvelope,
    /// One report per entity with violations, worst first.
    pub entity_reports: Vec<ReportEnvelope>,
    pub warnings: Vec<String>,
}

pub async fn run_scan(input: ScanInput<'_>, now: OffsetDateTime) -> anyhow::Result<ScanOutput> {
    let (config, warnings) = ConfigHandle::from_toml(input.config_text, input.overrides.clone())?;
    let world = parse_world(input.world_json)?;
    let entity_count = world.len();

    let mut evaluator = Evaluator::default();
    if let Some(exemptions) = input.exemptions.clone() {
        evaluator = evaluator.with_exemptions(exemptions);
    }
    let scanner = Scanner::new(
        Arc::new(StaticSource::new(world)),
        Remediator::new(evaluator),
        config.shared(),
    );
    let mut receiver = scanner
        .take_events()
        .context("scanner event stream already taken")?;

    let summary = scanner.full_scan().await.context("full scan")?;

    let mut events = Vec::new();
    while let Ok(event) = receiver.try_recv() {
        events.push(event);
    }

    let entity_reports = scanner
        .leaderboard(entity_count)
        .iter()
        .map(|entry| entity_report_from(&scanner, &entry.entity_id, now))
        .collect();

    Ok(ScanOutput {
        summary,
        events,
        server_report: server_report_from(&scanner, now),
        entity_reports,
        warnings,
    })
}
