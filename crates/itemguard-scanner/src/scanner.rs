//! Periodic background scan of every active entity's inventory.
//!
//! Each tick loads the current [`RuleConfig`] snapshot once, lists entities
//! from the host and evaluates them in parallel on the rayon pool. An
//! entity's own slots are walked sequentially in slot order, so an unchanged
//! inventory always produces the same events.

use crate::error::ScannerError;
use crate::host::{EntitySnapshot, EntitySource, ScanAction, ScanEvent};
use crate::ledger::Ledger;
use arc_swap::ArcSwap;
use itemguard_domain::{Remediator, RuleConfig};
use itemguard_types::{EntityStats, HistoryEntry, LeaderboardEntry, ServerStats};
use rayon::prelude::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use time::OffsetDateTime;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Milliseconds per game tick.
pub const TICK_MILLIS: u64 = 50;

/// Counters for one tick or one full scan.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScanSummary {
    pub entities_scanned: u64,
    pub entities_bypassed: u64,
    pub violations: u64,
    pub fixed: u64,
    pub deleted: u64,
}

impl ScanSummary {
    fn absorb(&mut self, other: ScanSummary) {
        self.entities_scanned += other.entities_scanned;
        self.entities_bypassed += other.entities_bypassed;
        self.violations += other.violations;
        self.fixed += other.fixed;
        self.deleted += other.deleted;
    }
}

struct Shared {
    source: Arc<dyn EntitySource>,
    remediator: Remediator,
    config: Arc<ArcSwap<RuleConfig>>,
    ledger: Ledger,
    events: mpsc::UnboundedSender<ScanEvent>,
    monitoring: AtomicBool,
    full_scan_running: AtomicBool,
}

pub struct Scanner {
    shared: Arc<Shared>,
    receiver: parking_lot::Mutex<Option<mpsc::UnboundedReceiver<ScanEvent>>>,
    cancel: CancellationToken,
}

impl Scanner {
    pub fn new(
        source: Arc<dyn EntitySource>,
        remediator: Remediator,
        config: Arc<ArcSwap<RuleConfig>>,
    ) -> Self {
        let (events, receiver) = mpsc::unbounded_channel();
        Self {
            shared: Arc::new(Shared {
                source,
                remediator,
                config,
                ledger: Ledger::new(),
                events,
                monitoring: AtomicBool::new(true),
                full_scan_running: AtomicBool::new(false),
            }),
            receiver: parking_lot::Mutex::new(Some(receiver)),
            cancel: CancellationToken::new(),
        }
    }

    /// The event stream. Can be taken once; later calls return `None`.
    pub fn take_events(&self) -> Option<mpsc::UnboundedReceiver<ScanEvent>> {
        self.receiver.lock().take()
    }

    /// Spawn the periodic loop on the current runtime.
    pub fn start(&self) -> JoinHandle<()> {
        let shared = Arc::clone(&self.shared);
        let cancel = self.cancel.clone();
        tokio::spawn(async move { run_loop(shared, cancel).await })
    }

    /// Stop scheduling ticks. A tick already in progress runs to completion.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    /// Pause or resume ticks without stopping the task.
    pub fn set_monitoring_enabled(&self, enabled: bool) {
        self.shared.monitoring.store(enabled, Ordering::Relaxed);
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.shared.monitoring_enabled(&self.shared.config.load())
    }

    /// Run one tick now. Returns `None` when monitoring is off.
    pub async fn tick(&self) -> Result<Option<ScanSummary>, ScannerError> {
        tick(&self.shared).await
    }

    /// Walk every entity once, independent of the monitoring switch.
    pub async fn full_scan(&self) -> Result<ScanSummary, ScannerError> {
        let _guard = FullScanGuard::acquire(&self.shared.full_scan_running)?;
        info!("full scan started");
        let cfg = self.shared.config.load_full();
        let summary = scan_all(Arc::clone(&self.shared), cfg).await?;
        info!(
            scanned = summary.entities_scanned,
            bypassed = summary.entities_bypassed,
            violations = summary.violations,
            fixed = summary.fixed,
            deleted = summary.deleted,
            "full scan finished"
        );
        Ok(summary)
    }

    pub fn is_full_scan_running(&self) -> bool {
        self.shared.full_scan_running.load(Ordering::Acquire)
    }

    pub fn entity_stats(&self, entity_id: &str) -> EntityStats {
        self.shared.ledger.stats(entity_id)
    }

    pub fn entity_name(&self, entity_id: &str) -> Option<String> {
        self.shared.ledger.name(entity_id)
    }

    pub fn entity_history(&self, entity_id: &str) -> Vec<HistoryEntry> {
        self.shared.ledger.history(entity_id)
    }

    pub fn server_stats(&self) -> ServerStats {
        ServerStats {
            total_entities: self.shared.ledger.entity_count(),
            total_violations: self.shared.ledger.total_violations(),
            monitoring_enabled: self.monitoring_enabled(),
        }
    }

    pub fn leaderboard(&self, n: usize) -> Vec<LeaderboardEntry> {
        self.shared.ledger.leaderboard(n)
    }

    pub fn clear_stats(&self) {
        self.shared.ledger.clear();
    }
}

impl Drop for Scanner {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl Shared {
    fn monitoring_enabled(&self, cfg: &RuleConfig) -> bool {
        cfg.monitor.enabled && self.monitoring.load(Ordering::Relaxed)
    }
}

struct FullScanGuard<'a>(&'a AtomicBool);

impl<'a> FullScanGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, ScannerError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ScannerError::FullScanRunning)?;
        Ok(Self(flag))
    }
}

impl Drop for FullScanGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

fn new_ticker(ticks: u32) -> Interval {
    let period = Duration::from_millis(u64::from(ticks.max(1)) * TICK_MILLIS);
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    ticker
}

async fn run_loop(shared: Arc<Shared>, cancel: CancellationToken) {
    let mut ticks = shared.config.load().monitor.scan_interval_ticks;
    let mut ticker = new_ticker(ticks);
    info!(interval_ticks = ticks, "scanner started");

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                info!("scanner shutting down");
                break;
            }
            _ = ticker.tick() => {
                if let Err(e) = tick(&shared).await {
                    tracing::error!(error = %e, "scan tick failed");
                }
                let configured = shared.config.load().monitor.scan_interval_ticks;
                if configured != ticks {
                    debug!(from = ticks, to = configured, "scan interval changed");
                    ticks = configured;
                    ticker = new_ticker(ticks);
                    // The first tick of a fresh interval fires immediately.
                    ticker.tick().await;
                }
            }
        }
    }
}

async fn tick(shared: &Arc<Shared>) -> Result<Option<ScanSummary>, ScannerError> {
    let cfg = shared.config.load_full();
    if !shared.monitoring_enabled(&cfg) {
        debug!("monitoring disabled; tick skipped");
        return Ok(None);
    }
    let summary = scan_all(Arc::clone(shared), cfg).await?;
    if summary.violations > 0 {
        info!(
            scanned = summary.entities_scanned,
            violations = summary.violations,
            fixed = summary.fixed,
            deleted = summary.deleted,
            "scan tick found violations"
        );
    } else {
        debug!(scanned = summary.entities_scanned, "scan tick clean");
    }
    Ok(Some(summary))
}

async fn scan_all(shared: Arc<Shared>, cfg: Arc<RuleConfig>) -> Result<ScanSummary, ScannerError> {
    let summary = tokio::task::spawn_blocking(move || {
        let entities = shared.source.active_entities();
        entities
            .par_iter()
            .map(|entity| scan_entity(&shared, &cfg, entity))
            .reduce(ScanSummary::default, |mut acc, one| {
                acc.absorb(one);
                acc
            })
    })
    .await?;
    Ok(summary)
}

fn scan_entity(shared: &Shared, cfg: &RuleConfig, entity: &EntitySnapshot) -> ScanSummary {
    let mut summary = ScanSummary::default();
    if entity.bypass {
        summary.entities_bypassed = 1;
        return summary;
    }
    summary.entities_scanned = 1;

    let evaluator = shared.remediator.evaluator();
    let mut slots: Vec<&(u32, itemguard_domain::Item)> = entity.slots.iter().collect();
    slots.sort_by_key(|(slot, _)| *slot);

    let mut entries = Vec::new();
    for (slot, item) in slots {
        let violations = evaluator.evaluate(Some(item), cfg);
        if violations.is_empty() {
            continue;
        }
        summary.violations += 1;
        entries.push(HistoryEntry {
            at: OffsetDateTime::now_utc(),
            slot: *slot,
            item_kind: item.kind.to_string(),
            codes: violations.iter().map(|v| v.code).collect(),
        });
        emit(shared, entity, *slot, ScanAction::Reported(violations));

        if cfg.monitor.auto_delete {
            summary.deleted += 1;
            emit(shared, entity, *slot, ScanAction::Delete);
        } else if cfg.monitor.auto_fix {
            let fixed = shared.remediator.remediate(item, cfg);
            if &fixed != item {
                summary.fixed += 1;
                emit(shared, entity, *slot, ScanAction::Replace(fixed));
            }
        }
    }

    shared.ledger.record(
        &entity.id,
        entity.name.as_deref(),
        entries,
        cfg.monitor.max_violation_history,
    );
    summary
}

fn emit(shared: &Shared, entity: &EntitySnapshot, slot: u32, action: ScanAction) {
    let event = ScanEvent {
        entity_id: entity.id.clone(),
        slot,
        action,
    };
    // A dropped receiver means nobody is listening; the scan still counts.
    if shared.events.send(event).is_err() {
        debug!(entity = %entity.id, slot, "scan event dropped");
    }
}
