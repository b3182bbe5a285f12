use dashmap::DashMap;
use itemguard_types::{EntityStats, HistoryEntry, LeaderboardEntry};
use std::collections::VecDeque;

#[derive(Debug, Default)]
struct EntityRecord {
    name: Option<String>,
    total: u64,
    history: VecDeque<HistoryEntry>,
}

/// Per-entity violation counters and bounded history.
///
/// Written concurrently by scan workers; each entity's record sits behind its
/// own shard lock.
#[derive(Debug, Default)]
pub struct Ledger {
    entities: DashMap<String, EntityRecord>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `entries` to the entity's history and trim it to `history_cap`.
    pub fn record(
        &self,
        entity_id: &str,
        name: Option<&str>,
        entries: Vec<HistoryEntry>,
        history_cap: usize,
    ) {
        if entries.is_empty() {
            return;
        }
        let mut record = self.entities.entry(entity_id.to_string()).or_default();
        if let Some(name) = name {
            record.name = Some(name.to_string());
        }
        record.total += entries.len() as u64;
        record.history.extend(entries);
        while record.history.len() > history_cap {
            record.history.pop_front();
        }
    }

    pub fn stats(&self, entity_id: &str) -> EntityStats {
        self.entities
            .get(entity_id)
            .map(|r| EntityStats {
                total_violations: r.total,
                recent_violations: u32::try_from(r.history.len()).unwrap_or(u32::MAX),
            })
            .unwrap_or_default()
    }

    pub fn name(&self, entity_id: &str) -> Option<String> {
        self.entities.get(entity_id).and_then(|r| r.name.clone())
    }

    /// Retained history, oldest first.
    pub fn history(&self, entity_id: &str) -> Vec<HistoryEntry> {
        self.entities
            .get(entity_id)
            .map(|r| r.history.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn entity_count(&self) -> u64 {
        self.entities.len() as u64
    }

    pub fn total_violations(&self) -> u64 {
        self.entities.iter().map(|r| r.total).sum()
    }

    /// Top `n` entities by total, ties broken by id.
    pub fn leaderboard(&self, n: usize) -> Vec<LeaderboardEntry> {
        let mut rows: Vec<(String, Option<String>, u64)> = self
            .entities
            .iter()
            .map(|r| (r.key().clone(), r.name.clone(), r.total))
            .collect();
        rows.sort_by(|a, b| b.2.cmp(&a.2).then_with(|| a.0.cmp(&b.0)));
        rows.into_iter()
            .take(n)
            .enumerate()
            .map(|(i, (entity_id, entity_name, violations))| LeaderboardEntry {
                rank: u32::try_from(i + 1).unwrap_or(u32::MAX),
                entity_id,
                entity_name,
                violations,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.entities.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itemguard_types::ViolationCode;
    use time::OffsetDateTime;

    fn entry(slot: u32) -> HistoryEntry {
        HistoryEntry {
            at: OffsetDateTime::UNIX_EPOCH,
            slot,
            item_kind: "STONE".to_string(),
            codes: vec![ViolationCode::BannedKind],
        }
    }

    #[test]
    fn history_is_trimmed_oldest_first() {
        let ledger = Ledger::new();
        ledger.record("a", None, (0..4).map(entry).collect(), 3);
        ledger.record("a", None, vec![entry(9)], 3);

        let slots: Vec<u32> = ledger.history("a").iter().map(|e| e.slot).collect();
        assert_eq!(slots, vec![2, 3, 9]);
        assert_eq!(
            ledger.stats("a"),
            EntityStats {
                total_violations: 5,
                recent_violations: 3
            }
        );
    }

    #[test]
    fn unknown_entities_report_zero() {
        let ledger = Ledger::new();
        ledger.record("a", None, Vec::new(), 10);
        assert_eq!(ledger.stats("a"), EntityStats::default());
        assert_eq!(ledger.entity_count(), 0);
    }

    #[test]
    fn leaderboard_orders_by_total_then_id() {
        let ledger = Ledger::new();
        ledger.record("carol", Some("Carol"), vec![entry(0)], 10);
        ledger.record("bob", None, vec![entry(0), entry(1)], 10);
        ledger.record("alice", None, vec![entry(0)], 10);

        let board = ledger.leaderboard(2);
        let ids: Vec<&str> = board.iter().map(|e| e.entity_id.as_str()).collect();
        assert_eq!(ids, vec!["bob", "alice"]);
        assert_eq!(board[0].rank, 1);
        assert_eq!(board[1].rank, 2);
        assert_eq!(ledger.total_violations(), 4);
        assert_eq!(ledger.name("carol").as_deref(), Some("Carol"));
    }
}
