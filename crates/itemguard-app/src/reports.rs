//! Saved server and entity reports.
//!
//! Each report is one JSON envelope named `<kind>_<subject>_<unix millis>.json`.
//! The millis suffix is the creation time used by retention cleanup, so the
//! directory can be pruned without opening any file.

use crate::persist::PersistQueue;
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use itemguard_domain::policy::ReportSettings;
use itemguard_scanner::Scanner;
use itemguard_types::{
    EntityStats, HistoryEntry, LeaderboardEntry, ReportBody, ReportEnvelope, SCHEMA_REPORT_V1,
    ServerStats, ToolMeta,
};
use std::sync::Arc;
use time::{Duration, OffsetDateTime};
use tracing::{info, warn};

/// Entries shown in a server report's leaderboard.
pub const LEADERBOARD_SIZE: usize = 10;

pub(crate) fn unix_millis(at: OffsetDateTime) -> i64 {
    i64::try_from(at.unix_timestamp_nanos() / 1_000_000).unwrap_or(i64::MAX)
}

/// Entity ids come from the host; keep them to a filename-safe alphabet.
pub(crate) fn file_safe(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' {
                c
            } else {
                '-'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "unknown".to_string()
    } else {
        cleaned
    }
}

fn tool() -> ToolMeta {
    ToolMeta {
        name: "itemguard".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }
}

fn envelope(subject: &str, body: ReportBody, now: OffsetDateTime) -> ReportEnvelope {
    ReportEnvelope {
        schema: SCHEMA_REPORT_V1.to_string(),
        id: format!("{}_{}_{}", body.kind(), file_safe(subject), unix_millis(now)),
        tool: tool(),
        generated_at: now,
        body,
    }
}

pub fn server_report(
    stats: ServerStats,
    leaderboard: Vec<LeaderboardEntry>,
    now: OffsetDateTime,
) -> ReportEnvelope {
    envelope("server", ReportBody::Server { stats, leaderboard }, now)
}

pub fn entity_report(
    entity_id: &str,
    entity_name: Option<String>,
    stats: EntityStats,
    recent: Vec<HistoryEntry>,
    now: OffsetDateTime,
) -> ReportEnvelope {
    envelope(
        entity_id,
        ReportBody::Entity {
            entity_id: entity_id.to_string(),
            entity_name,
            stats,
            recent,
        },
        now,
    )
}

/// Server report straight from a scanner's ledger.
pub fn server_report_from(scanner: &Scanner, now: OffsetDateTime) -> ReportEnvelope {
    server_report(
        scanner.server_stats(),
        scanner.leaderboard(LEADERBOARD_SIZE),
        now,
    )
}

pub fn entity_report_from(scanner: &Scanner, entity_id: &str, now: OffsetDateTime) -> ReportEnvelope {
    entity_report(
        entity_id,
        scanner.entity_name(entity_id),
        scanner.entity_stats(entity_id),
        scanner.entity_history(entity_id),
        now,
    )
}

/// A report file name split into its parts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportFile {
    pub file_name: String,
    pub kind: String,
    pub subject: String,
    pub created_millis: i64,
}

impl ReportFile {
    /// `None` for anything that is not `<kind>_<subject>_<millis>.json`.
    pub fn parse(file_name: &str) -> Option<Self> {
        let stem = file_name.strip_suffix(".json")?;
        let (rest, millis) = stem.rsplit_once('_')?;
        let (kind, subject) = rest.split_once('_')?;
        if kind.is_empty() || subject.is_empty() {
            return None;
        }
        Some(Self {
            file_name: file_name.to_string(),
            kind: kind.to_string(),
            subject: subject.to_string(),
            created_millis: millis.parse().ok()?,
        })
    }
}

#[derive(Debug)]
pub struct ReportStore {
    dir: Utf8PathBuf,
    queue: Arc<PersistQueue>,
}

impl ReportStore {
    pub fn new(dir: impl Into<Utf8PathBuf>, queue: Arc<PersistQueue>) -> Self {
        Self {
            dir: dir.into(),
            queue,
        }
    }

    pub fn dir(&self) -> &Utf8Path {
        &self.dir
    }

    /// Queue `report` for writing. Returns `None` when report generation is off.
    pub fn save(
        &self,
        settings: &ReportSettings,
        report: &ReportEnvelope,
    ) -> anyhow::Result<Option<Utf8PathBuf>> {
        if !settings.enabled {
            return Ok(None);
        }
        let path = self.dir.join(format!("{}.json", report.id));
        self.queue
            .write_json(path.clone(), report)
            .context("queue report")?;
        info!(kind = report.body.kind(), path = %path, "report saved");
        Ok(Some(path))
    }

    /// Report files, newest first. Files with other names are ignored.
    pub fn list(&self) -> anyhow::Result<Vec<ReportFile>> {
        self.queue.flush();
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let mut files = Vec::new();
        for entry in self
            .dir
            .read_dir_utf8()
            .with_context(|| format!("read {}", self.dir))?
        {
            let entry = entry.with_context(|| format!("read {}", self.dir))?;
            if let Some(file) = ReportFile::parse(entry.file_name()) {
                files.push(file);
            }
        }
        files.sort_by(|a, b| {
            b.created_millis
                .cmp(&a.created_millis)
                .then_with(|| a.file_name.cmp(&b.file_name))
        });
        Ok(files)
    }

    pub fn load(&self, file_name: &str) -> anyhow::Result<ReportEnvelope> {
        let path = self.resolve(file_name)?;
        self.queue.flush();
        let text = std::fs::read_to_string(&path).with_context(|| format!("read {path}"))?;
        serde_json::from_str(&text).with_context(|| format!("parse {path}"))
    }

    /// Returns false if no such report existed.
    pub fn delete(&self, file_name: &str) -> anyhow::Result<bool> {
        let path = self.resolve(file_name)?;
        self.queue.flush();
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err).with_context(|| format!("delete {path}")),
        }
    }

    /// Delete reports created more than `retention` before `now`.
    /// Returns how many were removed.
    pub fn cleanup_older_than(
        &self,
        retention: Duration,
        now: OffsetDateTime,
    ) -> anyhow::Result<usize> {
        let cutoff = unix_millis(now - retention);
        let mut removed = 0;
        for file in self.list()? {
            if file.created_millis >= cutoff {
                continue;
            }
            let path = self.dir.join(&file.file_name);
            match std::fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(err) => warn!(path = %path, error = %err, "failed to remove expired report"),
            }
        }
        if removed > 0 {
            info!(removed, "expired reports removed");
        }
        Ok(removed)
    }

    /// Cleanup using the configured retention.
    pub fn apply_retention(
        &self,
        settings: &ReportSettings,
        now: OffsetDateTime,
    ) -> anyhow::Result<usize> {
        self.cleanup_older_than(Duration::days(i64::from(settings.retention_days)), now)
    }

    /// Only bare names of well-formed report files are accepted.
    fn resolve(&self, file_name: &str) -> anyhow::Result<Utf8PathBuf> {
        if ReportFile::parse(file_name).is_none() || file_name.contains(['/', '\\']) {
            anyhow::bail!("not a report file name: {file_name}");
        }
        Ok(self.dir.join(file_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itemguard_types::ViolationCode;
    use time::macros::datetime;

    fn store() -> (tempfile::TempDir, ReportStore) {
        let tmp = tempfile::TempDir::new().expect("temp dir");
        let dir = Utf8PathBuf::from_path_buf(tmp.path().join("reports")).expect("utf8 path");
        let queue = Arc::new(PersistQueue::start().expect("start"));
        (tmp, ReportStore::new(dir, queue))
    }

    fn server_at(now: OffsetDateTime) -> ReportEnvelope {
        server_report(
            ServerStats {
                total_entities: 2,
                total_violations: 3,
                monitoring_enabled: true,
            },
            vec![LeaderboardEntry {
                rank: 1,
                entity_id: "steve".to_string(),
                entity_name: Some("Steve".to_string()),
                violations: 3,
            }],
            now,
        )
    }

    #[test]
    fn file_names_parse_only_when_well_formed() {
        let file = ReportFile::parse("entity_steve-1_1714564800000.json").expect("parse");
        assert_eq!(file.kind, "entity");
        assert_eq!(file.subject, "steve-1");
        assert_eq!(file.created_millis, 1_714_564_800_000);

        for bad in [
            "entity_steve.json",
            "entity_steve_tomorrow.json",
            "server_1714564800000.json",
            "notes.txt",
            "_x_1.json",
        ] {
            assert_eq!(ReportFile::parse(bad), None, "{bad}");
        }
    }

    #[test]
    fn ids_are_filename_safe() {
        let now = datetime!(2024-05-01 00:00 UTC);
        let report = entity_report(
            "../evil id",
            None,
            EntityStats::default(),
            Vec::new(),
            now,
        );
        assert_eq!(report.id, "entity_---evil-id_1714521600000");
        assert!(ReportFile::parse(&format!("{}.json", report.id)).is_some());
    }

    #[test]
    fn saved_reports_round_trip_and_list_newest_first() {
        let (_tmp, store) = store();
        let settings = ReportSettings::default();
        let old = server_at(datetime!(2024-05-01 00:00 UTC));
        let new = entity_report(
            "steve",
            Some("Steve".to_string()),
            EntityStats {
                total_violations: 1,
                recent_violations: 1,
            },
            vec![HistoryEntry {
                at: datetime!(2024-05-02 00:00 UTC),
                slot: 4,
                item_kind: "BEDROCK".to_string(),
                codes: vec![ViolationCode::BannedKind],
            }],
            datetime!(2024-05-02 00:00 UTC),
        );
        store.save(&settings, &old).expect("save");
        store.save(&settings, &new).expect("save");

        let listed = store.list().expect("list");
        let kinds: Vec<&str> = listed.iter().map(|f| f.kind.as_str()).collect();
        assert_eq!(kinds, vec!["entity", "server"]);

        let loaded = store.load(&listed[0].file_name).expect("load");
        assert_eq!(loaded, new);
    }

    #[test]
    fn disabled_reports_are_not_written() {
        let (_tmp, store) = store();
        let settings = ReportSettings {
            enabled: false,
            ..ReportSettings::default()
        };
        let saved = store
            .save(&settings, &server_at(OffsetDateTime::UNIX_EPOCH))
            .expect("save");
        assert_eq!(saved, None);
        assert!(store.list().expect("list").is_empty());
    }

    #[test]
    fn cleanup_uses_the_millis_suffix_and_ignores_strangers() {
        let (_tmp, store) = store();
        let settings = ReportSettings::default();
        let now = datetime!(2024-06-30 00:00 UTC);
        store
            .save(&settings, &server_at(now - Duration::days(31)))
            .expect("save");
        store
            .save(&settings, &server_at(now - Duration::days(29)))
            .expect("save");
        store.list().expect("flush");
        std::fs::write(store.dir().join("server_x_notanumber.json"), "{}").expect("write");
        std::fs::write(store.dir().join("README.txt"), "keep").expect("write");

        let removed = store.apply_retention(&settings, now).expect("cleanup");
        assert_eq!(removed, 1);

        let left = store.list().expect("list");
        assert_eq!(left.len(), 1);
        assert!(store.dir().join("server_x_notanumber.json").exists());
        assert!(store.dir().join("README.txt").exists());
    }

    #[test]
    fn delete_and_load_reject_paths() {
        let (_tmp, store) = store();
        assert!(store.load("../server_x_1.json").is_err());
        assert!(store.delete("notes.txt").is_err());
        assert!(!store.delete("server_server_1.json").expect("delete"));
    }
}
