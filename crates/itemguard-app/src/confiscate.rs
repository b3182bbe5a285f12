//! Storage for items taken away in `store` confiscation mode.

use crate::persist::PersistQueue;
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use itemguard_domain::Item;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use time::OffsetDateTime;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConfiscatedItem {
    /// `None` when the item was not held by an entity (hopper transfers).
    pub entity: Option<String>,
    pub kind: String,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub item: Item,
}

#[derive(Debug)]
pub struct ConfiscationStore {
    dir: Utf8PathBuf,
    queue: Arc<PersistQueue>,
    seq: AtomicU64,
}

impl ConfiscationStore {
    pub fn new(dir: impl Into<Utf8PathBuf>, queue: Arc<PersistQueue>) -> Self {
        Self {
            dir: dir.into(),
            queue,
            seq: AtomicU64::new(0),
        }
    }

    pub fn dir(&self) -> &Utf8Path {
        &self.dir
    }

    /// Queue the record for writing and return the file it will land in.
    pub fn store(
        &self,
        entity: Option<&str>,
        item: &Item,
        now: OffsetDateTime,
    ) -> anyhow::Result<Utf8PathBuf> {
        let record = ConfiscatedItem {
            entity: entity.map(str::to_string),
            kind: item.kind.to_string(),
            timestamp: now,
            item: item.clone(),
        };
        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        let owner = crate::reports::file_safe(entity.unwrap_or("world"));
        let path = self
            .dir
            .join(format!("{owner}_{}_{seq}.json", crate::reports::unix_millis(now)));
        self.queue
            .write_json(path.clone(), &record)
            .context("queue confiscated item")?;
        tracing::info!(entity = entity.unwrap_or("-"), kind = %item.kind, path = %path, "item confiscated");
        Ok(path)
    }

    /// Every stored record, oldest first. Unreadable files are skipped.
    pub fn list(&self) -> anyhow::Result<Vec<ConfiscatedItem>> {
        self.queue.flush();
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let mut records = Vec::new();
        for entry in self
            .dir
            .read_dir_utf8()
            .with_context(|| format!("read {}", self.dir))?
        {
            let entry = entry.with_context(|| format!("read {}", self.dir))?;
            if entry.path().extension() != Some("json") {
                continue;
            }
            match std::fs::read_to_string(entry.path())
                .map_err(anyhow::Error::from)
                .and_then(|text| Ok(serde_json::from_str::<ConfiscatedItem>(&text)?))
            {
                Ok(record) => records.push(record),
                Err(err) => {
                    tracing::warn!(path = %entry.path(), error = %err, "skipping unreadable confiscation record");
                }
            }
        }
        records.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn stored_items_are_listed_with_their_owner() {
        let tmp = tempfile::TempDir::new().expect("temp dir");
        let dir = Utf8PathBuf::from_path_buf(tmp.path().join("confiscated")).expect("utf8 path");
        let queue = Arc::new(PersistQueue::start().expect("start"));
        let store = ConfiscationStore::new(dir.clone(), queue);

        let later = datetime!(2024-05-01 12:00:01 UTC);
        let earlier = datetime!(2024-05-01 12:00:00 UTC);
        let first = store
            .store(Some("steve"), &Item::new("BEDROCK", 64), later)
            .expect("store");
        store
            .store(None, &Item::new("barrier", 1), earlier)
            .expect("store");

        assert!(first.as_str().contains("steve_1714564801000_0"));
        let records = store.list().expect("list");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].entity, None);
        assert_eq!(records[0].kind, "BARRIER");
        assert_eq!(records[1].entity.as_deref(), Some("steve"));
        assert_eq!(records[1].item.amount, 64);
    }

    #[test]
    fn missing_directory_lists_nothing() {
        let tmp = tempfile::TempDir::new().expect("temp dir");
        let dir = Utf8PathBuf::from_path_buf(tmp.path().join("never")).expect("utf8 path");
        let store = ConfiscationStore::new(dir, Arc::new(PersistQueue::start().expect("start")));
        assert!(store.list().expect("list").is_empty());
    }
}
