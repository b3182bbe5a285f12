//! JSON file backing for the exemption list.

use crate::persist::PersistQueue;
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use itemguard_domain::{ExemptionCache, ExemptionStore, StoreError};
use itemguard_types::ExemptionFileV1;
use std::io;
use std::sync::Arc;

/// Reads `exemptions.json` directly and writes it through the persistence queue.
#[derive(Debug)]
pub struct JsonExemptionStore {
    path: Utf8PathBuf,
    queue: Arc<PersistQueue>,
}

impl JsonExemptionStore {
    pub fn new(path: impl Into<Utf8PathBuf>, queue: Arc<PersistQueue>) -> Self {
        Self {
            path: path.into(),
            queue,
        }
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

impl ExemptionStore for JsonExemptionStore {
    /// A missing file is an empty, enabled list.
    fn load(&self) -> Result<ExemptionFileV1, StoreError> {
        // Pending writes must land first or a reload would read stale data.
        self.queue.flush();
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Ok(ExemptionFileV1::default());
            }
            Err(err) => return Err(StoreError::Io(format!("{}: {err}", self.path))),
        };
        serde_json::from_str(&text)
            .map_err(|err| StoreError::Format(format!("{}: {err}", self.path)))
    }

    fn persist(&self, file: &ExemptionFileV1) -> Result<(), StoreError> {
        self.queue
            .write_json(self.path.clone(), file)
            .map_err(|err| StoreError::Format(format!("{err:#}")))
    }
}

/// Open the cache over `path`, creating nothing until the first mutation.
pub fn open_exemptions(
    path: impl Into<Utf8PathBuf>,
    queue: Arc<PersistQueue>,
) -> anyhow::Result<Arc<ExemptionCache>> {
    let store = JsonExemptionStore::new(path, queue);
    let label = store.path().to_string();
    let cache = ExemptionCache::open(Arc::new(store))
        .with_context(|| format!("open exemptions {label}"))?;
    Ok(Arc::new(cache))
}
