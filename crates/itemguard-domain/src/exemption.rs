//! Allow-list of items that bypass every rule.
//!
//! Lookups go through two caches. A kind-keyed filter answers "no entry for
//! this kind exists" without building a fingerprint; a bounded LRU memoizes
//! full fingerprint lookups. Every mutation clears both while holding the
//! state write lock, so a reader never sees a cache entry older than the set
//! it was computed from.

use crate::model::{Item, ItemKind};
use dashmap::DashMap;
use itemguard_types::ExemptionFileV1;
use lru::LruCache;
use parking_lot::{Mutex, RwLock};
use std::collections::{BTreeSet, HashSet};
use std::num::NonZeroUsize;
use std::sync::Arc;
use thiserror::Error;

/// Bound on both caches.
pub const CACHE_CAP: usize = 1000;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("exemption store I/O failed: {0}")]
    Io(String),
    #[error("exemption store is malformed: {0}")]
    Format(String),
}

/// Backing storage for the exemption list.
pub trait ExemptionStore: Send + Sync {
    fn load(&self) -> Result<ExemptionFileV1, StoreError>;
    fn persist(&self, file: &ExemptionFileV1) -> Result<(), StoreError>;
}

/// `KIND[:name][:lore1;lore2]`; absent or empty segments are omitted.
pub fn fingerprint(item: &Item) -> String {
    let mut key = item.kind.as_str().to_string();
    if let Some(meta) = &item.meta {
        if let Some(name) = meta.display_name.as_ref().filter(|n| !n.is_empty()) {
            key.push(':');
            key.push_str(name);
        }
        if let Some(lore) = meta.lore.as_ref().filter(|l| !l.is_empty()) {
            key.push(':');
            key.push_str(&lore.join(";"));
        }
    }
    key
}

/// Kind part of a fingerprint, used to rebuild the kind filter.
fn fingerprint_kind(entry: &str) -> ItemKind {
    ItemKind::new(entry.split(':').next().unwrap_or(entry))
}

#[derive(Debug)]
struct State {
    enabled: bool,
    mode: String,
    entries: BTreeSet<String>,
    kinds: HashSet<ItemKind>,
}

impl State {
    fn from_file(file: ExemptionFileV1) -> Self {
        let entries: BTreeSet<String> = file.entries.into_iter().collect();
        let kinds = entries.iter().map(|e| fingerprint_kind(e)).collect();
        Self {
            enabled: file.enabled,
            mode: file.mode,
            entries,
            kinds,
        }
    }

    fn to_file(&self) -> ExemptionFileV1 {
        ExemptionFileV1 {
            enabled: self.enabled,
            mode: self.mode.clone(),
            entries: self.entries.iter().cloned().collect(),
            ..ExemptionFileV1::default()
        }
    }

    fn rebuild_kinds(&mut self) {
        self.kinds = self.entries.iter().map(|e| fingerprint_kind(e)).collect();
    }
}

pub struct ExemptionCache {
    state: RwLock<State>,
    kind_filter: DashMap<ItemKind, bool>,
    results: Mutex<LruCache<String, bool>>,
    store: Option<Arc<dyn ExemptionStore>>,
}

impl std::fmt::Debug for ExemptionCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExemptionCache")
            .field("state", &*self.state.read())
            .field("kind_filter", &self.kind_filter.len())
            .finish_non_exhaustive()
    }
}

impl Default for ExemptionCache {
    fn default() -> Self {
        Self::from_file(ExemptionFileV1::default())
    }
}

impl ExemptionCache {
    /// In-memory cache with no backing store.
    pub fn from_file(file: ExemptionFileV1) -> Self {
        Self {
            state: RwLock::new(State::from_file(file)),
            kind_filter: DashMap::new(),
            results: Mutex::new(LruCache::new(cache_cap())),
            store: None,
        }
    }

    /// Load from `store`; later mutations are persisted back to it.
    pub fn open(store: Arc<dyn ExemptionStore>) -> Result<Self, StoreError> {
        let file = store.load()?;
        let mut cache = Self::from_file(file);
        cache.store = Some(store);
        Ok(cache)
    }

    pub fn is_enabled(&self) -> bool {
        self.state.read().enabled
    }

    pub fn mode(&self) -> String {
        self.state.read().mode.clone()
    }

    pub fn entries(&self) -> Vec<String> {
        self.state.read().entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.state.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_exempt(&self, item: &Item) -> bool {
        let state = self.state.read();
        if !state.enabled || state.entries.is_empty() {
            return false;
        }

        let kind_listed = match self.kind_filter.get(&item.kind) {
            Some(hit) => *hit,
            None => {
                let listed = state.kinds.contains(&item.kind);
                if self.kind_filter.len() < CACHE_CAP {
                    self.kind_filter.insert(item.kind.clone(), listed);
                }
                listed
            }
        };
        if !kind_listed {
            return false;
        }

        let key = fingerprint(item);
        if let Some(hit) = self.results.lock().get(&key) {
            return *hit;
        }
        let allowed = state.entries.contains(&key);
        self.results.lock().put(key, allowed);
        allowed
    }

    /// Add `item`'s fingerprint. Returns false if it was already listed.
    pub fn add(&self, item: &Item) -> bool {
        let key = fingerprint(item);
        let mut state = self.state.write();
        if !state.entries.insert(key) {
            return false;
        }
        state.kinds.insert(item.kind.clone());
        self.invalidate();
        self.persist(&state);
        true
    }

    /// Remove `item`'s fingerprint. Returns false if it was not listed.
    pub fn remove(&self, item: &Item) -> bool {
        let key = fingerprint(item);
        let mut state = self.state.write();
        if !state.entries.remove(&key) {
            return false;
        }
        state.rebuild_kinds();
        self.invalidate();
        self.persist(&state);
        true
    }

    /// Re-read the backing store. Without a store this only drops the caches.
    pub fn reload(&self) -> Result<(), StoreError> {
        let fresh = match &self.store {
            Some(store) => Some(State::from_file(store.load()?)),
            None => None,
        };
        let mut state = self.state.write();
        if let Some(fresh) = fresh {
            *state = fresh;
        }
        self.invalidate();
        Ok(())
    }

    fn invalidate(&self) {
        self.kind_filter.clear();
        self.results.lock().clear();
    }

    fn persist(&self, state: &State) {
        let Some(store) = &self.store else { return };
        if let Err(err) = store.persist(&state.to_file()) {
            tracing::error!(error = %err, "failed to persist exemption list; keeping in-memory change");
        }
    }
}

fn cache_cap() -> NonZeroUsize {
    NonZeroUsize::new(CACHE_CAP).unwrap_or(NonZeroUsize::MIN)
}
