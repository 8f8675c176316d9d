//! # Keyed Store
//!
//! This module defines [`KeyedStore`], the generic concurrency-safe container that
//! holds one record kind and owns its identity counter.
//!
//! ## Concurrency Model
//!
//! Each store has exactly one `tokio::sync::RwLock` guarding both the map and the
//! counter. Reads take the shared side and hand back clones. Writes take the exclusive
//! side for the duration of the mutation only. No method calls into another store or
//! performs I/O while holding the lock, so no code path ever holds two store locks.

use crate::framework::{Record, RecordId, StoreError};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

struct StoreState<T> {
    records: HashMap<RecordId, T>,
    next_id: RecordId,
}

/// A concurrency-safe map from identity to record with a monotonic identity counter.
///
/// The handle is cheap to clone; clones share the same underlying state.
///
/// # Operations
///
/// * **Create**: assigns the current counter value, advances the counter, inserts.
/// * **Read**: returns a copy or `NotFound`.
/// * **Update**: replaces the stored value wholesale, forcing the identity to `id`.
/// * **Delete**: hard removal. The identity is never reissued.
/// * **List**: copies of every record, in no particular order.
/// * **Export/Import**: bulk access used by snapshot persistence only.
pub struct KeyedStore<T: Record> {
    inner: Arc<RwLock<StoreState<T>>>,
}

impl<T: Record> Clone for KeyedStore<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Record> Default for KeyedStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Record> KeyedStore<T> {
    /// Creates an empty store whose first identity will be `1`.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(StoreState {
                records: HashMap::new(),
                next_id: 1,
            })),
        }
    }

    fn not_found(id: RecordId) -> StoreError {
        StoreError::NotFound { kind: T::KIND, id }
    }

    /// Inserts `record` under the next identity and returns the stored copy.
    pub async fn create(&self, mut record: T) -> T {
        let mut state = self.inner.write().await;
        let id = state.next_id;
        state.next_id += 1;
        record.assign_id(id);
        state.records.insert(id, record.clone());
        debug!(entity_type = T::KIND, id, size = state.records.len(), "Create");
        record
    }

    /// Like [`create`](Self::create), but gives up without touching the store if
    /// `token` is cancelled before the write lock is held.
    ///
    /// Returns `None` when the insert was skipped. The token is checked again after
    /// the lock is acquired, so a cancelled caller never leaves a record behind and
    /// never advances the counter.
    pub async fn create_unless_cancelled(&self, mut record: T, token: &CancellationToken) -> Option<T> {
        let mut state = tokio::select! {
            biased;
            _ = token.cancelled() => {
                debug!(entity_type = T::KIND, "Create cancelled before lock");
                return None;
            }
            state = self.inner.write() => state,
        };
        if token.is_cancelled() {
            debug!(entity_type = T::KIND, "Create cancelled under lock");
            return None;
        }
        let id = state.next_id;
        state.next_id += 1;
        record.assign_id(id);
        state.records.insert(id, record.clone());
        debug!(entity_type = T::KIND, id, size = state.records.len(), "Create");
        Some(record)
    }

    /// Returns a copy of the record stored under `id`.
    pub async fn read(&self, id: RecordId) -> Result<T, StoreError> {
        let state = self.inner.read().await;
        let found = state.records.get(&id).cloned();
        debug!(entity_type = T::KIND, id, found = found.is_some(), "Get");
        found.ok_or_else(|| Self::not_found(id))
    }

    /// Replaces the record stored under `id`. The identity carried by `record` is ignored.
    pub async fn update(&self, id: RecordId, mut record: T) -> Result<T, StoreError> {
        let mut state = self.inner.write().await;
        let Some(slot) = state.records.get_mut(&id) else {
            warn!(entity_type = T::KIND, id, "Not found");
            return Err(Self::not_found(id));
        };
        record.assign_id(id);
        *slot = record.clone();
        debug!(entity_type = T::KIND, id, "Update");
        Ok(record)
    }

    /// Removes the record stored under `id`.
    pub async fn delete(&self, id: RecordId) -> Result<(), StoreError> {
        let mut state = self.inner.write().await;
        if state.records.remove(&id).is_none() {
            warn!(entity_type = T::KIND, id, "Not found");
            return Err(Self::not_found(id));
        }
        debug!(entity_type = T::KIND, id, size = state.records.len(), "Delete");
        Ok(())
    }

    /// Copies of every record currently stored. Order is unspecified.
    pub async fn list(&self) -> Vec<T> {
        let state = self.inner.read().await;
        state.records.values().cloned().collect()
    }

    /// Copies of every record satisfying `predicate`. Order is unspecified.
    pub async fn filter<F>(&self, predicate: F) -> Vec<T>
    where
        F: Fn(&T) -> bool,
    {
        let state = self.inner.read().await;
        state
            .records
            .values()
            .filter(|record| predicate(record))
            .cloned()
            .collect()
    }

    /// Number of records currently stored.
    pub async fn len(&self) -> usize {
        self.inner.read().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// The identity the next create will assign.
    pub async fn next_id(&self) -> RecordId {
        self.inner.read().await.next_id
    }

    /// Copy of the full contents plus the counter, taken under one read lock.
    pub async fn export_all(&self) -> (HashMap<RecordId, T>, RecordId) {
        let state = self.inner.read().await;
        (state.records.clone(), state.next_id)
    }

    /// Replaces the full contents and the counter.
    ///
    /// Each record's identity is forced to its map key. The counter is raised to at
    /// least one past the highest imported key so an inconsistent artifact can't
    /// cause an identity to be handed out twice.
    pub async fn import_all(&self, mut records: HashMap<RecordId, T>, next_id: RecordId) {
        for (id, record) in records.iter_mut() {
            record.assign_id(*id);
        }
        let floor = records.keys().max().map_or(1, |max| max + 1);
        if next_id < floor {
            warn!(entity_type = T::KIND, next_id, floor, "Imported counter behind keys, raising");
        }
        let next_id = next_id.max(floor);
        let mut state = self.inner.write().await;
        state.records = records;
        state.next_id = next_id;
        debug!(entity_type = T::KIND, size = state.records.len(), next_id, "Import");
    }
}
