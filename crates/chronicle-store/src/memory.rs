use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};

use chronicle_types::{Entity, EntryId, ObjectId};

use crate::error::{StoreError, StoreResult};
use crate::query::DiffQuery;
use crate::record::{Diff, Snapshot};
use crate::traits::HistoryStore;

#[derive(Default)]
struct StoreState {
    snapshots: Vec<Snapshot>,
    diffs: Vec<Diff>,
}

/// In-memory history store.
///
/// Intended for tests and embedding. Records are held in insertion order
/// behind a `RwLock` and cloned on read/write.
pub struct InMemoryHistoryStore {
    state: RwLock<StoreState>,
}

impl InMemoryHistoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(StoreState::default()),
        }
    }

    /// Number of snapshots currently stored.
    pub fn snapshot_count(&self) -> StoreResult<usize> {
        Ok(self.read()?.snapshots.len())
    }

    /// Number of diffs currently stored.
    pub fn diff_count(&self) -> StoreResult<usize> {
        Ok(self.read()?.diffs.len())
    }

    /// Every stored snapshot, in insertion order.
    pub fn snapshots(&self) -> StoreResult<Vec<Snapshot>> {
        Ok(self.read()?.snapshots.clone())
    }

    /// Every stored diff, in insertion order.
    pub fn diffs(&self) -> StoreResult<Vec<Diff>> {
        Ok(self.read()?.diffs.clone())
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, StoreState>> {
        self.state
            .read()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, StoreState>> {
        self.state
            .write()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))
    }
}

impl Default for InMemoryHistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn same_object(entity: &Entity, object_id: &ObjectId, other: &Entity, other_id: &ObjectId) -> bool {
    entity.name == other.name && object_id == other_id
}

impl HistoryStore for InMemoryHistoryStore {
    fn insert_snapshot(&self, snapshot: Snapshot) -> StoreResult<Snapshot> {
        let stored = snapshot.with_id(EntryId::new());
        let mut state = self.write()?;
        state.snapshots.push(stored.clone());
        tracing::debug!(
            entity = %stored.entity.name,
            object = %stored.object_id,
            "snapshot inserted"
        );
        Ok(stored)
    }

    fn upsert_snapshot(&self, snapshot: Snapshot) -> StoreResult<Snapshot> {
        let mut state = self.write()?;
        let existing = state.snapshots.iter_mut().find(|s| {
            same_object(&s.entity, &s.object_id, &snapshot.entity, &snapshot.object_id)
        });
        match existing {
            Some(slot) => {
                let id = slot.id.unwrap_or_default();
                let stored = snapshot.with_id(id);
                *slot = stored.clone();
                tracing::debug!(
                    entity = %stored.entity.name,
                    object = %stored.object_id,
                    "snapshot replaced"
                );
                Ok(stored)
            }
            None => {
                let stored = snapshot.with_id(EntryId::new());
                state.snapshots.push(stored.clone());
                tracing::debug!(
                    entity = %stored.entity.name,
                    object = %stored.object_id,
                    "snapshot inserted by upsert"
                );
                Ok(stored)
            }
        }
    }

    fn insert_diff(&self, diff: Diff) -> StoreResult<Diff> {
        let stored = diff.with_id(EntryId::new());
        let mut state = self.write()?;
        state.diffs.push(stored.clone());
        tracing::debug!(
            entity = %stored.entity.name,
            object = %stored.object_id,
            changes = stored.changes.len(),
            "diff inserted"
        );
        Ok(stored)
    }

    fn find_latest_snapshot_before(
        &self,
        entity: &Entity,
        object_id: &ObjectId,
        at: DateTime<Utc>,
    ) -> StoreResult<Option<Snapshot>> {
        let state = self.read()?;
        Ok(state
            .snapshots
            .iter()
            .filter(|s| same_object(&s.entity, &s.object_id, entity, object_id))
            .filter(|s| s.timestamp <= at)
            .max_by_key(|s| s.timestamp)
            .cloned())
    }

    fn find_latest_diff_before(
        &self,
        entity: &Entity,
        object_id: &ObjectId,
        at: DateTime<Utc>,
    ) -> StoreResult<Option<Diff>> {
        let state = self.read()?;
        Ok(state
            .diffs
            .iter()
            .filter(|d| same_object(&d.entity, &d.object_id, entity, object_id))
            .filter(|d| d.timestamp <= at)
            .max_by_key(|d| d.timestamp)
            .cloned())
    }

    fn find_snapshot_by_id(
        &self,
        id: &EntryId,
        entity: &Entity,
    ) -> StoreResult<Option<Snapshot>> {
        let state = self.read()?;
        Ok(state
            .snapshots
            .iter()
            .find(|s| s.id.as_ref() == Some(id) && s.entity.name == entity.name)
            .cloned())
    }

    fn find_diffs(&self, query: &DiffQuery, entity: &Entity) -> StoreResult<Vec<Diff>> {
        let state = self.read()?;
        let mut found: Vec<Diff> = state
            .diffs
            .iter()
            .filter(|d| d.entity.name == entity.name && query.matches(d))
            .cloned()
            .collect();
        // Stable: equal timestamps keep insertion order.
        found.sort_by_key(|d| d.timestamp);
        Ok(found)
    }
}

impl std::fmt::Debug for InMemoryHistoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut out = f.debug_struct("InMemoryHistoryStore");
        match self.read() {
            Ok(state) => out
                .field("snapshot_count", &state.snapshots.len())
                .field("diff_count", &state.diffs.len()),
            Err(_) => out.field("poisoned", &true),
        };
        out.finish()
    }
}
