use chronicle_diff::{compare, DiffOptions};
use chronicle_store::{Diff, DiffQuery, HistoryStore, Snapshot};
use chronicle_types::{Entity, EntryId};

use crate::error::{HistoryError, HistoryResult};

/// Result of a save.
#[derive(Clone, Debug, PartialEq)]
pub enum SaveOutcome {
    /// The version matched the latest recorded one; nothing was written.
    Unchanged,
    /// Records written, as returned by the store.
    Saved {
        snapshot: Option<Snapshot>,
        diff: Option<Diff>,
    },
}

impl SaveOutcome {
    pub fn is_unchanged(&self) -> bool {
        matches!(self, SaveOutcome::Unchanged)
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        match self {
            SaveOutcome::Saved { snapshot, .. } => snapshot.as_ref(),
            SaveOutcome::Unchanged => None,
        }
    }

    pub fn diff(&self) -> Option<&Diff> {
        match self {
            SaveOutcome::Saved { diff, .. } => diff.as_ref(),
            SaveOutcome::Unchanged => None,
        }
    }
}

/// Records versions of one entity's objects into a [`HistoryStore`].
///
/// Each save looks up the latest prior snapshot of the object, diffs the new
/// version against it and writes the records the chosen mode asks for. The
/// first version of an object is diffed against an empty one. Saves of the
/// same object must not run concurrently.
pub struct EntryService<S> {
    entity: Entity,
    store: S,
    options: DiffOptions,
}

impl<S: HistoryStore> EntryService<S> {
    pub fn new(entity: Entity, store: S, options: DiffOptions) -> Self {
        Self {
            entity,
            store,
            options,
        }
    }

    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn options(&self) -> &DiffOptions {
        &self.options
    }

    /// Diff two versions of the same object.
    ///
    /// The versions may be given in either order: the diff always reads
    /// from the earlier to the later one, and carries the later one's
    /// entity, creator and timestamp.
    pub fn diff(&self, first: &Snapshot, second: &Snapshot) -> HistoryResult<Diff> {
        if first.object_id != second.object_id {
            tracing::warn!(
                old = %first.object_id,
                new = %second.object_id,
                "refusing to diff different objects"
            );
            return Err(HistoryError::IdentityMismatch {
                old: first.object_id.clone(),
                new: second.object_id.clone(),
            });
        }
        if first.entity != second.entity {
            tracing::warn!(
                old = %first.entity,
                new = %second.entity,
                "refusing to diff different entities"
            );
            return Err(HistoryError::EntityMismatch {
                old: first.entity.clone(),
                new: second.entity.clone(),
            });
        }

        let (old, new) = if second.timestamp < first.timestamp {
            (second, first)
        } else {
            (first, second)
        };
        let changes = compare(&old.value, &new.value, &self.options);
        Ok(Diff::new(
            changes,
            new.object_id.clone(),
            new.entity.clone(),
            new.creator.clone(),
            new.timestamp,
        ))
    }

    /// Insert the snapshot and a diff linked to it.
    pub fn save_snapshot_and_diff(&self, snapshot: Snapshot) -> HistoryResult<SaveOutcome> {
        let diff = self.diff_against_prior(&snapshot)?;
        if diff.is_empty() {
            return Ok(self.unchanged(&snapshot));
        }
        let snapshot = self.store.insert_snapshot(snapshot)?;
        let diff = self.link_and_insert(diff, &snapshot)?;
        self.saved(Some(snapshot), Some(diff))
    }

    /// Insert the snapshot only.
    pub fn save_snapshot(&self, snapshot: Snapshot) -> HistoryResult<SaveOutcome> {
        let diff = self.diff_against_prior(&snapshot)?;
        if diff.is_empty() {
            return Ok(self.unchanged(&snapshot));
        }
        let snapshot = self.store.insert_snapshot(snapshot)?;
        self.saved(Some(snapshot), None)
    }

    /// Replace the object's snapshot and insert a diff linked to it.
    pub fn save_diff(&self, snapshot: Snapshot) -> HistoryResult<SaveOutcome> {
        let diff = self.diff_against_prior(&snapshot)?;
        if diff.is_empty() {
            return Ok(self.unchanged(&snapshot));
        }
        let snapshot = self.store.upsert_snapshot(snapshot)?;
        let diff = self.link_and_insert(diff, &snapshot)?;
        self.saved(Some(snapshot), Some(diff))
    }

    /// Stored diffs of this entity matching `query`, oldest first.
    pub fn get_diffs(&self, query: &DiffQuery) -> HistoryResult<Vec<Diff>> {
        Ok(self.store.find_diffs(query, &self.entity)?)
    }

    pub fn get_snapshot_by_id(&self, id: &EntryId) -> HistoryResult<Option<Snapshot>> {
        Ok(self.store.find_snapshot_by_id(id, &self.entity)?)
    }

    fn diff_against_prior(&self, snapshot: &Snapshot) -> HistoryResult<Diff> {
        if snapshot.entity != self.entity {
            tracing::warn!(
                expected = %self.entity,
                found = %snapshot.entity,
                "snapshot belongs to another entity"
            );
            return Err(HistoryError::EntityMismatch {
                old: self.entity.clone(),
                new: snapshot.entity.clone(),
            });
        }
        let prior = self
            .store
            .find_latest_snapshot_before(&self.entity, &snapshot.object_id, snapshot.timestamp)?
            .unwrap_or_else(|| {
                Snapshot::blank(
                    snapshot.object_id.clone(),
                    snapshot.entity.clone(),
                    snapshot.creator.clone(),
                    snapshot.timestamp,
                )
            });
        self.diff(&prior, snapshot)
    }

    fn link_and_insert(&self, diff: Diff, snapshot: &Snapshot) -> HistoryResult<Diff> {
        let diff = match snapshot.id {
            Some(id) => diff.linked_to(id),
            None => diff,
        };
        Ok(self.store.insert_diff(diff)?)
    }

    fn unchanged(&self, snapshot: &Snapshot) -> SaveOutcome {
        tracing::debug!(
            entity = %self.entity.name,
            object = %snapshot.object_id,
            "no changes, nothing saved"
        );
        SaveOutcome::Unchanged
    }

    fn saved(&self, snapshot: Option<Snapshot>, diff: Option<Diff>) -> HistoryResult<SaveOutcome> {
        tracing::info!(
            entity = %self.entity.name,
            object = ?snapshot.as_ref().map(|s| s.object_id.as_str()),
            snapshot_id = ?snapshot.as_ref().and_then(|s| s.id),
            changes = diff.as_ref().map_or(0, |d| d.changes.len()),
            "entry saved"
        );
        Ok(SaveOutcome::Saved { snapshot, diff })
    }
}

impl<S> std::fmt::Debug for EntryService<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntryService")
            .field("entity", &self.entity)
            .field("options", &self.options)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chronicle_diff::{Action, ChangeRecord};
    use chronicle_store::{InMemoryHistoryStore, StoreError, StoreResult};
    use chronicle_types::{Creator, Map, ObjectId, PropertyPath, Value};
    use chrono::{DateTime, TimeZone, Utc};
    use serde_json::json;

    fn order() -> Entity {
        Entity::new("Order", "my.identificator")
    }

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2016, 6, 11, hour, 0, 0).unwrap()
    }

    fn map(value: serde_json::Value) -> Map {
        Value::from(value).into_object().unwrap()
    }

    fn version(value: serde_json::Value, user: &str, hour: u32) -> Snapshot {
        Snapshot::new(map(value), order(), Creator::new(user, "sourceapp"), at(hour)).unwrap()
    }

    fn service() -> EntryService<InMemoryHistoryStore> {
        EntryService::new(order(), InMemoryHistoryStore::new(), DiffOptions::new())
    }

    fn v1() -> serde_json::Value {
        json!({"my": {"identificator": "abcdef"}, "data": {"a": "old", "no": 1}})
    }

    fn v2() -> serde_json::Value {
        json!({"my": {"identificator": "abcdef"}, "data": {"a": "new", "b": true}})
    }

    #[test]
    fn identity_mismatch() {
        let a = version(v1(), "u", 1);
        let b = version(json!({"my": {"identificator": "other"}}), "u", 2);
        let err = service().diff(&a, &b).unwrap_err();
        match err {
            HistoryError::IdentityMismatch { old, new } => {
                assert_eq!(old.as_str(), "abcdef");
                assert_eq!(new.as_str(), "other");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn entity_mismatch() {
        let a = version(v1(), "u", 1);
        let b = Snapshot::new(
            map(v1()),
            Entity::new("Invoice", "my.identificator"),
            Creator::new("u", "app"),
            at(2),
        )
        .unwrap();
        assert!(matches!(
            service().diff(&a, &b),
            Err(HistoryError::EntityMismatch { .. })
        ));
    }

    #[test]
    fn diff_reads_old_to_new_in_either_order() {
        let earlier = version(v1(), "alice", 1);
        let later = version(v2(), "bob", 2);
        let service = service();

        let forward = service.diff(&earlier, &later).unwrap();
        let backward = service.diff(&later, &earlier).unwrap();
        assert_eq!(forward, backward);
        assert_eq!(backward.creator.user, "bob");
        assert_eq!(backward.timestamp, at(2));
        assert_eq!(
            backward.changes.changes,
            vec![
                ChangeRecord::edited(
                    PropertyPath::parse("data.a"),
                    Value::from("old"),
                    Value::from("new")
                ),
                ChangeRecord::deleted(PropertyPath::parse("data.no"), Value::from(1i64)),
                ChangeRecord::created(PropertyPath::parse("data.b"), Value::from(true)),
            ]
        );
    }

    #[test]
    fn first_save_diffs_against_empty() {
        let service = service();
        let first = version(v1(), "u", 1);
        let expected = compare(&Map::new(), &first.value, &DiffOptions::new());

        let outcome = service.save_snapshot_and_diff(first).unwrap();
        let diff = outcome.diff().unwrap();
        assert_eq!(diff.changes, expected);
        assert!(diff.changes.iter().all(|c| c.action() == Action::Created));
    }

    #[test]
    fn snapshot_and_diff_links_records() {
        let service = service();
        service.save_snapshot_and_diff(version(v1(), "u", 1)).unwrap();
        let outcome = service.save_snapshot_and_diff(version(v2(), "u", 2)).unwrap();

        let snapshot = outcome.snapshot().unwrap();
        let diff = outcome.diff().unwrap();
        assert!(snapshot.id.is_some());
        assert!(diff.id.is_some());
        assert_eq!(diff.snapshot_id, snapshot.id);
        assert_eq!(diff.changes.len(), 3);
        assert_eq!(service.store().snapshot_count().unwrap(), 2);
        assert_eq!(service.store().diff_count().unwrap(), 2);
    }

    #[test]
    fn unchanged_dates_are_not_edits() {
        let service = service();
        let with_date = |hour| {
            let mut value = map(v1());
            value.insert("placed".into(), Value::Date(at(1)));
            Snapshot::new(value, order(), Creator::new("u", "sourceapp"), at(hour)).unwrap()
        };
        service.save_snapshot_and_diff(with_date(1)).unwrap();
        assert!(service
            .save_snapshot_and_diff(with_date(2))
            .unwrap()
            .is_unchanged());
    }

    #[test]
    fn unchanged_version_writes_nothing() {
        let service = service();
        service.save_snapshot_and_diff(version(v1(), "u", 1)).unwrap();
        let outcome = service.save_snapshot_and_diff(version(v1(), "u", 2)).unwrap();
        assert!(outcome.is_unchanged());
        assert!(outcome.snapshot().is_none());
        assert_eq!(service.store().snapshot_count().unwrap(), 1);
        assert_eq!(service.store().diff_count().unwrap(), 1);
    }

    #[test]
    fn snapshot_only_mode() {
        let service = service();
        service.save_snapshot(version(v1(), "u", 1)).unwrap();
        let outcome = service.save_snapshot(version(v2(), "u", 2)).unwrap();
        assert!(outcome.snapshot().is_some());
        assert!(outcome.diff().is_none());
        assert!(service.save_snapshot(version(v2(), "u", 3)).unwrap().is_unchanged());
        assert_eq!(service.store().snapshot_count().unwrap(), 2);
        assert_eq!(service.store().diff_count().unwrap(), 0);
    }

    #[test]
    fn diff_only_mode_keeps_one_snapshot() {
        let service = service();
        let first = service.save_diff(version(v1(), "u", 1)).unwrap();
        let second = service.save_diff(version(v2(), "u", 2)).unwrap();

        let snapshot_id = first.snapshot().unwrap().id;
        assert_eq!(second.snapshot().unwrap().id, snapshot_id);
        assert_eq!(second.diff().unwrap().snapshot_id, snapshot_id);
        assert_eq!(second.diff().unwrap().changes.edited(), 1);

        assert_eq!(service.store().snapshot_count().unwrap(), 1);
        assert_eq!(service.store().diff_count().unwrap(), 2);
        let stored = service.store().snapshots().unwrap().remove(0);
        assert_eq!(stored.value, map(v2()));
    }

    #[test]
    fn foreign_entity_is_rejected_before_store_access() {
        let service = service();
        let invoice = Snapshot::new(
            map(v1()),
            Entity::new("Invoice", "my.identificator"),
            Creator::new("u", "app"),
            at(1),
        )
        .unwrap();
        assert!(matches!(
            service.save_snapshot_and_diff(invoice),
            Err(HistoryError::EntityMismatch { .. })
        ));
        assert_eq!(service.store().snapshot_count().unwrap(), 0);
    }

    #[test]
    fn ignored_paths_do_not_count_as_changes() {
        let service = EntryService::new(
            order(),
            InMemoryHistoryStore::new(),
            DiffOptions::with_ignored(["data.secret"]),
        );
        let base = json!({"my": {"identificator": "abcdef"}, "data": {"secret": 1}});
        let touched = json!({"my": {"identificator": "abcdef"}, "data": {"secret": 2}});
        service.save_snapshot_and_diff(version(base, "u", 1)).unwrap();
        assert!(service
            .save_snapshot_and_diff(version(touched, "u", 2))
            .unwrap()
            .is_unchanged());
    }

    #[test]
    fn queries_forward_to_store() {
        let service = service();
        let first = service.save_snapshot_and_diff(version(v1(), "alice", 1)).unwrap();
        service.save_snapshot_and_diff(version(v2(), "bob", 2)).unwrap();

        let all = service.get_diffs(&DiffQuery::new()).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].timestamp, at(1));

        let by_bob = service
            .get_diffs(&DiffQuery::new().by_creator(Creator::new("bob", "sourceapp")))
            .unwrap();
        assert_eq!(by_bob.len(), 1);

        let id = first.snapshot().unwrap().id.unwrap();
        let found = service.get_snapshot_by_id(&id).unwrap().unwrap();
        assert_eq!(found.value, map(v1()));
        assert!(service.get_snapshot_by_id(&EntryId::new()).unwrap().is_none());
    }

    /// Store wrapper that fails selected writes.
    #[derive(Default)]
    struct FlakyStore {
        inner: InMemoryHistoryStore,
        fail_snapshots: bool,
        fail_diffs: bool,
    }

    impl HistoryStore for FlakyStore {
        fn insert_snapshot(&self, snapshot: Snapshot) -> StoreResult<Snapshot> {
            if self.fail_snapshots {
                return Err(StoreError::Backend("snapshot write refused".into()));
            }
            self.inner.insert_snapshot(snapshot)
        }

        fn upsert_snapshot(&self, snapshot: Snapshot) -> StoreResult<Snapshot> {
            if self.fail_snapshots {
                return Err(StoreError::Backend("snapshot write refused".into()));
            }
            self.inner.upsert_snapshot(snapshot)
        }

        fn insert_diff(&self, diff: Diff) -> StoreResult<Diff> {
            if self.fail_diffs {
                return Err(StoreError::Backend("diff write refused".into()));
            }
            self.inner.insert_diff(diff)
        }

        fn find_latest_snapshot_before(
            &self,
            entity: &Entity,
            object_id: &ObjectId,
            at: DateTime<Utc>,
        ) -> StoreResult<Option<Snapshot>> {
            self.inner.find_latest_snapshot_before(entity, object_id, at)
        }

        fn find_latest_diff_before(
            &self,
            entity: &Entity,
            object_id: &ObjectId,
            at: DateTime<Utc>,
        ) -> StoreResult<Option<Diff>> {
            self.inner.find_latest_diff_before(entity, object_id, at)
        }

        fn find_snapshot_by_id(
            &self,
            id: &EntryId,
            entity: &Entity,
        ) -> StoreResult<Option<Snapshot>> {
            self.inner.find_snapshot_by_id(id, entity)
        }

        fn find_diffs(&self, query: &DiffQuery, entity: &Entity) -> StoreResult<Vec<Diff>> {
            self.inner.find_diffs(query, entity)
        }
    }

    #[test]
    fn failed_diff_write_leaves_snapshot() {
        let store = FlakyStore {
            fail_diffs: true,
            ..Default::default()
        };
        let service = EntryService::new(order(), store, DiffOptions::new());
        let err = service
            .save_snapshot_and_diff(version(v1(), "u", 1))
            .unwrap_err();
        assert!(matches!(err, HistoryError::Store(StoreError::Backend(_))));
        assert_eq!(service.store().inner.snapshot_count().unwrap(), 1);
        assert_eq!(service.store().inner.diff_count().unwrap(), 0);
    }

    #[test]
    fn failed_snapshot_write_prevents_diff() {
        let store = FlakyStore {
            fail_snapshots: true,
            ..Default::default()
        };
        let service = EntryService::new(order(), store, DiffOptions::new());
        assert!(service.save_snapshot_and_diff(version(v1(), "u", 1)).is_err());
        assert!(service.save_diff(version(v1(), "u", 1)).is_err());
        assert_eq!(service.store().inner.snapshot_count().unwrap(), 0);
        assert_eq!(service.store().inner.diff_count().unwrap(), 0);
    }
}
