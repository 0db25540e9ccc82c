use chrono::{DateTime, Utc};

use chronicle_types::{Entity, EntryId, ObjectId};

use crate::error::StoreResult;
use crate::query::DiffQuery;
use crate::record::{Diff, Snapshot};

/// Persistent history of snapshots and diffs.
///
/// All implementations must satisfy these invariants:
/// - Every stored record is assigned a fresh [`EntryId`], returned on the
///   stored copy. Any id the caller set is ignored.
/// - Reads are scoped to one entity (matched by name).
/// - "Latest before" lookups are inclusive: a record stamped exactly at the
///   given time qualifies. Among equal timestamps the last stored wins.
/// - All backend errors are propagated, never silently ignored.
/// - Stored values come back with their types intact. A backend that
///   serializes records must restore dates and regexes as
///   [`Value::Date`](chronicle_types::Value::Date) and
///   [`Value::Regex`](chronicle_types::Value::Regex), not as strings;
///   otherwise the next save reports every such field as edited.
pub trait HistoryStore: Send + Sync {
    /// Store a new snapshot.
    fn insert_snapshot(&self, snapshot: Snapshot) -> StoreResult<Snapshot>;

    /// Replace the stored snapshot of the same entity and object, or insert
    /// it if none exists. A replaced snapshot keeps its id.
    fn upsert_snapshot(&self, snapshot: Snapshot) -> StoreResult<Snapshot>;

    /// Store a new diff.
    fn insert_diff(&self, diff: Diff) -> StoreResult<Diff>;

    /// The most recent snapshot of `object_id` at or before `at`.
    fn find_latest_snapshot_before(
        &self,
        entity: &Entity,
        object_id: &ObjectId,
        at: DateTime<Utc>,
    ) -> StoreResult<Option<Snapshot>>;

    /// The most recent diff of `object_id` at or before `at`.
    fn find_latest_diff_before(
        &self,
        entity: &Entity,
        object_id: &ObjectId,
        at: DateTime<Utc>,
    ) -> StoreResult<Option<Diff>>;

    /// Look up a snapshot by its storage id.
    ///
    /// Returns `Ok(None)` if no snapshot of `entity` has that id.
    fn find_snapshot_by_id(&self, id: &EntryId, entity: &Entity)
        -> StoreResult<Option<Snapshot>>;

    /// All diffs of `entity` matching `query`, oldest first.
    fn find_diffs(&self, query: &DiffQuery, entity: &Entity) -> StoreResult<Vec<Diff>>;
}
