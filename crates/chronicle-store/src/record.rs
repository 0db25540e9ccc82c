use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use chronicle_diff::ChangeSet;
use chronicle_types::{Creator, Entity, EntryId, Map, ObjectId, TypeError};

/// A full recorded version of a tracked object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Assigned by storage; `None` until stored.
    pub id: Option<EntryId>,
    pub entity: Entity,
    pub creator: Creator,
    pub object_id: ObjectId,
    pub value: Map,
    pub timestamp: DateTime<Utc>,
}

impl Snapshot {
    /// A snapshot of `value`, with its identity read from `entity.id_path`.
    pub fn new(
        value: Map,
        entity: Entity,
        creator: Creator,
        timestamp: DateTime<Utc>,
    ) -> Result<Self, TypeError> {
        let object_id = ObjectId::from_map(&value, &entity.id_path)?;
        Ok(Self {
            id: None,
            entity,
            creator,
            object_id,
            value,
            timestamp,
        })
    }

    /// An empty version of `object_id`: the base the first recorded version
    /// is compared against.
    pub fn blank(
        object_id: ObjectId,
        entity: Entity,
        creator: Creator,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: None,
            entity,
            creator,
            object_id,
            value: Map::new(),
            timestamp,
        }
    }

    /// Returns this snapshot with its storage identifier set.
    pub fn with_id(mut self, id: EntryId) -> Self {
        self.id = Some(id);
        self
    }
}

/// A recorded change set between two versions of a tracked object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diff {
    /// Assigned by storage; `None` until stored.
    pub id: Option<EntryId>,
    pub entity: Entity,
    pub creator: Creator,
    pub object_id: ObjectId,
    pub changes: ChangeSet,
    /// Timestamp of the later of the two compared versions.
    pub timestamp: DateTime<Utc>,
    /// The snapshot this diff leads to, when one was stored.
    pub snapshot_id: Option<EntryId>,
}

impl Diff {
    pub fn new(
        changes: ChangeSet,
        object_id: ObjectId,
        entity: Entity,
        creator: Creator,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: None,
            entity,
            creator,
            object_id,
            changes,
            timestamp,
            snapshot_id: None,
        }
    }

    /// Returns `true` if the change set is empty.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Returns this diff with its storage identifier set.
    pub fn with_id(mut self, id: EntryId) -> Self {
        self.id = Some(id);
        self
    }

    /// Returns this diff linked to the snapshot `snapshot_id`.
    pub fn linked_to(mut self, snapshot_id: EntryId) -> Self {
        self.snapshot_id = Some(snapshot_id);
        self
    }
}
