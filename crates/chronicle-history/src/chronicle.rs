use chrono::{DateTime, Utc};

use chronicle_store::{Diff, DiffQuery, HistoryStore, Snapshot};
use chronicle_types::{Creator, Entity, EntryId, Map};

use crate::config::{HistoryConfig, PersistenceMode};
use crate::error::{HistoryError, HistoryResult};
use crate::service::{EntryService, SaveOutcome};

/// Entry point for recording the history of one entity's objects.
pub struct Chronicle<S> {
    config: HistoryConfig,
    service: EntryService<S>,
}

impl<S: HistoryStore> Chronicle<S> {
    pub fn new(entity: Entity, config: HistoryConfig, store: S) -> Self {
        let service = EntryService::new(entity, store, config.diff_options());
        Self { config, service }
    }

    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    pub fn service(&self) -> &EntryService<S> {
        &self.service
    }

    /// Record a new version of an object, stamped `timestamp` or now.
    ///
    /// The object's identity is read from the entity's identity path.
    pub fn save_entry(
        &self,
        value: Map,
        creator: Creator,
        timestamp: Option<DateTime<Utc>>,
    ) -> HistoryResult<SaveOutcome> {
        let entity = self.service.entity().clone();
        let snapshot = Snapshot::new(value, entity, creator, timestamp.unwrap_or_else(Utc::now))
            .map_err(|e| {
                tracing::warn!(error = %e, "entry has no usable identity");
                HistoryError::MissingIdentity {
                    path: self.service.entity().id_path.dotted(),
                }
            })?;
        match self.config.mode {
            PersistenceMode::SnapshotAndDiff => self.service.save_snapshot_and_diff(snapshot),
            PersistenceMode::SnapshotOnly => self.service.save_snapshot(snapshot),
            PersistenceMode::DiffOnly => self.service.save_diff(snapshot),
        }
    }

    pub fn get_diffs(&self, query: &DiffQuery) -> HistoryResult<Vec<Diff>> {
        self.service.get_diffs(query)
    }

    pub fn get_snapshot_by_id(&self, id: &EntryId) -> HistoryResult<Option<Snapshot>> {
        self.service.get_snapshot_by_id(id)
    }
}
