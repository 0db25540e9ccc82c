use serde::{Deserialize, Serialize};

use chronicle_diff::DiffOptions;

use crate::error::{HistoryError, HistoryResult};

/// Which records a save writes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersistenceMode {
    /// Insert a snapshot and a diff linked to it.
    #[default]
    SnapshotAndDiff,
    /// Insert a snapshot only.
    SnapshotOnly,
    /// Keep one snapshot per object (upserted) and insert a diff.
    DiffOnly,
}

/// Configuration for entry history.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub mode: PersistenceMode,
    /// Dot-delimited paths excluded from every diff.
    pub ignore_paths: Vec<String>,
}

impl HistoryConfig {
    pub fn new(mode: PersistenceMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    pub fn with_ignored(mut self, path: impl Into<String>) -> Self {
        self.ignore_paths.push(path.into());
        self
    }

    /// Parse a configuration from TOML. Missing fields take their defaults.
    pub fn from_toml_str(source: &str) -> HistoryResult<Self> {
        toml::from_str(source).map_err(|e| HistoryError::Config(e.to_string()))
    }

    pub fn diff_options(&self) -> DiffOptions {
        DiffOptions::with_ignored(self.ignore_paths.iter().cloned())
    }
}
