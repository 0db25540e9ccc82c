//! Change records produced by the diff engine.

use chronicle_types::{PropertyPath, Value};
use serde::{Deserialize, Serialize};

use crate::array_diff::reconcile;

/// The kind of a [`ChangeRecord`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Created,
    Edited,
    Deleted,
    Array,
}

/// A single difference found at a property path.
///
/// Each variant carries exactly the values its action allows: `created`
/// has only a new value, `deleted` only an old one, `edited` and `array`
/// both. Serialized with an `action` tag and camelCase field names.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum ChangeRecord {
    /// A property that did not exist before.
    #[serde(rename_all = "camelCase")]
    Created {
        property_path: PropertyPath,
        new_value: Value,
    },
    /// A scalar property whose value changed.
    #[serde(rename_all = "camelCase")]
    Edited {
        property_path: PropertyPath,
        old_value: Value,
        new_value: Value,
    },
    /// A property that no longer exists.
    #[serde(rename_all = "camelCase")]
    Deleted {
        property_path: PropertyPath,
        old_value: Value,
    },
    /// A sequence property whose elements changed.
    #[serde(rename_all = "camelCase")]
    Array {
        property_path: PropertyPath,
        old_value: Value,
        new_value: Value,
        array_changes: Vec<ArrayChange>,
    },
}

impl ChangeRecord {
    pub fn created(property_path: PropertyPath, new_value: Value) -> Self {
        Self::Created {
            property_path,
            new_value,
        }
    }

    pub fn edited(property_path: PropertyPath, old_value: Value, new_value: Value) -> Self {
        Self::Edited {
            property_path,
            old_value,
            new_value,
        }
    }

    pub fn deleted(property_path: PropertyPath, old_value: Value) -> Self {
        Self::Deleted {
            property_path,
            old_value,
        }
    }

    /// Build an array record, reconciling the two sequences.
    pub fn array(property_path: PropertyPath, old: &[Value], new: &[Value]) -> Self {
        Self::Array {
            property_path,
            array_changes: reconcile(old, new),
            old_value: Value::Array(old.to_vec()),
            new_value: Value::Array(new.to_vec()),
        }
    }

    pub fn action(&self) -> Action {
        match self {
            Self::Created { .. } => Action::Created,
            Self::Edited { .. } => Action::Edited,
            Self::Deleted { .. } => Action::Deleted,
            Self::Array { .. } => Action::Array,
        }
    }

    pub fn property_path(&self) -> &PropertyPath {
        match self {
            Self::Created { property_path, .. }
            | Self::Edited { property_path, .. }
            | Self::Deleted { property_path, .. }
            | Self::Array { property_path, .. } => property_path,
        }
    }

    /// The value before the change; absent for `created`.
    pub fn old_value(&self) -> Option<&Value> {
        match self {
            Self::Created { .. } => None,
            Self::Edited { old_value, .. }
            | Self::Deleted { old_value, .. }
            | Self::Array { old_value, .. } => Some(old_value),
        }
    }

    /// The value after the change; absent for `deleted`.
    pub fn new_value(&self) -> Option<&Value> {
        match self {
            Self::Deleted { .. } => None,
            Self::Created { new_value, .. }
            | Self::Edited { new_value, .. }
            | Self::Array { new_value, .. } => Some(new_value),
        }
    }

    /// Element-level changes; present only for `array`.
    pub fn array_changes(&self) -> Option<&[ArrayChange]> {
        match self {
            Self::Array { array_changes, .. } => Some(array_changes),
            _ => None,
        }
    }
}

/// A single element-level change inside an array.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum ArrayChange {
    /// Present in the new sequence with no counterpart in the old one.
    Added { index: usize, value: Value },
    /// Present in the old sequence with no counterpart surviving into the new one.
    Removed { index: usize, value: Value },
    /// The same value persists at a different position.
    #[serde(rename_all = "camelCase")]
    Moved {
        old_index: usize,
        new_index: usize,
        value: Value,
    },
}

impl ArrayChange {
    pub fn value(&self) -> &Value {
        match self {
            Self::Added { value, .. } | Self::Removed { value, .. } | Self::Moved { value, .. } => {
                value
            }
        }
    }

    pub fn is_added(&self) -> bool {
        matches!(self, Self::Added { .. })
    }

    pub fn is_removed(&self) -> bool {
        matches!(self, Self::Removed { .. })
    }

    pub fn is_moved(&self) -> bool {
        matches!(self, Self::Moved { .. })
    }
}

/// An ordered list of change records, in discovery order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangeSet {
    /// The recorded changes.
    pub changes: Vec<ChangeRecord>,
}

impl ChangeSet {
    /// Create an empty change set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if there are no changes.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Number of changes.
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ChangeRecord> {
        self.changes.iter()
    }

    /// Number of `created` records.
    pub fn created(&self) -> usize {
        self.count(Action::Created)
    }

    /// Number of `edited` records.
    pub fn edited(&self) -> usize {
        self.count(Action::Edited)
    }

    /// Number of `deleted` records.
    pub fn deleted(&self) -> usize {
        self.count(Action::Deleted)
    }

    /// Number of `array` records.
    pub fn arrays(&self) -> usize {
        self.count(Action::Array)
    }

    fn count(&self, action: Action) -> usize {
        self.changes.iter().filter(|c| c.action() == action).count()
    }
}

impl From<Vec<ChangeRecord>> for ChangeSet {
    fn from(changes: Vec<ChangeRecord>) -> Self {
        Self { changes }
    }
}

impl IntoIterator for ChangeSet {
    type Item = ChangeRecord;
    type IntoIter = std::vec::IntoIter<ChangeRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.into_iter()
    }
}

impl<'a> IntoIterator for &'a ChangeSet {
    type Item = &'a ChangeRecord;
    type IntoIter = std::slice::Iter<'a, ChangeRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.iter()
    }
}
