use std::fmt;

use serde::{Deserialize, Serialize};

use crate::path::PropertyPath;

/// A logical object type, and where each object's identity lives.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub name: String,
    pub id_path: PropertyPath,
}

impl Entity {
    pub fn new(name: impl Into<String>, id_path: impl Into<PropertyPath>) -> Self {
        Self {
            name: name.into(),
            id_path: id_path.into(),
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.id_path)
    }
}

/// Who produced a recorded version: a user acting through a source
/// application.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Creator {
    pub user: String,
    pub source: String,
}

impl Creator {
    pub fn new(user: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            source: source.into(),
        }
    }
}
