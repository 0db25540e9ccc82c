use thiserror::Error;

use chronicle_types::{Entity, ObjectId};

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("cannot compare versions of different objects: {old} vs {new}")]
    IdentityMismatch { old: ObjectId, new: ObjectId },

    #[error("cannot compare versions of different entities: {old} vs {new}")]
    EntityMismatch { old: Entity, new: Entity },

    #[error("no usable object identity at {path:?}")]
    MissingIdentity { path: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("store error: {0}")]
    Store(#[from] chronicle_store::StoreError),
}

pub type HistoryResult<T> = Result<T, HistoryError>;
