use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid entry id: {0}")]
    InvalidEntryId(String),

    #[error("value at {path:?} cannot be used as an object identity")]
    InvalidIdentity { path: String },
}
