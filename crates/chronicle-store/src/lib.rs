//! Snapshot and diff storage for Chronicle.
//!
//! Chronicle records two kinds of entries per tracked object: full
//! snapshots of its value, and diffs (change sets) between consecutive
//! versions. This crate defines those records, the query shape used to look
//! diffs up, and the [`HistoryStore`] trait every storage backend
//! implements.
//!
//! # Records
//!
//! - [`Snapshot`] -- a full version of an object at a point in time
//! - [`Diff`] -- the change set from the previous version, linked to a snapshot
//! - [`DiffQuery`] / [`TimeRange`] -- filter for diff lookups
//!
//! # Storage Backends
//!
//! - [`InMemoryHistoryStore`] -- `RwLock`-guarded store for tests and embedding
//!
//! # Design Rules
//!
//! 1. Storage assigns [`EntryId`](chronicle_types::EntryId)s; callers never do.
//! 2. Snapshots are keyed for upsert by entity name and object identity.
//! 3. Lookups are scoped to one entity.
//! 4. Backend errors are propagated as [`StoreError`], never swallowed.

pub mod error;
pub mod memory;
pub mod query;
pub mod record;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use memory::InMemoryHistoryStore;
pub use query::{DiffQuery, TimeRange};
pub use record::{Diff, Snapshot};
pub use traits::HistoryStore;
