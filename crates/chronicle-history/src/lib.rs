//! Entry history for Chronicle.
//!
//! Records successive versions of tracked objects. Each save diffs the new
//! version against the latest stored one and writes a snapshot, a diff, or
//! both, depending on the configured [`PersistenceMode`]. An unchanged
//! version writes nothing.
//!
//! ```
//! use chronicle_history::{Chronicle, HistoryConfig};
//! use chronicle_store::InMemoryHistoryStore;
//! use chronicle_types::{Creator, Entity, Value};
//!
//! let chronicle = Chronicle::new(
//!     Entity::new("Order", "id"),
//!     HistoryConfig::default(),
//!     InMemoryHistoryStore::new(),
//! );
//! let order = Value::from(serde_json::json!({"id": 1, "total": 10}))
//!     .into_object()
//!     .unwrap();
//! let outcome = chronicle
//!     .save_entry(order, Creator::new("alice", "shop"), None)
//!     .unwrap();
//! assert_eq!(outcome.diff().unwrap().changes.created(), 2);
//! ```

pub mod chronicle;
pub mod config;
pub mod error;
pub mod service;

pub use chronicle::Chronicle;
pub use config::{HistoryConfig, PersistenceMode};
pub use error::{HistoryError, HistoryResult};
pub use service::{EntryService, SaveOutcome};

// Re-export key types
pub use chronicle_diff::{ChangeRecord, ChangeSet, DiffOptions};
pub use chronicle_store::{Diff, DiffQuery, HistoryStore, InMemoryHistoryStore, Snapshot};
pub use chronicle_types::{Creator, Entity, EntryId, Map, ObjectId, Value};
