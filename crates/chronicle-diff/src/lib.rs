//! Structural diff engine for Chronicle.
//!
//! Compares two JSON-like object graphs and produces a typed, path-addressed
//! change set. Arrays are reconciled by value rather than by index, so an
//! element that shifts position is reported as moved instead of as a
//! deletion plus an insertion.
//!
//! # Key Types
//!
//! - [`classify`] / [`ValueKind`] -- routes a value to scalar, map, sequence or unsupported handling
//! - [`reconcile`] / [`ArrayChange`] -- value-hash array reconciliation (added/removed/moved)
//! - [`compare`] / [`ChangeRecord`] / [`ChangeSet`] -- recursive map diff
//! - [`DiffOptions`] -- immutable per-call configuration (ignored paths)
//!
//! Every operation here is pure and total: nothing fails and nothing is
//! shared, so a single [`DiffOptions`] can be reused across threads.

pub mod array_diff;
pub mod change;
pub mod classify;
pub mod deep_diff;
pub mod options;

pub use array_diff::reconcile;
pub use change::{Action, ArrayChange, ChangeRecord, ChangeSet};
pub use classify::{classify, ValueKind};
pub use deep_diff::compare;
pub use options::DiffOptions;
