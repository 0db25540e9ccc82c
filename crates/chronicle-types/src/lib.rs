//! Foundation types for Chronicle.
//!
//! This crate provides the value model, addressing, hashing and identity
//! types used throughout Chronicle. Every other Chronicle crate depends on
//! `chronicle-types`.
//!
//! # Key Types
//!
//! - [`Value`] / [`Map`] -- JSON-like value tree with insertion-ordered maps
//! - [`PropertyPath`] -- dot-delimited location inside a nested map
//! - [`ValueHash`] -- deep structural hash (BLAKE3) used for value equality
//! - [`Entity`] -- logical object type and where its identity lives
//! - [`Creator`] -- who produced a recorded version
//! - [`ObjectId`] -- identity of a tracked object
//! - [`EntryId`] -- UUID v7 storage identifier for snapshots and diffs

pub mod entity;
pub mod error;
pub mod hash;
pub mod id;
pub mod path;
pub mod value;

pub use entity::{Creator, Entity};
pub use error::TypeError;
pub use hash::{ValueHash, ValueHasher};
pub use id::{EntryId, ObjectId};
pub use path::PropertyPath;
pub use value::{lookup, Map, Value};
