//! Deep diff: compare two maps recursively and emit path-addressed records.
//!
//! At each level the old map's keys are walked first, in insertion order,
//! producing `edited`, `deleted` and `array` records and recursing into maps
//! present on both sides (the nested level's records are spliced in place).
//! Then the new map's keys are walked, producing `created` records for keys
//! the old map lacks.
//!
//! A key whose value changes kind (scalar, map or sequence) is reported as
//! the deletion of the old shape's leaves plus the creation of the new
//! shape's leaves, never as an edit. Maps are never reported whole: a map
//! that appears or disappears yields one record per scalar or sequence leaf
//! beneath it. Unsupported values are skipped silently.

use chronicle_types::{Map, PropertyPath, Value, ValueHash};

use crate::change::{ChangeRecord, ChangeSet};
use crate::classify::{classify, ValueKind};
use crate::options::DiffOptions;

/// Compare two maps and return the changes from `old` to `new`.
pub fn compare(old: &Map, new: &Map, options: &DiffOptions) -> ChangeSet {
    let mut changes = Vec::new();
    diff_maps(old, new, &PropertyPath::root(), options, &mut changes);
    tracing::trace!(changes = changes.len(), "compared maps");
    ChangeSet { changes }
}

fn diff_maps(
    old: &Map,
    new: &Map,
    path: &PropertyPath,
    options: &DiffOptions,
    out: &mut Vec<ChangeRecord>,
) {
    // Removed, edited and nested keys.
    for (key, old_value) in old {
        let key_path = path.child(key);
        if options.is_ignored(&key_path) {
            continue;
        }

        match (old_value, new.get(key)) {
            (Value::Unsupported(_), _) => {}
            (Value::Object(old_map), Some(Value::Object(new_map))) => {
                diff_maps(old_map, new_map, &key_path, options, out);
            }
            (Value::Array(old_items), Some(new_value @ Value::Array(new_items))) => {
                if ValueHash::of(old_value) != ValueHash::of(new_value) {
                    out.push(ChangeRecord::array(key_path, old_items, new_items));
                }
            }
            (_, Some(new_value))
                if classify(old_value) == ValueKind::Scalar
                    && classify(new_value) == ValueKind::Scalar =>
            {
                if ValueHash::of(old_value) != ValueHash::of(new_value) {
                    out.push(ChangeRecord::edited(
                        key_path,
                        old_value.clone(),
                        new_value.clone(),
                    ));
                }
            }
            // Absent on the new side, or present with a different kind.
            _ => emit_deleted(old_value, key_path, options, out),
        }
    }

    // Created keys, including keys whose kind changed.
    for (key, new_value) in new {
        let key_path = path.child(key);
        if options.is_ignored(&key_path) {
            continue;
        }
        let same_kind = old
            .get(key)
            .is_some_and(|old_value| classify(old_value) == classify(new_value));
        if !same_kind {
            emit_created(new_value, key_path, options, out);
        }
    }
}

/// Emit a `deleted` record for every leaf under `value`.
fn emit_deleted(
    value: &Value,
    path: PropertyPath,
    options: &DiffOptions,
    out: &mut Vec<ChangeRecord>,
) {
    walk_leaves(value, path, options, &mut |leaf_path, leaf| {
        out.push(ChangeRecord::deleted(leaf_path, leaf.clone()));
    });
}

/// Emit a `created` record for every leaf under `value`.
fn emit_created(
    value: &Value,
    path: PropertyPath,
    options: &DiffOptions,
    out: &mut Vec<ChangeRecord>,
) {
    walk_leaves(value, path, options, &mut |leaf_path, leaf| {
        out.push(ChangeRecord::created(leaf_path, leaf.clone()));
    });
}

/// Visit every scalar or sequence leaf under `value`, depth-first in key
/// order. Maps are recursed into; unsupported values and ignored paths are
/// skipped. `path` itself is assumed not to be ignored.
fn walk_leaves<F>(value: &Value, path: PropertyPath, options: &DiffOptions, visit: &mut F)
where
    F: FnMut(PropertyPath, &Value),
{
    match classify(value) {
        ValueKind::Scalar | ValueKind::Sequence => visit(path, value),
        ValueKind::Map => {
            if let Value::Object(map) = value {
                for (key, child) in map {
                    let child_path = path.child(key);
                    if !options.is_ignored(&child_path) {
                        walk_leaves(child, child_path, options, visit);
                    }
                }
            }
        }
        ValueKind::Unsupported => {}
    }
}
