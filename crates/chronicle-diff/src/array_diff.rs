//! Array reconciliation by value rather than by position.
//!
//! Every old element is matched against the new sequence through its deep
//! structural hash. A matched element either stayed at its index (nothing is
//! emitted) or moved; an unmatched one was removed. New elements that no old
//! element claimed were added. Duplicate values are paired first-in,
//! first-out: each later occurrence in the old sequence only searches past
//! the position claimed by the previous one.

use std::collections::HashMap;

use chronicle_types::{Value, ValueHash};

use crate::change::ArrayChange;

/// Compute the element-level changes between two sequences.
///
/// Output order: `removed` and `moved` records in old-index order, then
/// `added` records in new-index order.
pub fn reconcile(old: &[Value], new: &[Value]) -> Vec<ArrayChange> {
    let new_hashes: Vec<ValueHash> = new.iter().map(ValueHash::of).collect();
    // Positions in `new` already claimed, per hash, in ascending order.
    let mut claimed: HashMap<ValueHash, Vec<usize>> = HashMap::new();
    let mut changes = Vec::new();

    for (old_index, value) in old.iter().enumerate() {
        let hash = ValueHash::of(value);
        let start = claimed
            .get(&hash)
            .and_then(|positions| positions.last())
            .map_or(0, |last| last + 1);

        match position_from(&new_hashes, &hash, start) {
            Some(new_index) => {
                claimed.entry(hash).or_default().push(new_index);
                if new_index != old_index {
                    changes.push(ArrayChange::Moved {
                        old_index,
                        new_index,
                        value: value.clone(),
                    });
                }
            }
            None => changes.push(ArrayChange::Removed {
                index: old_index,
                value: value.clone(),
            }),
        }
    }

    for (new_index, (value, hash)) in new.iter().zip(&new_hashes).enumerate() {
        let is_claimed = claimed
            .get(hash)
            .is_some_and(|positions| positions.contains(&new_index));
        if !is_claimed {
            changes.push(ArrayChange::Added {
                index: new_index,
                value: value.clone(),
            });
        }
    }

    changes
}

fn position_from(hashes: &[ValueHash], target: &ValueHash, start: usize) -> Option<usize> {
    hashes
        .get(start..)?
        .iter()
        .position(|h| h == target)
        .map(|offset| start + offset)
}
