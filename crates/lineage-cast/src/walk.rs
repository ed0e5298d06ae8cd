//! The first-member chain walk.
//!
//! Walks the static shape of a real type through its embedded first members
//! and compares type identities step by step. The walk is structural: a
//! non-composable first member ends it, and counts as a match only when its
//! own type is the target.

use lineage_registry::{FirstMember, TypeShape};
use lineage_types::TypeKey;

/// Number of embedding steps from `shape` down to `target`.
pub fn distance(shape: &TypeShape, target: TypeKey) -> Option<usize> {
    let mut current = *shape;
    let mut steps = 0;
    loop {
        if current.key() == target {
            return Some(steps);
        }
        steps += 1;
        match current.first() {
            FirstMember::Embedded(parent) => current = parent(),
            FirstMember::Plain(key) if key == target => return Some(steps),
            FirstMember::Plain(_) | FirstMember::Empty => return None,
        }
    }
}

/// Returns `true` if a `shape` value starts with (or is) a `target` value.
pub fn embeds(shape: &TypeShape, target: TypeKey) -> bool {
    distance(shape, target).is_some()
}
