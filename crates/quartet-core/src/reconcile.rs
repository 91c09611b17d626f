//! Key-set reconciliation.
//!
//! Both upload and promotion reduce to the same question: given the keys a
//! destination already holds and the keys that should exist there, which keys
//! must be written, which can be skipped, and which exist only remotely.
//!
//! Presence is decided by key alone. Content is never compared, so an object
//! with different bytes at the same key counts as already present.

use std::collections::BTreeSet;

use serde::Serialize;

/// Result of diffing a desired key set against an observed one.
///
/// Every list is sorted ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KeyDiff {
    /// Desired keys to write.
    pub to_write: Vec<String>,
    /// Desired keys already present and left alone.
    pub to_skip: Vec<String>,
    /// Present keys not in the desired set. Reported, never deleted.
    pub orphaned: Vec<String>,
}

/// Diff `desired` against `present`.
///
/// With `overwrite`, every desired key is written and nothing is skipped.
pub fn reconcile_key_sets(
    present: &BTreeSet<String>,
    desired: &BTreeSet<String>,
    overwrite: bool,
) -> KeyDiff {
    let (to_write, to_skip): (Vec<String>, Vec<String>) = if overwrite {
        (desired.iter().cloned().collect(), Vec::new())
    } else {
        desired
            .iter()
            .cloned()
            .partition(|k| !present.contains(k))
    };

    KeyDiff {
        to_write,
        to_skip,
        orphaned: present.difference(desired).cloned().collect(),
    }
}
