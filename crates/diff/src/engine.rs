#![forbid(unsafe_code)]

use metrics::counter;
use revdeck_core::{DiffRecord, DiffStatus, ResourceIdentity, ResourceSnapshot, ResourcesMap};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::trace;

/// Classify every resource of `previous` and `current`.
///
/// Identities only in `current` are Added, only in `previous` Removed. Identities in both
/// are Updated when their parsed content differs structurally, else Unchanged.
/// Records for `current` come first in input order, then the Removed ones.
/// Identities must be unique within each side.
pub fn diff(previous: &[&ResourceSnapshot], current: &[&ResourceSnapshot]) -> Vec<DiffRecord> {
    let prev: FxHashMap<&ResourceIdentity, &ResourceSnapshot> =
        previous.iter().map(|s| (&s.identity, *s)).collect();
    let cur: FxHashSet<&ResourceIdentity> = current.iter().map(|s| &s.identity).collect();

    let mut out = Vec::with_capacity(current.len() + previous.len());
    for snap in current {
        let status = match prev.get(&snap.identity) {
            None => DiffStatus::Added,
            Some(old) if old.content != snap.content => DiffStatus::Updated,
            Some(_) => DiffStatus::Unchanged,
        };
        out.push(DiffRecord { identity: snap.identity.clone(), status });
    }
    for snap in previous {
        if !cur.contains(&snap.identity) {
            out.push(DiffRecord { identity: snap.identity.clone(), status: DiffStatus::Removed });
        }
    }
    trace!(previous = previous.len(), current = current.len(), records = out.len(), "resources diffed");
    counter!("revdeck_diff_records_total", out.len() as u64);
    out
}

/// Diff two keyed resource sets.
pub fn diff_maps(previous: &ResourcesMap, current: &ResourcesMap) -> Vec<DiffRecord> {
    diff(&crate::extract(previous), &crate::extract(current))
}
