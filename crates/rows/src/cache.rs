//! Memoized projection for interactive callers that re-render often.

#![forbid(unsafe_code)]

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use metrics::counter;
use revdeck_core::{DisplayRow, RevisionSummary};
use tracing::trace;

use crate::{project, RevisionFormatter};

struct Entry {
    revisions: Arc<[RevisionSummary]>,
    current: String,
    rows: Arc<Vec<DisplayRow>>,
}

/// Holds the last projection keyed by (revision list identity, current revision id).
///
/// A list is the same list only when it is the same `Arc`; equal contents in a new
/// allocation recompute. Readers never block.
pub struct RowCache {
    last: ArcSwapOption<Entry>,
}

impl Default for RowCache {
    fn default() -> Self { Self::new() }
}

impl RowCache {
    pub fn new() -> Self { Self { last: ArcSwapOption::empty() } }

    pub fn rows(
        &self,
        revisions: &Arc<[RevisionSummary]>,
        current_revision_id: &str,
        formatter: &dyn RevisionFormatter,
    ) -> Arc<Vec<DisplayRow>> {
        if let Some(entry) = self.last.load_full() {
            if Arc::ptr_eq(&entry.revisions, revisions) && entry.current == current_revision_id {
                counter!("revdeck_row_cache_hits_total", 1u64);
                return Arc::clone(&entry.rows);
            }
        }
        trace!(revisions = revisions.len(), "row cache miss");
        let rows = Arc::new(project(revisions, current_revision_id, formatter));
        self.last.store(Some(Arc::new(Entry {
            revisions: Arc::clone(revisions),
            current: current_revision_id.to_string(),
            rows: Arc::clone(&rows),
        })));
        rows
    }

    pub fn invalidate(&self) { self.last.store(None); }
}
