//! Revdeck rows: project newest-first package revisions into revisions-table rows.

#![forbid(unsafe_code)]

pub mod cache;
pub mod format;

use std::time::Instant;

use metrics::{counter, histogram};
use revdeck_core::{DisplayRow, RevisionSummary};
use revdeck_diff::{diff, extract, summarize};
use tracing::debug;

pub use cache::RowCache;
pub use format::{DefaultFormatter, RevisionFormatter};

/// One row per revision, in input order.
///
/// `revisions` must be newest-first: each entry is diffed against the one after it,
/// and the last entry is the base revision.
pub fn project(
    revisions: &[RevisionSummary],
    current_revision_id: &str,
    formatter: &dyn RevisionFormatter,
) -> Vec<DisplayRow> {
    let started = Instant::now();
    let rows: Vec<DisplayRow> = revisions
        .iter()
        .enumerate()
        .map(|(i, summary)| project_row(summary, revisions.get(i + 1), current_revision_id, formatter))
        .collect();
    histogram!("revdeck_project_ms", started.elapsed().as_secs_f64() * 1000.0);
    counter!("revdeck_rows_projected_total", rows.len() as u64);
    debug!(rows = rows.len(), current = %current_revision_id, "revision rows projected");
    rows
}

fn project_row(
    summary: &RevisionSummary,
    previous: Option<&RevisionSummary>,
    current_revision_id: &str,
    formatter: &dyn RevisionFormatter,
) -> DisplayRow {
    let meta = &summary.revision;
    let own = extract(&summary.resources);
    let changes_summary = match previous {
        Some(prev) => summarize(&diff(&extract(&prev.resources), &own), true),
        None => summarize(&[], false),
    };
    DisplayRow {
        id: meta.name.clone(),
        name: meta.name.clone(),
        revision_label: formatter.revision_label(meta),
        package_name: meta.package_name.clone(),
        lifecycle: meta.lifecycle,
        resources_count: own.len(),
        changes_summary,
        created_label: formatter.created_label(meta.created),
        is_current_revision: meta.name == current_revision_id,
    }
}
