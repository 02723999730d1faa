//! Columns of the revisions table and the status cell badges.
//!
//! This module provides:
//! - Stable column kinds + specs (labels, widths)
//! - Text rendering of each non-status cell of a `DisplayRow`
//! - Badges for the status cell (current-revision marker, lifecycle)

#![forbid(unsafe_code)]

use smallvec::SmallVec;

use crate::{DisplayRow, Lifecycle};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    Status,
    Revision,
    Lifecycle,
    Resources,
    ChangesSummary,
    Created,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ColumnSpec {
    pub kind: ColumnKind,
    pub label: &'static str,
    pub width: f32,
}

fn col(kind: ColumnKind, label: &'static str, width: f32) -> ColumnSpec {
    ColumnSpec { kind, label, width }
}

/// Full column set of the revisions table, in display order.
pub fn revision_columns() -> Vec<ColumnSpec> {
    vec![
        col(ColumnKind::Status, "Status", 80.0),
        col(ColumnKind::Revision, "Revision", 120.0),
        col(ColumnKind::Lifecycle, "Lifecycle", 140.0),
        col(ColumnKind::Resources, "Resources", 90.0),
        col(ColumnKind::ChangesSummary, "Changes Summary", 260.0),
        col(ColumnKind::Created, "Created", 160.0),
    ]
}

/// Icon shown in the status cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusBadge {
    CurrentRevision,
    Lifecycle(Lifecycle),
}

impl StatusBadge {
    /// Tooltip text for the badge.
    pub fn title(&self) -> String {
        match self {
            StatusBadge::CurrentRevision => "Revision being viewed".to_string(),
            StatusBadge::Lifecycle(l) => format!("{} revision", l),
        }
    }
}

/// Badges for the status cell: the current marker first, then the lifecycle badge
/// for anything not yet published.
pub fn status_badges(row: &DisplayRow) -> SmallVec<[StatusBadge; 2]> {
    let mut out = SmallVec::new();
    if row.is_current_revision {
        out.push(StatusBadge::CurrentRevision);
    }
    if !row.lifecycle.is_published() {
        out.push(StatusBadge::Lifecycle(row.lifecycle));
    }
    out
}

impl DisplayRow {
    /// Render one cell as plain text. The status cell joins badge titles.
    pub fn cell(&self, kind: ColumnKind) -> String {
        match kind {
            ColumnKind::Status => {
                let titles: Vec<String> = status_badges(self).iter().map(|b| b.title()).collect();
                titles.join(", ")
            }
            ColumnKind::Revision => self.revision_label.clone(),
            ColumnKind::Lifecycle => self.lifecycle.to_string(),
            ColumnKind::Resources => self.resources_count.to_string(),
            ColumnKind::ChangesSummary => self.changes_summary.clone(),
            ColumnKind::Created => self.created_label.clone(),
        }
    }
}
