#![forbid(unsafe_code)]

use std::fmt;

use revdeck_core::{DiffRecord, DiffStatus};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeCounts {
    pub added: usize,
    pub updated: usize,
    pub removed: usize,
    pub unchanged: usize,
}

impl ChangeCounts {
    pub fn from_records(records: &[DiffRecord]) -> Self {
        let mut c = ChangeCounts::default();
        for r in records {
            match r.status {
                DiffStatus::Added => c.added += 1,
                DiffStatus::Updated => c.updated += 1,
                DiffStatus::Removed => c.removed += 1,
                DiffStatus::Unchanged => c.unchanged += 1,
            }
        }
        c
    }

    pub fn has_changes(&self) -> bool { self.added + self.updated + self.removed > 0 }
}

/// Text of the "Changes Summary" column. Other consumers match these strings exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangesSummary {
    /// Oldest revision; nothing to compare against.
    Base,
    Changes(ChangeCounts),
}

impl fmt::Display for ChangesSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts = match self {
            ChangesSummary::Base => return f.write_str("Base revision"),
            ChangesSummary::Changes(c) => c,
        };
        if !counts.has_changes() {
            return f.write_str("no changes");
        }
        let clauses = [(counts.added, "Added"), (counts.updated, "Updated"), (counts.removed, "Removed")];
        let mut first = true;
        for (n, label) in clauses.iter().filter(|(n, _)| *n > 0) {
            if !first { f.write_str(", ")?; }
            write!(f, "{} {}", n, label)?;
            first = false;
        }
        Ok(())
    }
}

/// Summarize diff records. Without a predecessor the records are ignored.
pub fn summarize(records: &[DiffRecord], has_previous: bool) -> String {
    let summary = if has_previous {
        ChangesSummary::Changes(ChangeCounts::from_records(records))
    } else {
        ChangesSummary::Base
    };
    summary.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use revdeck_core::ResourceIdentity;

    fn rec(name: &str, status: DiffStatus) -> DiffRecord {
        DiffRecord { identity: ResourceIdentity::new("Deployment", Some("default"), name), status }
    }

    #[test]
    fn base_revision_ignores_records() {
        assert_eq!(summarize(&[], false), "Base revision");
        assert_eq!(summarize(&[rec("a", DiffStatus::Added)], false), "Base revision");
    }

    #[test]
    fn no_changes_when_only_unchanged() {
        assert_eq!(summarize(&[], true), "no changes");
        assert_eq!(summarize(&[rec("a", DiffStatus::Unchanged)], true), "no changes");
    }

    #[test]
    fn clauses_follow_fixed_order_and_skip_zero() {
        let records = vec![
            rec("a", DiffStatus::Removed),
            rec("b", DiffStatus::Added),
            rec("c", DiffStatus::Added),
            rec("d", DiffStatus::Unchanged),
        ];
        assert_eq!(summarize(&records, true), "2 Added, 1 Removed");
        assert_eq!(summarize(&[rec("x", DiffStatus::Updated)], true), "1 Updated");
    }

    #[test]
    fn counts_every_status() {
        let c = ChangeCounts::from_records(&[
            rec("a", DiffStatus::Added),
            rec("b", DiffStatus::Updated),
            rec("c", DiffStatus::Removed),
            rec("d", DiffStatus::Unchanged),
        ]);
        assert_eq!(c, ChangeCounts { added: 1, updated: 1, removed: 1, unchanged: 1 });
        assert_eq!(ChangesSummary::Changes(c).to_string(), "1 Added, 1 Updated, 1 Removed");
    }
}
