#![forbid(unsafe_code)]

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use revdeck_core::{Lifecycle, ResourceIdentity, ResourceSnapshot, ResourcesMap, RevisionMeta, RevisionSummary};
use revdeck_rows::{project, DefaultFormatter, RowCache};
use serde_json::json;

fn cm(name: &str, value: &str) -> ResourceSnapshot {
    ResourceSnapshot {
        identity: ResourceIdentity::new("ConfigMap", Some("default"), name),
        filename: format!("{}.yaml", name),
        index: 0,
        yaml: String::new(),
        content: json!({ "data": { "value": value } }),
    }
}

fn rev(name: &str, revision: &str, lifecycle: Lifecycle, day: u32, resources: Vec<ResourceSnapshot>) -> RevisionSummary {
    let resources: ResourcesMap = resources.into_iter().map(|s| (s.identity.clone(), s)).collect();
    RevisionSummary {
        revision: RevisionMeta {
            name: name.to_string(),
            package_name: "basens".to_string(),
            repository: "blueprints".to_string(),
            revision: Some(revision.to_string()),
            workspace_name: None,
            lifecycle,
            created: Some(Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap()),
        },
        resources,
    }
}

/// R3 (newest) .. R1 (oldest)
fn history() -> Vec<RevisionSummary> {
    vec![
        rev("r3", "v3", Lifecycle::Draft, 3, vec![cm("b", "2"), cm("c", "1"), cm("d", "1")]),
        rev("r2", "v2", Lifecycle::Published, 2, vec![cm("b", "2"), cm("c", "1")]),
        rev("r1", "v1", Lifecycle::Published, 1, vec![cm("a", "1"), cm("b", "1")]),
    ]
}

fn formatter() -> DefaultFormatter {
    DefaultFormatter::relative_at(Utc.with_ymd_and_hms(2024, 1, 4, 0, 0, 0).unwrap())
}

#[test]
fn rows_pair_each_revision_with_its_predecessor() {
    let rows = project(&history(), "r3", &formatter());
    assert_eq!(rows.len(), 3);
    let names: Vec<_> = rows.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["r3", "r2", "r1"]);

    assert_eq!(rows[2].changes_summary, "Base revision");
    // r1 {a, b:1} -> r2 {b:2, c}
    assert_eq!(rows[1].changes_summary, "1 Added, 1 Updated, 1 Removed");
    // r2 {b, c} -> r3 {b, c, d}
    assert_eq!(rows[0].changes_summary, "1 Added");
}

#[test]
fn resources_count_is_own_snapshot_count() {
    let rows = project(&history(), "r3", &formatter());
    let counts: Vec<_> = rows.iter().map(|r| r.resources_count).collect();
    assert_eq!(counts, [3, 2, 2]);
}

#[test]
fn only_current_revision_is_flagged() {
    let rows = project(&history(), "r2", &formatter());
    let flagged: Vec<_> = rows.iter().filter(|r| r.is_current_revision).map(|r| r.id.as_str()).collect();
    assert_eq!(flagged, ["r2"]);

    let none = project(&history(), "missing", &formatter());
    assert!(none.iter().all(|r| !r.is_current_revision));
}

#[test]
fn metadata_fields_are_copied_and_formatted() {
    let rows = project(&history(), "r3", &formatter());
    assert_eq!(rows[0].revision_label, "v3");
    assert_eq!(rows[0].lifecycle, Lifecycle::Draft);
    assert_eq!(rows[0].package_name, "basens");
    assert_eq!(rows[0].created_label, "1 day ago");
    assert_eq!(rows[2].created_label, "3 days ago");
}

#[test]
fn identical_neighbours_report_no_changes() {
    let revs = vec![
        rev("r2", "v2", Lifecycle::Published, 2, vec![cm("a", "1")]),
        rev("r1", "v1", Lifecycle::Published, 1, vec![cm("a", "1")]),
    ];
    let rows = project(&revs, "r2", &formatter());
    assert_eq!(rows[0].changes_summary, "no changes");
}

#[test]
fn projection_is_idempotent() {
    let revs = history();
    let f = formatter();
    assert_eq!(project(&revs, "r2", &f), project(&revs, "r2", &f));
    assert!(project(&[], "r2", &f).is_empty());
}

#[test]
fn cache_reuses_rows_for_same_list_and_current() {
    let cache = RowCache::new();
    let f = formatter();
    let revs: Arc<[RevisionSummary]> = history().into();

    let first = cache.rows(&revs, "r3", &f);
    let again = cache.rows(&revs, "r3", &f);
    assert!(Arc::ptr_eq(&first, &again));
    assert_eq!(*first, project(&revs, "r3", &f));

    let other_current = cache.rows(&revs, "r1", &f);
    assert!(!Arc::ptr_eq(&first, &other_current));
    assert!(other_current[2].is_current_revision);

    let copy: Arc<[RevisionSummary]> = history().into();
    let fresh = cache.rows(&copy, "r1", &f);
    assert!(!Arc::ptr_eq(&other_current, &fresh));
    assert_eq!(*other_current, *fresh);

    cache.invalidate();
    let after = cache.rows(&copy, "r1", &f);
    assert!(!Arc::ptr_eq(&fresh, &after));
}
