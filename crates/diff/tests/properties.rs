#![forbid(unsafe_code)]

use revdeck_core::{DiffStatus, ResourceIdentity, ResourceSnapshot, ResourcesMap};
use revdeck_diff::{diff, diff_maps, extract, summarize};
use serde_json::json;

fn res(kind: &str, name: &str, content: serde_json::Value) -> ResourceSnapshot {
    ResourceSnapshot {
        identity: ResourceIdentity::new(kind, Some("ns"), name),
        filename: "pkg.yaml".into(),
        index: 0,
        yaml: String::new(),
        content,
    }
}

fn map(items: Vec<ResourceSnapshot>) -> ResourcesMap {
    items.into_iter().map(|s| (s.identity.clone(), s)).collect()
}

#[test]
fn disjoint_sets_are_all_added_or_removed() {
    let prev = map(vec![res("ConfigMap", "a", json!(1)), res("Service", "b", json!(2))]);
    let cur = map(vec![res("ConfigMap", "c", json!(1)), res("Secret", "d", json!(2)), res("Secret", "e", json!(3))]);
    let records = diff_maps(&prev, &cur);
    let added = records.iter().filter(|r| r.status == DiffStatus::Added).count();
    let removed = records.iter().filter(|r| r.status == DiffStatus::Removed).count();
    assert_eq!(added, cur.len());
    assert_eq!(removed, prev.len());
    assert_eq!(records.len(), added + removed);
    assert_eq!(summarize(&records, true), "3 Added, 2 Removed");
}

#[test]
fn identical_sets_are_unchanged() {
    let items = vec![
        res("ConfigMap", "a", json!({"data": {"k": "v"}})),
        res("Deployment", "web", json!({"spec": {"replicas": 3}})),
    ];
    let prev = map(items.clone());
    let cur = map(items);
    let records = diff_maps(&prev, &cur);
    assert!(records.iter().all(|r| r.status == DiffStatus::Unchanged));
    assert_eq!(records.len(), 2);
    assert_eq!(summarize(&records, true), "no changes");
}

#[test]
fn mixed_change_scenario() {
    let prev = map(vec![res("ConfigMap", "A", json!({"v": 1})), res("ConfigMap", "B", json!({"v": 1}))]);
    let cur = map(vec![res("ConfigMap", "B", json!({"v": 2})), res("ConfigMap", "C", json!({"v": 1}))]);
    let records = diff(&extract(&prev), &extract(&cur));
    let status = |n: &str| records.iter().find(|r| r.identity.name == n).map(|r| r.status);
    assert_eq!(status("A"), Some(DiffStatus::Removed));
    assert_eq!(status("B"), Some(DiffStatus::Updated));
    assert_eq!(status("C"), Some(DiffStatus::Added));
    assert_eq!(summarize(&records, true), "1 Added, 1 Updated, 1 Removed");
}

#[test]
fn extract_length_matches_key_count() {
    let m = map((0..17).map(|i| res("ConfigMap", &format!("cm-{}", i), json!(i))).collect());
    assert_eq!(extract(&m).len(), 17);
}
