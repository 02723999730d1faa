//! Revdeck diff: snapshot extraction, per-resource diffing and change summaries.
//!
//! Everything here is pure; callers recompute on demand.

#![forbid(unsafe_code)]

pub mod engine;
pub mod summary;

use revdeck_core::{ResourceSnapshot, ResourcesMap};

pub use engine::{diff, diff_maps};
pub use summary::{summarize, ChangeCounts, ChangesSummary};

/// Snapshots of a revision's resources in key order.
pub fn extract(resources: &ResourcesMap) -> Vec<&ResourceSnapshot> {
    resources.values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use revdeck_core::ResourceIdentity;

    #[test]
    fn extract_yields_one_snapshot_per_key() {
        let mut m = ResourcesMap::new();
        assert!(extract(&m).is_empty());
        for name in ["b", "a", "c"] {
            let identity = ResourceIdentity::new("ConfigMap", None, name);
            m.insert(identity.clone(), ResourceSnapshot {
                identity,
                filename: "cm.yaml".into(),
                index: 0,
                yaml: String::new(),
                content: serde_json::json!({}),
            });
        }
        let names: Vec<_> = extract(&m).iter().map(|s| s.identity.name.as_str()).collect();
        assert_eq!(names, ["a", "b", "c"]);
    }
}
