//! Load revisions from a YAML dump such as
//! `kubectl get packagerevisions,packagerevisionresources -o yaml`.

#![forbid(unsafe_code)]

use std::collections::HashMap;

use revdeck_core::{ResourcesMap, RevisionSummary};
use serde::Deserialize;
use serde_json::Value as Json;
use tracing::{info, warn};

use crate::{resource_files_from_json, resources_from_files, revision_meta_from_json, sort_newest_first, PorchError, PorchResult};

fn kind_of(v: &Json) -> &str {
    v.get("kind").and_then(|k| k.as_str()).unwrap_or("")
}

/// `(metadata.namespace, metadata.name)`; a missing namespace is the empty string.
fn object_key(v: &Json) -> Option<(String, String)> {
    let meta = v.get("metadata")?;
    let name = meta.get("name")?.as_str()?;
    let namespace = meta.get("namespace").and_then(|n| n.as_str()).unwrap_or("");
    Some((namespace.to_string(), name.to_string()))
}

/// Flatten a multi-document dump; `kind: List` documents contribute their `items`.
fn objects_from_dump(text: &str) -> PorchResult<Vec<Json>> {
    let mut out = Vec::new();
    for doc in serde_yaml::Deserializer::from_str(text) {
        let val = serde_yaml::Value::deserialize(doc).map_err(|source| PorchError::Yaml { file: "<dump>".into(), source })?;
        if val.is_null() { continue; }
        let json = serde_json::to_value(val)?;
        if kind_of(&json).ends_with("List") {
            if let Some(Json::Array(items)) = json.get("items") {
                out.extend(items.iter().cloned());
            }
        } else {
            out.push(json);
        }
    }
    Ok(out)
}

/// Pair each `PackageRevision` with the `PackageRevisionResources` of the same namespace
/// and name, and return them newest-first. `package` filters on `spec.packageName`.
pub fn load_revisions_from_yaml(text: &str, package: Option<&str>) -> PorchResult<Vec<RevisionSummary>> {
    let objects = objects_from_dump(text)?;
    let mut resources_by_key: HashMap<(String, String), &Json> = HashMap::new();
    for obj in objects.iter().filter(|o| kind_of(o) == "PackageRevisionResources") {
        if let Some(key) = object_key(obj) {
            resources_by_key.insert(key, obj);
        }
    }

    let mut out = Vec::new();
    for obj in objects.iter().filter(|o| kind_of(o) == "PackageRevision") {
        let meta = revision_meta_from_json(obj)?;
        if package.is_some_and(|p| p != meta.package_name) {
            continue;
        }
        let resources = match object_key(obj).and_then(|key| resources_by_key.get(&key)) {
            Some(res) => resources_from_files(&resource_files_from_json(res))?,
            None => {
                warn!(revision = %meta.name, "no PackageRevisionResources for revision; treating as empty");
                ResourcesMap::new()
            }
        };
        out.push(RevisionSummary { revision: meta, resources });
    }
    sort_newest_first(&mut out);
    info!(revisions = out.len(), package = ?package, "revisions loaded from dump");
    Ok(out)
}
