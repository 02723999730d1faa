//! Package file map -> keyed resource set.

#![forbid(unsafe_code)]

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use revdeck_core::{ResourceIdentity, ResourceSnapshot, ResourcesMap};
use serde::Deserialize;
use serde_json::Value as Json;
use tracing::{debug, warn};

use crate::{PorchError, PorchResult, YamlLimits};

/// Files that hold KRM resources: `*.yaml`, `*.yml` and `Kptfile` in any directory.
pub fn is_resource_file(filename: &str) -> bool {
    let base = filename.rsplit('/').next().unwrap_or(filename);
    base == "Kptfile" || base.ends_with(".yaml") || base.ends_with(".yml")
}

fn json_node_budget_exceeded(v: &Json, max: usize) -> bool {
    fn walk(v: &Json, cur: &mut usize, max: usize) {
        if *cur >= max { return; }
        *cur += 1;
        match v {
            Json::Object(map) => {
                for vv in map.values() {
                    if *cur >= max { break; }
                    walk(vv, cur, max);
                }
            }
            Json::Array(arr) => {
                for vv in arr.iter() {
                    if *cur >= max { break; }
                    walk(vv, cur, max);
                }
            }
            _ => {}
        }
    }
    let mut count = 0usize;
    walk(v, &mut count, max);
    count >= max
}

fn identity_of(content: &Json, file: &str, index: usize) -> PorchResult<ResourceIdentity> {
    let invalid = |reason: &str| PorchError::InvalidResource { file: file.to_string(), index, reason: reason.to_string() };
    let kind = content.get("kind").and_then(|v| v.as_str()).ok_or_else(|| invalid("missing kind"))?;
    let meta = content.get("metadata");
    let name = meta.and_then(|m| m.get("name")).and_then(|v| v.as_str()).ok_or_else(|| invalid("missing metadata.name"))?;
    let namespace = meta.and_then(|m| m.get("namespace")).and_then(|v| v.as_str()).filter(|s| !s.is_empty());
    Ok(ResourceIdentity::new(kind, namespace, name))
}

/// Parse every resource document of a package with limits from the environment.
pub fn resources_from_files(files: &BTreeMap<String, String>) -> PorchResult<ResourcesMap> {
    resources_from_files_with(files, YamlLimits::from_env())
}

/// Parse every resource document of a package.
///
/// Non-resource files are ignored and empty documents skipped. When an identity repeats,
/// the first document wins. `ResourceSnapshot::yaml` holds the document re-rendered
/// from its parsed value.
pub fn resources_from_files_with(files: &BTreeMap<String, String>, limits: YamlLimits) -> PorchResult<ResourcesMap> {
    let mut out = ResourcesMap::new();
    for (file, text) in files.iter().filter(|(f, _)| is_resource_file(f)) {
        if text.len() > limits.max_bytes {
            return Err(PorchError::TooLarge { file: file.clone(), max: limits.max_bytes });
        }
        let yaml_err = |source| PorchError::Yaml { file: file.clone(), source };
        let mut index = 0usize;
        for doc in serde_yaml::Deserializer::from_str(text) {
            let val = serde_yaml::Value::deserialize(doc).map_err(yaml_err)?;
            if val.is_null() { continue; }
            let yaml = serde_yaml::to_string(&val).map_err(yaml_err)?;
            let content = serde_json::to_value(val)?;
            if json_node_budget_exceeded(&content, limits.max_nodes) {
                return Err(PorchError::TooComplex { file: file.clone(), max: limits.max_nodes });
            }
            let identity = identity_of(&content, file, index)?;
            match out.entry(identity) {
                Entry::Occupied(e) => {
                    warn!(identity = %e.key(), file = %file, index, "duplicate resource identity; keeping first");
                }
                Entry::Vacant(e) => {
                    let identity = e.key().clone();
                    e.insert(ResourceSnapshot { identity, filename: file.clone(), index, yaml, content });
                }
            }
            index += 1;
        }
    }
    debug!(files = files.len(), resources = out.len(), "package resources parsed");
    Ok(out)
}
