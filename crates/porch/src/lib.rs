//! Revdeck porch: turn Porch `PackageRevision` / `PackageRevisionResources` objects
//! into newest-first `RevisionSummary` lists, from a YAML dump or a live cluster.

#![forbid(unsafe_code)]

pub mod cluster;
pub mod file;
pub mod package;

use chrono::{DateTime, Utc};
use revdeck_core::{CoreError, Lifecycle, RevisionMeta, RevisionSummary};
use serde_json::Value as Json;

pub use cluster::load_revisions_from_cluster;
pub use file::load_revisions_from_yaml;
pub use package::{resources_from_files, resources_from_files_with};

pub const PORCH_GROUP: &str = "porch.kpt.dev";
pub const PORCH_VERSION: &str = "v1alpha1";

#[derive(Debug, thiserror::Error)]
pub enum PorchError {
    #[error("yaml: {file}: {source}")]
    Yaml { file: String, #[source] source: serde_yaml::Error },
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid_resource: {file}#{index}: {reason}")]
    InvalidResource { file: String, index: usize, reason: String },
    #[error("too_large: {file} exceeds {max} bytes")]
    TooLarge { file: String, max: usize },
    #[error("too_complex: {file} exceeds {max} nodes")]
    TooComplex { file: String, max: usize },
    #[error("missing_field: {0}")]
    MissingField(String),
    #[error("lifecycle: {0}")]
    Lifecycle(#[from] CoreError),
    #[error("not_found: revision {0}")]
    NotFound(String),
    #[error("ambiguous: revision label {label} matches {names}")]
    Ambiguous { label: String, names: String },
    #[error("kube: {0}")]
    Kube(#[from] kube::Error),
}

pub type PorchResult<T> = Result<T, PorchError>;

/// 1 MiB.
pub const DEFAULT_MAX_YAML_BYTES: usize = 1 << 20;
pub const DEFAULT_MAX_YAML_NODES: usize = 100_000;

/// Per-file size cap for package resources (`REVDECK_MAX_YAML_BYTES`).
pub fn max_yaml_bytes() -> usize {
    std::env::var("REVDECK_MAX_YAML_BYTES")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(DEFAULT_MAX_YAML_BYTES)
}

/// Per-document node cap (`REVDECK_MAX_YAML_NODES`).
pub fn max_yaml_nodes() -> usize {
    std::env::var("REVDECK_MAX_YAML_NODES")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(DEFAULT_MAX_YAML_NODES)
}

/// Caps applied while parsing package files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YamlLimits {
    /// Per-file size in bytes.
    pub max_bytes: usize,
    /// Per-document node count.
    pub max_nodes: usize,
}

impl Default for YamlLimits {
    fn default() -> Self { Self { max_bytes: DEFAULT_MAX_YAML_BYTES, max_nodes: DEFAULT_MAX_YAML_NODES } }
}

impl YamlLimits {
    pub fn from_env() -> Self { Self { max_bytes: max_yaml_bytes(), max_nodes: max_yaml_nodes() } }
}

/// Look a revision up by object name, then by revision label.
///
/// A label shared by several revisions (e.g. `v1` of two packages) is refused.
pub fn find_revision<'a>(revisions: &'a [RevisionSummary], key: &str) -> PorchResult<&'a RevisionSummary> {
    if let Some(r) = revisions.iter().find(|r| r.revision.name == key) {
        return Ok(r);
    }
    let hits: Vec<&RevisionSummary> =
        revisions.iter().filter(|r| r.revision.revision.as_deref() == Some(key)).collect();
    match hits.as_slice() {
        [] => Err(PorchError::NotFound(key.to_string())),
        [one] => Ok(*one),
        many => Err(PorchError::Ambiguous {
            label: key.to_string(),
            names: many.iter().map(|r| r.revision.name.as_str()).collect::<Vec<_>>().join(", "),
        }),
    }
}

/// Sort newest first by creation time; undated revisions last, ties by name descending.
pub fn sort_newest_first(revisions: &mut [RevisionSummary]) {
    revisions.sort_by(|a, b| {
        let (ma, mb) = (&a.revision, &b.revision);
        match (ma.created, mb.created) {
            (Some(x), Some(y)) => y.cmp(&x),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        }
        .then_with(|| mb.name.cmp(&ma.name))
    });
}

fn str_at<'a>(v: &'a Json, path: &[&str]) -> Option<&'a str> {
    path.iter().try_fold(v, |cur, key| cur.get(key))?.as_str()
}

/// Read revision metadata from a `PackageRevision` object.
///
/// `spec.revision` may be a string (`v3`) or, on newer Porch, an integer where
/// drafts carry `0` or a negative value.
pub fn revision_meta_from_json(obj: &Json) -> PorchResult<RevisionMeta> {
    let name = str_at(obj, &["metadata", "name"]).ok_or_else(|| PorchError::MissingField("metadata.name".into()))?;
    let package_name = str_at(obj, &["spec", "packageName"])
        .ok_or_else(|| PorchError::MissingField(format!("{}: spec.packageName", name)))?;
    let revision = match obj.get("spec").and_then(|s| s.get("revision")) {
        Some(Json::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Json::Number(n)) => n.as_i64().filter(|n| *n > 0).map(|n| format!("v{}", n)),
        _ => None,
    };
    let lifecycle = match str_at(obj, &["spec", "lifecycle"]) {
        Some(s) => s.parse::<Lifecycle>()?,
        None => Lifecycle::Draft,
    };
    let created = str_at(obj, &["metadata", "creationTimestamp"])
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc));
    Ok(RevisionMeta {
        name: name.to_string(),
        package_name: package_name.to_string(),
        repository: str_at(obj, &["spec", "repository"]).unwrap_or("").to_string(),
        revision,
        workspace_name: str_at(obj, &["spec", "workspaceName"]).map(|s| s.to_string()),
        lifecycle,
        created,
    })
}

/// Read the `spec.resources` file map of a `PackageRevisionResources` object.
pub fn resource_files_from_json(obj: &Json) -> std::collections::BTreeMap<String, String> {
    obj.get("spec")
        .and_then(|s| s.get("resources"))
        .and_then(|r| r.as_object())
        .map(|files| {
            files.iter().filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string()))).collect()
        })
        .unwrap_or_default()
}
