//! Resource metadata editing as immutable value replacement.
//!
//! Every edit yields a fresh `ResourceMetadataView`; the editor hands that value to
//! its update callback and keeps it as the new current value. Nothing is mutated
//! through a shared reference.

#![forbid(unsafe_code)]

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json};

pub type KeyValues = BTreeMap<String, String>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceMetadataView {
    pub name: String,
    pub namespace: Option<String>,
    pub labels: Option<KeyValues>,
    pub annotations: Option<KeyValues>,
}

fn non_empty(map: KeyValues) -> Option<KeyValues> {
    if map.is_empty() { None } else { Some(map) }
}

fn string_pairs(v: Option<&Json>) -> Option<KeyValues> {
    let obj = v?.as_object()?;
    let map: KeyValues = obj
        .iter()
        .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
        .collect();
    non_empty(map)
}

fn pairs_to_json(map: &KeyValues) -> Json {
    Json::Object(map.iter().map(|(k, v)| (k.clone(), Json::String(v.clone()))).collect())
}

impl ResourceMetadataView {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Default::default() }
    }

    /// `namespace/name`, or just `name` for cluster-scoped values.
    pub fn description(&self) -> String {
        match self.namespace.as_deref() {
            Some(ns) => format!("{}/{}", ns, self.name),
            None => self.name.clone(),
        }
    }

    pub fn with_name(&self, name: impl Into<String>) -> Self {
        Self { name: name.into(), ..self.clone() }
    }

    /// An empty namespace clears it.
    pub fn with_namespace(&self, namespace: &str) -> Self {
        let namespace = if namespace.is_empty() { None } else { Some(namespace.to_string()) };
        Self { namespace, ..self.clone() }
    }

    /// An empty map clears the labels.
    pub fn with_labels(&self, labels: KeyValues) -> Self {
        Self { labels: non_empty(labels), ..self.clone() }
    }

    /// An empty map clears the annotations.
    pub fn with_annotations(&self, annotations: KeyValues) -> Self {
        Self { annotations: non_empty(annotations), ..self.clone() }
    }

    /// Read the view from a resource's `metadata`. Non-string label values are skipped.
    pub fn from_resource(resource: &Json) -> Self {
        let meta = resource.get("metadata");
        let get_str = |key: &str| meta.and_then(|m| m.get(key)).and_then(|v| v.as_str()).map(|s| s.to_string());
        Self {
            name: get_str("name").unwrap_or_default(),
            namespace: get_str("namespace").filter(|s| !s.is_empty()),
            labels: string_pairs(meta.and_then(|m| m.get("labels"))),
            annotations: string_pairs(meta.and_then(|m| m.get("annotations"))),
        }
    }

    /// Return a copy of `resource` with this view written into `metadata`.
    /// `None` fields are removed; other metadata keys are preserved.
    pub fn apply_to(&self, resource: &Json) -> Json {
        let mut out = match resource {
            Json::Object(obj) => obj.clone(),
            _ => Map::new(),
        };
        let mut meta = match out.remove("metadata") {
            Some(Json::Object(m)) => m,
            _ => Map::new(),
        };
        meta.insert("name".into(), Json::String(self.name.clone()));
        match &self.namespace {
            Some(ns) => { meta.insert("namespace".into(), Json::String(ns.clone())); }
            None => { meta.remove("namespace"); }
        }
        match &self.labels {
            Some(l) => { meta.insert("labels".into(), pairs_to_json(l)); }
            None => { meta.remove("labels"); }
        }
        match &self.annotations {
            Some(a) => { meta.insert("annotations".into(), pairs_to_json(a)); }
            None => { meta.remove("annotations"); }
        }
        out.insert("metadata".into(), Json::Object(meta));
        Json::Object(out)
    }
}

/// Holds the current metadata value and reports each replacement to `on_update`.
pub struct MetadataEditor<F: FnMut(ResourceMetadataView)> {
    value: ResourceMetadataView,
    cluster_scoped: bool,
    on_update: F,
}

impl<F: FnMut(ResourceMetadataView)> MetadataEditor<F> {
    pub fn new(value: ResourceMetadataView, cluster_scoped: bool, on_update: F) -> Self {
        Self { value, cluster_scoped, on_update }
    }

    pub fn value(&self) -> &ResourceMetadataView { &self.value }
    pub fn is_cluster_scoped(&self) -> bool { self.cluster_scoped }

    fn replace(&mut self, next: ResourceMetadataView) {
        self.value = next.clone();
        (self.on_update)(next);
    }

    pub fn set_name(&mut self, name: &str) {
        let next = self.value.with_name(name);
        self.replace(next);
    }

    /// Ignored for cluster-scoped resources.
    pub fn set_namespace(&mut self, namespace: &str) {
        if self.cluster_scoped { return; }
        let next = self.value.with_namespace(namespace);
        self.replace(next);
    }

    pub fn set_labels(&mut self, labels: KeyValues) {
        let next = self.value.with_labels(labels);
        self.replace(next);
    }

    pub fn set_annotations(&mut self, annotations: KeyValues) {
        let next = self.value.with_annotations(annotations);
        self.replace(next);
    }
}
