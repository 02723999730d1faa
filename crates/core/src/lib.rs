//! Revdeck core types: resource identities, package revisions, diff records and display rows.

#![forbid(unsafe_code)]

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod columns;
pub mod metadata;
pub mod param;

/// Errors raised by core helpers.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("unsupported_value_type: {0}")]
    UnsupportedValueType(String),
    #[error("invalid_lifecycle: {0}")]
    InvalidLifecycle(String),
}

pub type CoreResult<T> = Result<T, CoreError>;

/// Key of a resource inside a package revision.
///
/// Ordering is `kind`, then `namespace` (cluster-scoped first), then `name`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ResourceIdentity {
    pub kind: String,
    pub namespace: Option<String>,
    pub name: String,
}

impl ResourceIdentity {
    pub fn new(kind: impl Into<String>, namespace: Option<&str>, name: impl Into<String>) -> Self {
        Self { kind: kind.into(), namespace: namespace.map(|s| s.to_string()), name: name.into() }
    }
}

impl fmt::Display for ResourceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.kind, self.namespace.as_deref().unwrap_or(""), self.name)
    }
}

/// One parsed YAML document of a package revision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceSnapshot {
    pub identity: ResourceIdentity,
    /// Package file the document was read from.
    pub filename: String,
    /// Position of the document within `filename`.
    pub index: usize,
    /// Source text of the document.
    pub yaml: String,
    /// Parsed document; content comparisons use this, never `yaml`.
    pub content: serde_json::Value,
}

/// Keyed resource set of one revision.
pub type ResourcesMap = BTreeMap<ResourceIdentity, ResourceSnapshot>;

/// Publication state of a package revision, spelled as Porch spells it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Lifecycle {
    Draft,
    Proposed,
    Published,
    DeletionProposed,
}

impl Lifecycle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Lifecycle::Draft => "Draft",
            Lifecycle::Proposed => "Proposed",
            Lifecycle::Published => "Published",
            Lifecycle::DeletionProposed => "DeletionProposed",
        }
    }

    pub fn is_published(&self) -> bool { matches!(self, Lifecycle::Published) }
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for Lifecycle {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Draft" => Ok(Lifecycle::Draft),
            "Proposed" => Ok(Lifecycle::Proposed),
            "Published" => Ok(Lifecycle::Published),
            "DeletionProposed" => Ok(Lifecycle::DeletionProposed),
            other => Err(CoreError::InvalidLifecycle(other.to_string())),
        }
    }
}

/// Metadata of a package revision as supplied by the loader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevisionMeta {
    /// Object name; unique per revision and used as the revision id.
    pub name: String,
    pub package_name: String,
    pub repository: String,
    /// Published revision label (e.g. `v3`); drafts usually have none.
    pub revision: Option<String>,
    pub workspace_name: Option<String>,
    pub lifecycle: Lifecycle,
    pub created: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevisionSummary {
    pub revision: RevisionMeta,
    pub resources: ResourcesMap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiffStatus {
    Added,
    Updated,
    Removed,
    Unchanged,
}

impl DiffStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiffStatus::Added => "Added",
            DiffStatus::Updated => "Updated",
            DiffStatus::Removed => "Removed",
            DiffStatus::Unchanged => "Unchanged",
        }
    }
}

impl fmt::Display for DiffStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffRecord {
    pub identity: ResourceIdentity,
    pub status: DiffStatus,
}

/// One line of the revisions table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayRow {
    pub id: String,
    pub name: String,
    pub revision_label: String,
    pub package_name: String,
    pub lifecycle: Lifecycle,
    pub resources_count: usize,
    pub changes_summary: String,
    pub created_label: String,
    pub is_current_revision: bool,
}

pub mod prelude {
    pub use super::{
        DiffRecord, DiffStatus, DisplayRow, Lifecycle, ResourceIdentity, ResourceSnapshot, ResourcesMap, RevisionMeta,
        RevisionSummary,
    };
}
