//! Parametric editor value helpers.

#![forbid(unsafe_code)]

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

use crate::{CoreError, CoreResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    String,
    Number,
    Boolean,
    Object,
    Array,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ValueType::String => "string",
            ValueType::Number => "number",
            ValueType::Boolean => "boolean",
            ValueType::Object => "object",
            ValueType::Array => "array",
        };
        f.write_str(s)
    }
}

/// Initial value for a newly inserted entry of the given type.
pub fn default_value_for_type(value_type: ValueType) -> CoreResult<Json> {
    match value_type {
        ValueType::String => Ok(Json::String(String::new())),
        ValueType::Number => Ok(Json::from(0)),
        ValueType::Object => Ok(Json::Object(serde_json::Map::new())),
        ValueType::Array => Ok(Json::Array(Vec::new())),
        other => Err(CoreError::UnsupportedValueType(other.to_string())),
    }
}

/// Container kinds that can head a roster of entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RosterKind {
    Object,
    Array,
}

impl RosterKind {
    pub fn marker(&self) -> &'static str {
        match self {
            RosterKind::Array => "[]",
            RosterKind::Object => "{}",
        }
    }
}

impl From<RosterKind> for ValueType {
    fn from(k: RosterKind) -> Self {
        match k {
            RosterKind::Object => ValueType::Object,
            RosterKind::Array => ValueType::Array,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterHeader {
    pub name: String,
    pub kind: RosterKind,
}

impl fmt::Display for RosterHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.kind.marker())
    }
}
