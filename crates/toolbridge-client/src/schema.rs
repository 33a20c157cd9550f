//! Tool descriptors and input-schema normalization.
//!
//! Servers describe tool inputs in several shapes. Every descriptor leaving
//! this crate carries a [`NormalizedSchema`] with `type`, `properties` and
//! `required` always present, so consumers render tools without special cases.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Keys searched for a tool's input schema, first present non-null wins.
pub const SCHEMA_KEYS: &[&str] = &["inputSchema", "input_schema", "schema", "parameters"];

fn object_type() -> String {
    "object".to_string()
}

/// A JSON Schema object with guaranteed `properties` and `required` members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedSchema {
    /// Schema type, `object` unless the server said otherwise
    #[serde(rename = "type", default = "object_type")]
    pub schema_type: String,

    /// Property definitions
    #[serde(default)]
    pub properties: Map<String, Value>,

    /// Names of required properties
    #[serde(default)]
    pub required: Vec<String>,

    /// Carried over verbatim when the server supplied it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<Value>,

    /// Carried over verbatim when the server supplied it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Default for NormalizedSchema {
    fn default() -> Self {
        Self {
            schema_type: object_type(),
            properties: Map::new(),
            required: Vec::new(),
            additional_properties: None,
            description: None,
        }
    }
}

impl NormalizedSchema {
    /// Normalize one raw schema value.
    ///
    /// A value with `properties` (or a string `type`) is treated as a full
    /// schema; any other object is taken as a bare properties map. Non-object
    /// values yield the empty schema.
    pub fn from_raw(raw: &Value) -> Self {
        let Value::Object(obj) = raw else {
            return Self::default();
        };

        let is_full_schema =
            obj.contains_key("properties") || obj.get("type").is_some_and(Value::is_string);
        if !is_full_schema {
            return Self {
                properties: obj.clone(),
                ..Self::default()
            };
        }

        let properties = match obj.get("properties") {
            Some(Value::Object(props)) => props.clone(),
            _ => Map::new(),
        };
        let required = match obj.get("required") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        };

        Self {
            schema_type: obj
                .get("type")
                .and_then(Value::as_str)
                .map_or_else(object_type, str::to_string),
            properties,
            required,
            additional_properties: obj.get("additionalProperties").cloned(),
            description: obj
                .get("description")
                .and_then(Value::as_str)
                .map(str::to_string),
        }
    }

    /// Render as a JSON value.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|_| Value::Object(Map::new()))
    }
}

/// Find and normalize the input schema of a raw tool entry.
pub fn normalize_tool_schema(tool: &Map<String, Value>) -> NormalizedSchema {
    SCHEMA_KEYS
        .iter()
        .find_map(|key| tool.get(*key).filter(|v| !v.is_null()))
        .map(NormalizedSchema::from_raw)
        .unwrap_or_default()
}

/// A tool as exposed to callers: name, description and normalized parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    /// Tool name
    pub name: String,
    /// Tool description, empty when the server gave none
    #[serde(default)]
    pub description: String,
    /// Normalized input schema
    #[serde(default)]
    pub parameters: NormalizedSchema,
}

impl ToolDescriptor {
    /// Build a descriptor from a raw tool entry; `None` for non-object entries.
    pub fn from_raw(raw: &Value) -> Option<Self> {
        let tool = raw.as_object()?;
        let text = |key: &str| {
            tool.get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };

        Some(Self {
            name: text("name"),
            description: text("description"),
            parameters: normalize_tool_schema(tool),
        })
    }
}
