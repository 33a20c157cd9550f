//! Tool operations for the MCP client
//!
//! Listing tools (with tolerant result-shape handling and schema
//! normalization) and invoking them.

use serde_json::{Map, Value};
use tracing::debug;

use toolbridge_protocol::types::methods;
use toolbridge_protocol::{CallToolParams, Error, Result};

use crate::client::core::McpToolClient;
use crate::schema::ToolDescriptor;

/// The shapes a `tools/list` result arrives in.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolListShape {
    /// `{"tools": [...]}`
    Wrapped(Vec<Value>),
    /// `{"result": {"tools": [...]}}`
    DoubleWrapped(Vec<Value>),
    /// A non-empty object without either key, taken as one tool
    BareObject(Value),
    /// `[...]`
    BareList(Vec<Value>),
    /// Anything else
    Empty,
}

fn tools_array(value: Option<&Value>) -> Vec<Value> {
    match value {
        Some(Value::Array(items)) => items.clone(),
        _ => Vec::new(),
    }
}

impl ToolListShape {
    /// Classify a decoded `tools/list` result.
    pub fn classify(result: Value) -> Self {
        match result {
            Value::Object(obj) if obj.contains_key("tools") => {
                Self::Wrapped(tools_array(obj.get("tools")))
            }
            Value::Object(obj)
                if obj
                    .get("result")
                    .and_then(Value::as_object)
                    .is_some_and(|inner| inner.contains_key("tools")) =>
            {
                Self::DoubleWrapped(tools_array(
                    obj.get("result").and_then(|inner| inner.get("tools")),
                ))
            }
            Value::Object(obj) if !obj.is_empty() => Self::BareObject(Value::Object(obj)),
            Value::Array(items) => Self::BareList(items),
            _ => Self::Empty,
        }
    }

    /// Short name of the shape, for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Wrapped(_) => "wrapped",
            Self::DoubleWrapped(_) => "double_wrapped",
            Self::BareObject(_) => "bare_object",
            Self::BareList(_) => "bare_list",
            Self::Empty => "empty",
        }
    }

    /// The raw tool entries.
    pub fn into_tools(self) -> Vec<Value> {
        match self {
            Self::Wrapped(tools) | Self::DoubleWrapped(tools) | Self::BareList(tools) => tools,
            Self::BareObject(tool) => vec![tool],
            Self::Empty => Vec::new(),
        }
    }
}

impl McpToolClient {
    /// List the server's tools as raw JSON entries.
    ///
    /// # Errors
    ///
    /// Any failure is wrapped in [`Error::Discovery`].
    pub async fn discover_raw_tools(&self) -> Result<Vec<Value>> {
        self.ensure_session().await;

        let result = self
            .execute(methods::TOOLS_LIST, None)
            .await
            .map_err(Error::discovery)?;

        let shape = ToolListShape::classify(result);
        debug!(shape = shape.name(), "Classified tools/list result");
        Ok(shape.into_tools())
    }

    /// List the server's tools with normalized parameter schemas.
    ///
    /// Entries that are not JSON objects are skipped.
    ///
    /// # Errors
    ///
    /// Any failure is wrapped in [`Error::Discovery`].
    pub async fn discover_tools(&self) -> Result<Vec<ToolDescriptor>> {
        let raw = self.discover_raw_tools().await?;
        let tools: Vec<ToolDescriptor> = raw.iter().filter_map(ToolDescriptor::from_raw).collect();
        debug!(
            count = tools.len(),
            skipped = raw.len() - tools.len(),
            "Discovered MCP tools"
        );
        Ok(tools)
    }

    /// Invoke a tool and return its raw result.
    ///
    /// # Errors
    ///
    /// Any failure is wrapped in [`Error::Action`] naming the tool.
    pub async fn execute_action(&self, name: &str, arguments: Map<String, Value>) -> Result<Value> {
        self.ensure_session().await;

        let params = serde_json::to_value(CallToolParams {
            name: name.to_string(),
            arguments,
        })
        .map_err(|e| Error::action(name, e.into()))?;

        self.execute(methods::TOOLS_CALL, Some(params))
            .await
            .map_err(|e| Error::action(name, e))
    }
}
