//! The capability contract agent frameworks program against.

use async_trait::async_trait;
use serde_json::{Map, Value};

use toolbridge_protocol::Result;

use crate::client::McpToolClient;
use crate::config::ConfigField;
use crate::schema::ToolDescriptor;

/// A source of callable actions.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Run the named action with its arguments.
    async fn execute_action(&self, name: &str, arguments: Map<String, Value>) -> Result<Value>;

    /// Describe every action with normalized parameters.
    async fn get_actions_metadata(&self) -> Result<Vec<ToolDescriptor>>;

    /// Describe the configuration this tool accepts.
    fn get_config_requirements(&self) -> Vec<ConfigField>;
}

#[async_trait]
impl Tool for McpToolClient {
    async fn execute_action(&self, name: &str, arguments: Map<String, Value>) -> Result<Value> {
        McpToolClient::execute_action(self, name, arguments).await
    }

    async fn get_actions_metadata(&self) -> Result<Vec<ToolDescriptor>> {
        self.discover_tools().await
    }

    fn get_config_requirements(&self) -> Vec<ConfigField> {
        McpToolClient::config_requirements()
    }
}
