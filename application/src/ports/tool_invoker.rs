//! Tool invoker port
//!
//! The model runtime reaches tools only through this port; the protocol
//! client in the infrastructure layer is the production implementation.

use async_trait::async_trait;
use mapchat_domain::{ToolCall, ToolDefinition, ToolResult, ToolSpec};

/// Port for invoking tools on behalf of the model
#[async_trait]
pub trait ToolInvoker: Send + Sync {
    /// Tools advertised to the model
    fn tool_spec(&self) -> &ToolSpec;

    /// Check if a tool is available
    fn has_tool(&self, name: &str) -> bool {
        self.tool_spec().contains(name)
    }

    /// Get the definition of a specific tool
    fn get_tool(&self, name: &str) -> Option<&ToolDefinition> {
        self.tool_spec().get(name)
    }

    /// Invoke a tool and wait for its result.
    ///
    /// Never fails: transport and protocol faults come back as a failed
    /// [`ToolResult`] so the model can be told about them.
    async fn call_tool(&self, call: ToolCall) -> ToolResult;
}
