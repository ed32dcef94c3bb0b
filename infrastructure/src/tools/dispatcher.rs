//! Tool dispatcher: the "server" side of a tool call.
//!
//! [`ToolDispatcher`] validates a [`ToolCall`] against the registry, resolves
//! it to a [`MapAction`], hands the action to the map listener and returns a
//! short acknowledgement for the model.
//!
//! # Dispatch Path
//!
//! ```text
//! handle(call)
//!   ├─ unknown name        → failure NOT_FOUND        (no notification)
//!   ├─ validation failure  → failure INVALID_ARGUMENT (no notification)
//!   ├─ listener panicked   → failure EXECUTION_FAILED
//!   └─ otherwise           → success "Navigating to: ..."
//! ```

use mapchat_application::ports::map_listener::MapQueryListener;
use mapchat_domain::{
    DefaultToolValidator, DomainError, MapAction, MapTool, ToolCall, ToolError, ToolResult,
    ToolSpec, ToolValidator,
};
use std::any::Any;
use std::collections::HashMap;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors raised while building the dispatcher
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatcherError {
    #[error("Invalid tool registration: {0}")]
    Registration(#[from] DomainError),
}

/// Routes validated tool calls to map handlers.
pub struct ToolDispatcher {
    tool_spec: ToolSpec,
    handlers: HashMap<String, MapTool>,
    validator: DefaultToolValidator,
    listener: Arc<dyn MapQueryListener>,
}

impl ToolDispatcher {
    /// Bind every registered tool to its handler.
    ///
    /// Fails if a registered name has no map tool behind it, or if a map tool
    /// has no registered definition.
    pub fn new(
        tool_spec: ToolSpec,
        listener: Arc<dyn MapQueryListener>,
    ) -> Result<Self, DispatcherError> {
        let mut handlers = HashMap::new();
        for name in tool_spec.names() {
            let tool: MapTool = name.parse()?;
            handlers.insert(name.to_string(), tool);
        }

        if let Some(missing) = MapTool::ALL
            .iter()
            .find(|tool| !tool_spec.contains(tool.name()))
        {
            return Err(DomainError::UnregisteredMapTool(missing.name().to_string()).into());
        }

        debug!(tools = handlers.len(), "Tool dispatcher ready");

        Ok(Self {
            tool_spec,
            handlers,
            validator: DefaultToolValidator,
            listener,
        })
    }

    pub fn tool_spec(&self) -> &ToolSpec {
        &self.tool_spec
    }

    /// Dispatch one call. Never panics and never returns an error past this
    /// boundary; every outcome is a [`ToolResult`] echoing the call id.
    pub fn handle(&self, call: ToolCall) -> ToolResult {
        let (Some(tool), Some(definition)) = (
            self.handlers.get(&call.tool_name).copied(),
            self.tool_spec.get(&call.tool_name),
        ) else {
            debug!(tool = %call.tool_name, "Rejected call to unknown tool");
            return ToolResult::failure(
                call.call_id,
                call.tool_name.clone(),
                ToolError::unknown_tool(&call.tool_name),
            );
        };

        if let Err(e) = self.validator.validate(&call, definition) {
            debug!(tool = %call.tool_name, error = %e, "Tool call failed validation");
            return ToolResult::failure(call.call_id, call.tool_name, e);
        }

        let action = match tool.resolve(&call) {
            Ok(action) => action,
            Err(e) => return ToolResult::failure(call.call_id, call.tool_name, e),
        };

        match self.notify(action.clone()) {
            Ok(()) => {
                debug!(tool = %call.tool_name, action = %action, "Map action issued");
                ToolResult::success(call.call_id, call.tool_name, action.acknowledgement())
            }
            Err(message) => {
                warn!(tool = %call.tool_name, "Map listener panicked: {}", message);
                ToolResult::failure(
                    call.call_id,
                    call.tool_name,
                    ToolError::execution_failed(format!("map update failed: {}", message)),
                )
            }
        }
    }

    fn notify(&self, action: MapAction) -> Result<(), String> {
        let listener = &self.listener;
        catch_unwind(AssertUnwindSafe(|| listener.on_map_query(action))).map_err(panic_message)
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
