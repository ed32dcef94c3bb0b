//! Tool domain value objects: immutable result and error types
//!
//! Every dispatched [`ToolCall`](super::ToolCall) produces exactly one
//! [`ToolResult`] echoing the call id. Failures never escape as panics or
//! `Err` values past the dispatcher; they are carried inside the result.

use super::entities::CallId;
use serde::{Deserialize, Serialize};

/// Error that occurred while dispatching a tool call.
///
/// | Code | Meaning |
/// |------|---------|
/// | `NOT_FOUND` | The tool name is not registered |
/// | `INVALID_ARGUMENT` | A required argument is missing or has the wrong type |
/// | `EXECUTION_FAILED` | The handler faulted |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolError {
    /// Error code (e.g., "NOT_FOUND", "INVALID_ARGUMENT")
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl ToolError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn unknown_tool(name: impl AsRef<str>) -> Self {
        Self::new("NOT_FOUND", format!("unknown tool: {}", name.as_ref()))
    }

    pub fn missing_argument(field: impl AsRef<str>) -> Self {
        Self::invalid_argument(format!("Missing required argument: {}", field.as_ref()))
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new("INVALID_ARGUMENT", message)
    }

    pub fn execution_failed(message: impl Into<String>) -> Self {
        Self::new("EXECUTION_FAILED", message)
    }

    pub fn is_unknown_tool(&self) -> bool {
        self.code == "NOT_FOUND"
    }
}

impl std::fmt::Display for ToolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ToolError {}

/// Result of a tool call, carrying an acknowledgement payload or an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    /// Id of the call this result answers
    pub call_id: CallId,
    /// Name of the tool that was called
    pub tool_name: String,
    /// Whether the call succeeded
    pub success: bool,
    /// Payload (for successful calls)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    /// Error information (for failed calls)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ToolError>,
}

impl ToolResult {
    /// Create a successful result
    pub fn success(
        call_id: CallId,
        tool_name: impl Into<String>,
        output: impl Into<String>,
    ) -> Self {
        Self {
            call_id,
            tool_name: tool_name.into(),
            success: true,
            output: Some(output.into()),
            error: None,
        }
    }

    /// Create a failed result
    pub fn failure(call_id: CallId, tool_name: impl Into<String>, error: ToolError) -> Self {
        Self {
            call_id,
            tool_name: tool_name.into(),
            success: false,
            output: None,
            error: Some(error),
        }
    }

    /// Check if the call was successful
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Get the payload
    pub fn output(&self) -> Option<&str> {
        self.output.as_deref()
    }

    /// Get the error
    pub fn error(&self) -> Option<&ToolError> {
        self.error.as_ref()
    }

    /// Text handed back to the model: the payload, or the error message.
    pub fn text_for_model(&self) -> String {
        match (&self.output, &self.error) {
            (Some(output), _) if self.success => output.clone(),
            (_, Some(error)) => error.message.clone(),
            _ => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_tool_error() {
        let err = ToolError::unknown_tool("teleport");
        assert!(err.is_unknown_tool());
        assert_eq!(err.message, "unknown tool: teleport");
        assert_eq!(err.to_string(), "[NOT_FOUND] unknown tool: teleport");
    }

    #[test]
    fn test_missing_argument_names_field() {
        let err = ToolError::missing_argument("query");
        assert_eq!(err.code, "INVALID_ARGUMENT");
        assert!(err.message.ends_with("query"));
    }

    #[test]
    fn test_tool_result_success() {
        let result = ToolResult::success(CallId::new("c1"), "view", "Navigating to: Rome");

        assert!(result.is_success());
        assert_eq!(result.call_id.as_str(), "c1");
        assert_eq!(result.output(), Some("Navigating to: Rome"));
        assert!(result.error().is_none());
        assert_eq!(result.text_for_model(), "Navigating to: Rome");
    }

    #[test]
    fn test_tool_result_failure() {
        let result = ToolResult::failure(
            CallId::new("c2"),
            "teleport",
            ToolError::unknown_tool("teleport"),
        );

        assert!(!result.is_success());
        assert!(result.output().is_none());
        assert_eq!(result.error().unwrap().code, "NOT_FOUND");
        assert_eq!(result.text_for_model(), "unknown tool: teleport");
    }
}
