//! Tool domain traits
//!
//! Contains pure domain logic for tool validation.
//! The async tool invocation port is defined in the application layer.

use super::entities::{ToolCall, ToolDefinition};
use super::value_objects::ToolError;

/// Validator for tool calls
///
/// This is a pure domain trait that validates tool calls
/// against their definitions without any I/O operations.
pub trait ToolValidator {
    /// Validate a tool call against its definition
    fn validate(&self, call: &ToolCall, definition: &ToolDefinition) -> Result<(), ToolError>;
}

/// Default implementation of ToolValidator
///
/// Required parameters must be present and every known parameter must match
/// its type hint. Arguments the definition does not declare are ignored.
#[derive(Debug, Clone, Default)]
pub struct DefaultToolValidator;

impl ToolValidator for DefaultToolValidator {
    fn validate(&self, call: &ToolCall, definition: &ToolDefinition) -> Result<(), ToolError> {
        for param in &definition.parameters {
            match call.arguments.get(&param.name) {
                None | Some(serde_json::Value::Null) if param.required => {
                    return Err(ToolError::missing_argument(&param.name));
                }
                Some(value) if !value.is_null() && !param.accepts(value) => {
                    return Err(ToolError::invalid_argument(format!(
                        "Argument '{}' must be of type {}",
                        param.name, param.param_type
                    )));
                }
                _ => {}
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::entities::ToolParameter;

    fn route_tool() -> ToolDefinition {
        ToolDefinition::new("route", "route tool")
            .with_parameter(ToolParameter::new("origin", "Start", true))
            .with_parameter(ToolParameter::new("destination", "End", true))
            .with_parameter(ToolParameter::new("avoid_tolls", "Flag", false).with_type("boolean"))
    }

    #[test]
    fn test_validator_names_missing_field() {
        let call = ToolCall::new("1", "route").with_arg("origin", "Oslo");
        let err = DefaultToolValidator.validate(&call, &route_tool()).unwrap_err();
        assert_eq!(err.code, "INVALID_ARGUMENT");
        assert!(err.message.contains("destination"));
    }

    #[test]
    fn test_validator_treats_null_as_missing() {
        let call = ToolCall::new("1", "route")
            .with_arg("origin", serde_json::Value::Null)
            .with_arg("destination", "Bergen");
        let err = DefaultToolValidator.validate(&call, &route_tool()).unwrap_err();
        assert!(err.message.contains("origin"));
    }

    #[test]
    fn test_validator_rejects_wrong_type() {
        let call = ToolCall::new("1", "route")
            .with_arg("origin", 59.9)
            .with_arg("destination", "Bergen");
        let err = DefaultToolValidator.validate(&call, &route_tool()).unwrap_err();
        assert!(err.message.contains("'origin'"));
        assert!(err.message.contains("string"));
    }

    #[test]
    fn test_validator_ignores_undeclared_arguments() {
        let call = ToolCall::new("1", "route")
            .with_arg("origin", "Oslo")
            .with_arg("destination", "Bergen")
            .with_arg("scenic", true);
        assert!(DefaultToolValidator.validate(&call, &route_tool()).is_ok());
    }

    #[test]
    fn test_validator_checks_optional_types() {
        let call = ToolCall::new("1", "route")
            .with_arg("origin", "Oslo")
            .with_arg("destination", "Bergen")
            .with_arg("avoid_tolls", "yes");
        assert!(DefaultToolValidator.validate(&call, &route_tool()).is_err());
    }
}
