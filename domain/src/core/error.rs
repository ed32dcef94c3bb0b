//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Unknown map tool: {0}")]
    UnknownMapTool(String),

    #[error("Map tool '{0}' has no registered definition")]
    UnregisteredMapTool(String),
}
