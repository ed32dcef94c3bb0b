//! Error types for the tool protocol bridge

use super::transport::TransportError;
use thiserror::Error;

/// Result type alias for protocol operations
pub type Result<T> = std::result::Result<T, McpError>;

/// Errors that can occur when talking to the tool server
#[derive(Error, Debug, Clone, PartialEq)]
pub enum McpError {
    #[error("JSON serialization error: {0}")]
    Serialization(String),

    #[error("JSON-RPC error (code {code}): {message}")]
    Rpc { code: i64, message: String },

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("Protocol version mismatch: server speaks {0}")]
    VersionMismatch(String),

    #[error("Transport closed")]
    TransportClosed,
}

impl From<TransportError> for McpError {
    fn from(error: TransportError) -> Self {
        match error {
            TransportError::Closed => McpError::TransportClosed,
        }
    }
}

impl From<serde_json::Error> for McpError {
    fn from(error: serde_json::Error) -> Self {
        McpError::Serialization(error.to_string())
    }
}

impl From<super::protocol::RpcError> for McpError {
    fn from(error: super::protocol::RpcError) -> Self {
        McpError::Rpc {
            code: error.code,
            message: error.message,
        }
    }
}
