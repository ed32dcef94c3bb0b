//! Application layer for mapchat
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::ChatParams;
pub use ports::{
    chat_view::{ChatView, ViewError},
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    map_listener::MapQueryListener,
    model_runtime::{FragmentItem, FragmentStream, ModelRuntime, RuntimeError},
    tool_invoker::ToolInvoker,
};
pub use use_cases::chat_session::{ChatError, ChatSessionController};
