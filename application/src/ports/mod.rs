//! Port definitions
//!
//! Interfaces the use cases depend on. Adapters live in the infrastructure
//! and presentation layers.

pub mod chat_view;
pub mod conversation_logger;
pub mod map_listener;
pub mod model_runtime;
pub mod tool_invoker;
