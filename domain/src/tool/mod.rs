//! Tool domain module
//!
//! This module defines how the assistant's tool requests are described,
//! validated and answered.
//!
//! # Overview
//!
//! Every tool is described by a [`ToolDefinition`] (name, parameters),
//! invoked via a [`ToolCall`] carrying an opaque [`CallId`], and answered by a
//! [`ToolResult`] that echoes the same id.
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//! │ ToolSpec     │───▶│ ToolCall     │───▶│ ToolResult   │
//! │ (registry)   │    │ (call_id)    │    │ (call_id)    │
//! └──────────────┘    └──────────────┘    └──────────────┘
//! ```
//!
//! The registry is built once at startup and is read-only afterwards.
//!
//! # Key Types
//!
//! - [`ToolSpec`]: ordered, immutable registry of tool definitions
//! - [`ToolDefinition`]: schema for a single tool
//! - [`ToolCall`]: an invocation request with arguments
//! - [`ToolResult`]: success payload or [`ToolError`]
//! - [`ToolValidator`]: pure argument validation against a definition

pub mod entities;
pub mod traits;
pub mod value_objects;

pub use entities::{CallId, ToolCall, ToolDefinition, ToolParameter, ToolSpec};
pub use traits::{DefaultToolValidator, ToolValidator};
pub use value_objects::{ToolError, ToolResult};
