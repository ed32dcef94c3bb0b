//! Domain layer for mapchat
//!
//! This crate contains the core entities and value objects of the map chat.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Map tools
//!
//! The assistant can act on the map through a closed set of tools
//! ([`MapTool`]). Each tool call resolves to a [`MapAction`] that the UI turns
//! into a camera move, markers or a route.
//!
//! ## Chat
//!
//! A [`ChatSession`] owns the [`ChatState`] phase and the append-only
//! [`Transcript`] of [`ChatTurn`]s. Model output arrives as a stream of
//! [`Fragment`]s (thought text, display text, tool-call notices).

pub mod chat;
pub mod core;
pub mod map;
pub mod session;
pub mod tool;
pub mod util;

// Re-export commonly used types
pub use chat::{
    entities::{ChatRole, ChatSession, ChatTurn, Transcript},
    state::ChatState,
};
pub use core::error::DomainError;
pub use map::{action::MapAction, tools::MapTool};
pub use session::stream::Fragment;
pub use tool::{
    entities::{CallId, ToolCall, ToolDefinition, ToolParameter, ToolSpec},
    traits::{DefaultToolValidator, ToolValidator},
    value_objects::{ToolError, ToolResult},
};
