//! Presentation layer for mapchat
//!
//! This crate contains the CLI definition, the console chat view, the map
//! renderer and the interactive chat interface.

pub mod chat;
pub mod cli;
pub mod map;
pub mod output;

// Re-export commonly used types
pub use chat::ChatRepl;
pub use cli::commands::Cli;
pub use map::{MapRenderer, MapScene};
pub use output::console::ConsoleChatView;
