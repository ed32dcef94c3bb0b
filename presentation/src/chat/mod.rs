//! Interactive chat module
//!
//! Provides a readline-based interactive chat interface.

mod repl;

pub use repl::{ChatRepl, EXAMPLE_PROMPTS, ReplCommand, format_transcript};
