//! Chat domain.
//!
//! - [`state::ChatState`]: the single-flight phase of the conversation
//! - [`entities::ChatTurn`]: one entry in the transcript
//! - [`entities::Transcript`]: ordered, append-only list of turns
//! - [`entities::ChatSession`]: owned bundle of state + transcript

pub mod entities;
pub mod state;
