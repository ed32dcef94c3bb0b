//! Conversation phase.

use serde::{Deserialize, Serialize};

/// Phase of the chat session controller.
///
/// ```text
/// Idle → Generating → { Thinking | Executing }* → Idle
/// ```
///
/// Only one value is active at a time. Every exit path of a send returns the
/// session to [`ChatState::Idle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatState {
    /// Ready to accept a message
    #[default]
    Idle,
    /// Request sent, waiting for the first fragment
    Generating,
    /// Receiving thought fragments
    Thinking,
    /// Receiving display text
    Executing,
}

impl ChatState {
    pub fn as_str(&self) -> &str {
        match self {
            ChatState::Idle => "idle",
            ChatState::Generating => "generating",
            ChatState::Thinking => "thinking",
            ChatState::Executing => "executing",
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, ChatState::Idle)
    }
}

impl std::fmt::Display for ChatState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
