//! Chat entities: turns, transcript and the owned session object.

use super::state::ChatState;
use serde::{Deserialize, Serialize};

/// Author of a transcript turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
    Error,
}

impl ChatRole {
    pub fn as_str(&self) -> &str {
        match self {
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
            ChatRole::Error => "error",
        }
    }
}

impl std::fmt::Display for ChatRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One entry in the transcript.
///
/// Assistant turns accumulate thought text and display text while the
/// response streams in; user and error turns are complete on creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    /// Accumulated thought text (assistant turns only)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub thinking: String,
    /// Accumulated display text
    pub text: String,
    /// Whether the thinking pane is shown for this turn
    #[serde(default)]
    pub thinking_visible: bool,
    /// Whether streaming into this turn has finished
    pub complete: bool,
}

impl ChatTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            thinking: String::new(),
            text: text.into(),
            thinking_visible: false,
            complete: true,
        }
    }

    /// An empty assistant turn, about to receive streamed fragments.
    pub fn assistant() -> Self {
        Self {
            role: ChatRole::Assistant,
            thinking: String::new(),
            text: String::new(),
            thinking_visible: false,
            complete: false,
        }
    }

    /// An error turn; the text is prefixed with `Error: `.
    pub fn error(message: impl AsRef<str>) -> Self {
        Self {
            role: ChatRole::Error,
            thinking: String::new(),
            text: format!("Error: {}", message.as_ref()),
            thinking_visible: false,
            complete: true,
        }
    }

    pub fn push_thinking(&mut self, chunk: &str) {
        self.thinking.push_str(chunk);
        self.thinking_visible = true;
    }

    pub fn push_text(&mut self, chunk: &str) {
        self.text.push_str(chunk);
    }

    pub fn has_thinking(&self) -> bool {
        !self.thinking.is_empty()
    }

    pub fn has_text(&self) -> bool {
        !self.text.is_empty()
    }

    /// Close the turn; the thinking pane stays visible only if a thought arrived.
    pub fn finish(&mut self) {
        self.thinking_visible = self.has_thinking();
        self.complete = true;
    }
}

/// Ordered, append-only list of chat turns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    turns: Vec<ChatTurn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn and return its index.
    pub fn push(&mut self, turn: ChatTurn) -> usize {
        self.turns.push(turn);
        self.turns.len() - 1
    }

    /// Append a turn and return it for in-place streaming updates.
    pub fn append(&mut self, turn: ChatTurn) -> &mut ChatTurn {
        let index = self.push(turn);
        &mut self.turns[index]
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn last(&self) -> Option<&ChatTurn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn count_role(&self, role: ChatRole) -> usize {
        self.turns.iter().filter(|t| t.role == role).count()
    }
}

/// The state a single conversation owns: its phase and its transcript.
///
/// Passed by `&mut` into the chat session controller, which is the only
/// writer while a send is in flight.
#[derive(Debug, Clone, Default)]
pub struct ChatSession {
    pub state: ChatState,
    pub transcript: Transcript,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_idle(&self) -> bool {
        self.state.is_idle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assistant_turn_accumulates() {
        let mut turn = ChatTurn::assistant();
        turn.push_thinking("Looking up ");
        turn.push_thinking("the city.");
        turn.push_text("Here is ");
        turn.push_text("Paris.");

        assert_eq!(turn.thinking, "Looking up the city.");
        assert_eq!(turn.text, "Here is Paris.");
        assert!(turn.thinking_visible);
        assert!(!turn.complete);
    }

    #[test]
    fn test_finish_hides_unused_thinking_pane() {
        let mut turn = ChatTurn::assistant();
        turn.push_text("Hi");
        turn.finish();
        assert!(!turn.thinking_visible);
        assert!(turn.complete);
    }

    #[test]
    fn test_error_turn_prefix() {
        let turn = ChatTurn::error("connection reset");
        assert_eq!(turn.role, ChatRole::Error);
        assert_eq!(turn.text, "Error: connection reset");
        assert!(turn.complete);
    }

    #[test]
    fn test_transcript_is_ordered() {
        let mut transcript = Transcript::new();
        let first = transcript.push(ChatTurn::user("one"));
        let second = transcript.push(ChatTurn::assistant());

        assert_eq!((first, second), (0, 1));
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript.count_role(ChatRole::User), 1);

        assert_eq!(transcript.turns()[second].role, ChatRole::Assistant);

        transcript.append(ChatTurn::assistant()).push_text("three");
        assert_eq!(transcript.len(), 3);
        assert_eq!(transcript.last().unwrap().text, "three");
    }

    #[test]
    fn test_new_session_is_idle_and_empty() {
        let session = ChatSession::new();
        assert!(session.is_idle());
        assert!(session.transcript.is_empty());
    }
}
