//! Chat session use case
//!
//! Drives one send through the streaming state machine:
//!
//! ```text
//! idle → generating → { thinking | executing }* → idle
//! ```
//!
//! The controller appends the user turn and an assistant turn, applies the
//! response fragments in stream order, and turns any fault into an error turn.
//! The session returns to idle on every exit path, including a panic inside
//! the view.

use crate::config::ChatParams;
use crate::ports::chat_view::{ChatView, ViewError};
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::model_runtime::{ModelRuntime, RuntimeError};
use futures::StreamExt;
use mapchat_domain::util::preview;
use mapchat_domain::{ChatSession, ChatState, ChatTurn, Fragment};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur during a send
///
/// Only [`ChatError::Busy`] is returned from [`ChatSessionController::send`];
/// the other variants are rendered into the transcript as error turns.
#[derive(Error, Debug)]
pub enum ChatError {
    #[error("A response is already being generated")]
    Busy,

    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    #[error(transparent)]
    View(#[from] ViewError),
}

/// Holds the session state for the duration of a send and resets it to idle
/// when dropped.
struct IdleGuard<'a> {
    state: &'a mut ChatState,
}

impl<'a> IdleGuard<'a> {
    fn new(state: &'a mut ChatState) -> Self {
        Self { state }
    }

    fn enter(&mut self, next: ChatState) {
        if *self.state != next {
            debug!(from = %self.state, to = %next, "Chat state transition");
            *self.state = next;
        }
    }
}

impl Drop for IdleGuard<'_> {
    fn drop(&mut self) {
        *self.state = ChatState::Idle;
    }
}

/// Use case that owns the send loop of a single conversation
pub struct ChatSessionController {
    runtime: Arc<dyn ModelRuntime>,
    view: Arc<dyn ChatView>,
    conversation_logger: Arc<dyn ConversationLogger>,
    params: ChatParams,
}

impl ChatSessionController {
    pub fn new(runtime: Arc<dyn ModelRuntime>, view: Arc<dyn ChatView>) -> Self {
        Self {
            runtime,
            view,
            conversation_logger: Arc::new(NoConversationLogger),
            params: ChatParams::default(),
        }
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    pub fn with_params(mut self, params: ChatParams) -> Self {
        self.params = params;
        self
    }

    pub fn params(&self) -> &ChatParams {
        &self.params
    }

    /// Send `text` and stream the reply into `session`.
    ///
    /// Rejects the send with [`ChatError::Busy`] when the session is not idle,
    /// leaving the transcript untouched. Every other fault ends up as an error
    /// turn and the call still returns `Ok`.
    pub async fn send(&self, session: &mut ChatSession, text: &str) -> Result<(), ChatError> {
        if !session.is_idle() {
            warn!(state = %session.state, "Rejected send while busy");
            return Err(ChatError::Busy);
        }

        let ChatSession { state, transcript } = session;
        let mut guard = IdleGuard::new(state);
        guard.enter(ChatState::Generating);

        info!(message = %preview(text, 80), "Sending user message");
        self.conversation_logger
            .log(ConversationEvent::user_message(text));

        let user_turn = transcript.append(ChatTurn::user(text));
        let mut outcome = self.view.show_turn(user_turn).map_err(ChatError::from);

        let turn = transcript.append(ChatTurn::assistant());
        if outcome.is_ok() {
            outcome = self.stream_reply(&mut guard, turn, text).await;
        }

        if let Err(e) = outcome {
            if !turn.complete {
                turn.finish();
            }
            self.record_error(transcript.append(ChatTurn::error(e.to_string())), &e);
        }

        drop(guard);

        if !self.params.scroll_delay.is_zero() {
            tokio::time::sleep(self.params.scroll_delay).await;
        }
        if let Err(e) = self.view.scroll_to_latest() {
            warn!(error = %e, "Failed to scroll to latest turn");
        }

        Ok(())
    }

    /// Apply the response fragments to the assistant turn.
    async fn stream_reply(
        &self,
        guard: &mut IdleGuard<'_>,
        turn: &mut ChatTurn,
        text: &str,
    ) -> Result<(), ChatError> {
        self.view.show_turn(turn)?;

        let mut stream = self.runtime.send_message_stream(text).await?;

        while let Some(item) = stream.next().await {
            match item? {
                Fragment::Thought(chunk) => {
                    guard.enter(ChatState::Thinking);
                    turn.push_thinking(&chunk);
                    self.view.render_thinking(&turn.thinking)?;
                    self.view.set_thinking_visible(true)?;
                }
                Fragment::Text(chunk) => {
                    guard.enter(ChatState::Executing);
                    turn.push_text(&chunk);
                    self.view.render_text(&turn.text)?;
                }
                Fragment::ToolCall { name, arguments } => {
                    info!(tool = %name, "Model called tool");
                    let arguments = serde_json::Value::Object(arguments.into_iter().collect());
                    self.conversation_logger
                        .log(ConversationEvent::tool_call(&name, arguments));
                }
            }
        }

        if !turn.has_thinking() {
            self.view.set_thinking_visible(false)?;
        }
        if !turn.has_text() {
            self.view.clear_placeholder()?;
        }
        turn.finish();
        self.view.finish_turn(turn)?;

        debug!(
            text_len = turn.text.len(),
            thinking_len = turn.thinking.len(),
            "Assistant turn complete"
        );
        self.conversation_logger
            .log(ConversationEvent::assistant_response(&turn.text, &turn.thinking));

        Ok(())
    }

    fn record_error(&self, turn: &ChatTurn, error: &ChatError) {
        warn!(error = %error, "Response failed");
        self.conversation_logger
            .log(ConversationEvent::stream_error(&error.to_string()));
        if let Err(e) = self.view.show_turn(turn) {
            warn!(error = %e, "Failed to render error turn");
        }
    }
}
