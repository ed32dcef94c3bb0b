//! Chat view port
//!
//! Rendering surface for the transcript. The chat session controller drives
//! it while a response streams; the console renderer in the presentation
//! layer is the production implementation.

use mapchat_domain::ChatTurn;
use thiserror::Error;

/// Errors raised while rendering
#[derive(Error, Debug)]
pub enum ViewError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Render failed: {0}")]
    Render(String),
}

/// Rendering surface for chat turns.
///
/// Streaming calls (`render_thinking`, `render_text`) receive the full
/// accumulated content so far; the view decides how much of it is new.
pub trait ChatView: Send + Sync {
    /// Show a newly appended turn. An assistant turn starts with its
    /// placeholder visible.
    fn show_turn(&self, turn: &ChatTurn) -> Result<(), ViewError>;

    /// Re-render the thinking pane of the streaming assistant turn.
    fn render_thinking(&self, thinking: &str) -> Result<(), ViewError>;

    fn set_thinking_visible(&self, visible: bool) -> Result<(), ViewError>;

    /// Re-render the display text of the streaming assistant turn.
    fn render_text(&self, text: &str) -> Result<(), ViewError>;

    /// Remove the placeholder of an assistant turn that produced no text.
    fn clear_placeholder(&self) -> Result<(), ViewError>;

    /// The streaming assistant turn is complete.
    fn finish_turn(&self, turn: &ChatTurn) -> Result<(), ViewError>;

    fn scroll_to_latest(&self) -> Result<(), ViewError>;
}
