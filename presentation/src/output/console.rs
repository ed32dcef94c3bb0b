//! Console chat view
//!
//! Implements the [`ChatView`] port for a plain terminal. The controller hands
//! over accumulated thinking and text; the view prints only the suffix it has
//! not printed yet, so output streams without redrawing.

use colored::Colorize;
use mapchat_application::{ChatView, ViewError};
use mapchat_domain::{ChatRole, ChatTurn};
use std::io::{self, Stdout, Write};
use std::sync::{Mutex, MutexGuard};

/// Which part of the assistant turn was printed last
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Header,
    Thinking,
    Text,
}

struct ConsoleState<W> {
    out: W,
    section: Section,
    thinking_printed: usize,
    text_printed: usize,
    /// An assistant turn is on screen without its closing newline.
    line_open: bool,
}

impl<W: Write> ConsoleState<W> {
    fn reset(&mut self) {
        self.section = Section::Header;
        self.thinking_printed = 0;
        self.text_printed = 0;
        self.line_open = false;
    }

    fn enter(&mut self, section: Section) -> io::Result<()> {
        if self.section == section {
            return Ok(());
        }
        if self.section != Section::Header {
            writeln!(self.out)?;
        }
        if section == Section::Thinking {
            write!(self.out, "{} ", "thinking:".dimmed().italic())?;
        }
        self.section = section;
        Ok(())
    }
}

/// Streams chat turns to a terminal
pub struct ConsoleChatView<W: Write + Send = Stdout> {
    state: Mutex<ConsoleState<W>>,
    assistant_label: String,
    echo_user: bool,
}

impl ConsoleChatView<Stdout> {
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl Default for ConsoleChatView<Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write + Send> ConsoleChatView<W> {
    pub fn with_writer(out: W) -> Self {
        Self {
            state: Mutex::new(ConsoleState {
                out,
                section: Section::Header,
                thinking_printed: 0,
                text_printed: 0,
                line_open: false,
            }),
            assistant_label: "assistant".to_string(),
            echo_user: false,
        }
    }

    /// Label printed before each assistant turn (e.g. the model name)
    pub fn with_assistant_label(mut self, label: impl Into<String>) -> Self {
        self.assistant_label = label.into();
        self
    }

    /// Print user turns too; the REPL leaves them to the line editor.
    pub fn with_echo_user(mut self, echo: bool) -> Self {
        self.echo_user = echo;
        self
    }

    fn lock(&self) -> Result<MutexGuard<'_, ConsoleState<W>>, ViewError> {
        self.state
            .lock()
            .map_err(|_| ViewError::Render("console state poisoned".to_string()))
    }

    #[cfg(test)]
    fn into_writer(self) -> W {
        match self.state.into_inner() {
            Ok(state) => state.out,
            Err(poisoned) => poisoned.into_inner().out,
        }
    }
}

/// The part of `full` not yet printed, or `None` if the content was replaced.
fn unprinted(full: &str, printed: usize) -> Option<&str> {
    full.get(printed..)
}

impl<W: Write + Send> ChatView for ConsoleChatView<W> {
    fn show_turn(&self, turn: &ChatTurn) -> Result<(), ViewError> {
        let mut state = self.lock()?;
        match turn.role {
            ChatRole::User => {
                if self.echo_user {
                    writeln!(state.out, "{} {}", "you:".bold(), turn.text)?;
                }
            }
            ChatRole::Assistant => {
                state.reset();
                writeln!(state.out)?;
                write!(state.out, "{} ", format!("{}:", self.assistant_label).cyan().bold())?;
                state.line_open = true;
            }
            ChatRole::Error => {
                if state.line_open {
                    writeln!(state.out)?;
                }
                state.reset();
                writeln!(state.out, "{}", turn.text.red())?;
            }
        }
        state.out.flush()?;
        Ok(())
    }

    fn render_thinking(&self, thinking: &str) -> Result<(), ViewError> {
        let mut state = self.lock()?;
        state.enter(Section::Thinking)?;
        let printed = state.thinking_printed;
        if let Some(new) = unprinted(thinking, printed) {
            write!(state.out, "{}", new.dimmed())?;
        }
        state.thinking_printed = thinking.len();
        state.out.flush()?;
        Ok(())
    }

    fn set_thinking_visible(&self, _visible: bool) -> Result<(), ViewError> {
        // Printed thinking cannot be hidden again on a plain terminal.
        Ok(())
    }

    fn render_text(&self, text: &str) -> Result<(), ViewError> {
        let mut state = self.lock()?;
        state.enter(Section::Text)?;
        let printed = state.text_printed;
        if let Some(new) = unprinted(text, printed) {
            write!(state.out, "{}", new)?;
        }
        state.text_printed = text.len();
        state.out.flush()?;
        Ok(())
    }

    fn clear_placeholder(&self) -> Result<(), ViewError> {
        let mut state = self.lock()?;
        state.enter(Section::Text)?;
        write!(state.out, "{}", "(no reply)".dimmed())?;
        Ok(())
    }

    fn finish_turn(&self, _turn: &ChatTurn) -> Result<(), ViewError> {
        let mut state = self.lock()?;
        writeln!(state.out)?;
        state.reset();
        state.out.flush()?;
        Ok(())
    }

    fn scroll_to_latest(&self) -> Result<(), ViewError> {
        self.lock()?.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assistant_turn(thinking: &str, text: &str) -> ChatTurn {
        let mut turn = ChatTurn::assistant();
        if !thinking.is_empty() {
            turn.push_thinking(thinking);
        }
        turn.push_text(text);
        turn.finish();
        turn
    }

    #[test]
    fn test_streams_only_new_suffixes() {
        let view = ConsoleChatView::with_writer(Vec::new()).with_assistant_label("gemini");

        view.show_turn(&ChatTurn::assistant()).unwrap();
        view.render_thinking("Looking up").unwrap();
        view.render_thinking("Looking up the city.").unwrap();
        view.render_text("Here is").unwrap();
        view.render_text("Here is Paris.").unwrap();
        view.finish_turn(&assistant_turn("Looking up the city.", "Here is Paris."))
            .unwrap();

        let printed = String::from_utf8(view.into_writer()).unwrap();
        assert!(printed.contains("gemini:"));
        assert_eq!(printed.matches("Looking up").count(), 1);
        assert!(printed.contains(" the city."));
        assert_eq!(printed.matches("Here is").count(), 1);
        assert!(printed.contains(" Paris."));
        assert!(printed.ends_with('\n'));
    }

    #[test]
    fn test_user_turn_echo_is_optional() {
        let quiet = ConsoleChatView::with_writer(Vec::new());
        quiet.show_turn(&ChatTurn::user("hello")).unwrap();
        assert!(quiet.into_writer().is_empty());

        let echo = ConsoleChatView::with_writer(Vec::new()).with_echo_user(true);
        echo.show_turn(&ChatTurn::user("hello")).unwrap();
        let printed = String::from_utf8(echo.into_writer()).unwrap();
        assert!(printed.contains("hello"));
    }

    #[test]
    fn test_error_turn_and_empty_reply() {
        let view = ConsoleChatView::with_writer(Vec::new());

        view.show_turn(&ChatTurn::assistant()).unwrap();
        view.clear_placeholder().unwrap();
        view.finish_turn(&assistant_turn("", "")).unwrap();
        view.show_turn(&ChatTurn::error("HTTP 500: boom")).unwrap();

        let printed = String::from_utf8(view.into_writer()).unwrap();
        assert!(printed.contains("(no reply)"));
        assert!(printed.contains("Error: HTTP 500: boom"));
    }

    #[test]
    fn test_error_after_partial_text_starts_new_line() {
        let view = ConsoleChatView::with_writer(Vec::new());

        view.show_turn(&ChatTurn::assistant()).unwrap();
        view.render_text("Partial").unwrap();
        view.show_turn(&ChatTurn::error("reset")).unwrap();

        let printed = String::from_utf8(view.into_writer()).unwrap();
        let error_line = printed
            .lines()
            .find(|line| line.contains("Error: reset"))
            .unwrap();
        assert!(!error_line.contains("Partial"));
        assert!(printed.lines().any(|line| line.contains("Partial")));
        assert!(printed.ends_with('\n'));
    }

    #[test]
    fn test_error_after_finished_turn_adds_no_blank_line() {
        let view = ConsoleChatView::with_writer(Vec::new());

        view.show_turn(&ChatTurn::assistant()).unwrap();
        view.render_text("Done").unwrap();
        view.finish_turn(&assistant_turn("", "Done")).unwrap();
        view.show_turn(&ChatTurn::error("later")).unwrap();

        let printed = String::from_utf8(view.into_writer()).unwrap();
        assert!(!printed.contains("\n\n"));
    }

    #[test]
    fn test_unprinted_suffix() {
        assert_eq!(unprinted("abcdef", 3), Some("def"));
        assert_eq!(unprinted("abc", 3), Some(""));
        assert_eq!(unprinted("ab", 3), None);
    }
}
