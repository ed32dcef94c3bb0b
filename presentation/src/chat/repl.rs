//! REPL (Read-Eval-Print Loop) for interactive map chat

use crate::map::MapRenderer;
use colored::Colorize;
use mapchat_application::{ChatError, ChatSessionController};
use mapchat_domain::{ChatRole, ChatSession, Transcript};
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use std::sync::Arc;
use tracing::warn;

/// Prompts shown by `/examples`
pub const EXAMPLE_PROMPTS: [&str; 4] = [
    "Show me San Francisco",
    "Take me to the Eiffel Tower",
    "How do I get from Oakland to Palo Alto?",
    "What's a good day trip from Kyoto? Show me on the map.",
];

/// A slash command typed at the prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Help,
    Examples,
    Transcript,
    Map,
    Quit,
    Unknown(String),
}

impl ReplCommand {
    /// Parse a line starting with `/`.
    pub fn parse(line: &str) -> Self {
        match line.split_whitespace().next().unwrap_or_default() {
            "/help" | "/h" | "/?" => ReplCommand::Help,
            "/examples" | "/ex" => ReplCommand::Examples,
            "/transcript" | "/t" => ReplCommand::Transcript,
            "/map" | "/m" => ReplCommand::Map,
            "/quit" | "/exit" | "/q" => ReplCommand::Quit,
            other => ReplCommand::Unknown(other.to_string()),
        }
    }
}

/// Interactive chat REPL
pub struct ChatRepl {
    controller: ChatSessionController,
    session: ChatSession,
    map: Arc<MapRenderer>,
    model: String,
}

impl ChatRepl {
    pub fn new(controller: ChatSessionController, map: Arc<MapRenderer>) -> Self {
        Self {
            controller,
            session: ChatSession::new(),
            map,
            model: String::new(),
        }
    }

    /// Model name shown in the welcome banner
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    /// Send one message and wait for the reply to finish rendering.
    pub async fn send(&mut self, text: &str) {
        match self.controller.send(&mut self.session, text).await {
            Ok(()) => {}
            Err(ChatError::Busy) => {
                println!("{}", "Still answering the previous message.".yellow());
            }
            Err(e) => {
                eprintln!("Error: {}", e);
            }
        }
    }

    /// Run the interactive REPL
    pub async fn run(&mut self) -> RlResult<()> {
        let mut rl = DefaultEditor::new()?;

        let history_path = dirs::data_dir().map(|p| p.join("mapchat").join("history.txt"));

        if let Some(ref path) = history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = rl.load_history(path);
        }

        self.print_welcome();

        loop {
            match rl.readline(">>> ") {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }

                    let _ = rl.add_history_entry(line);

                    if line.starts_with('/') {
                        if self.handle_command(ReplCommand::parse(line)) {
                            break;
                        }
                        continue;
                    }

                    self.send(line).await;
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Bye!");
                    break;
                }
                Err(err) => {
                    warn!(error = %err, "Line editor failed");
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        if let Some(ref path) = history_path {
            let _ = rl.save_history(path);
        }

        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│                  mapchat                    │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        if !self.model.is_empty() {
            println!("Model: {}", self.model);
        }
        if let Some(banner) = self.map.banner() {
            println!("{}", banner.red().bold());
        }
        println!();
        println!("Ask about any place, or try /examples. Type /help for commands.");
        println!();
    }

    /// Handle a slash command. Returns true if the REPL should exit.
    fn handle_command(&self, command: ReplCommand) -> bool {
        match command {
            ReplCommand::Quit => {
                println!("Bye!");
                return true;
            }
            ReplCommand::Help => {
                println!();
                println!("Commands:");
                println!("  /help, /h, /?        - Show this help");
                println!("  /examples, /ex       - Show example prompts");
                println!("  /transcript, /t      - Show the conversation so far");
                println!("  /map, /m             - Show what the map is displaying");
                println!("  /quit, /exit, /q     - Exit");
                println!();
            }
            ReplCommand::Examples => {
                println!();
                for example in EXAMPLE_PROMPTS {
                    println!("  {}", example);
                }
                println!();
            }
            ReplCommand::Transcript => {
                println!();
                print!("{}", format_transcript(&self.session.transcript));
                println!();
            }
            ReplCommand::Map => {
                if let Some(banner) = self.map.banner() {
                    println!("{}", banner.red());
                } else {
                    let scene = self.map.scene();
                    match scene.link() {
                        Some(link) => println!("{} {}", scene.describe(), link),
                        None => println!("{}", scene.describe()),
                    }
                }
            }
            ReplCommand::Unknown(cmd) => {
                println!("Unknown command: {}", cmd);
                println!("Type /help for available commands");
            }
        }
        false
    }
}

/// Plain-text rendering of the transcript, one block per turn.
pub fn format_transcript(transcript: &Transcript) -> String {
    if transcript.is_empty() {
        return "(no messages yet)\n".to_string();
    }

    let mut output = String::new();
    for turn in transcript.turns() {
        let label = match turn.role {
            ChatRole::User => "you".bold(),
            ChatRole::Assistant => "assistant".cyan().bold(),
            ChatRole::Error => "error".red().bold(),
        };
        output.push_str(&format!("{}: ", label));
        if turn.has_thinking() {
            output.push_str(&format!("{}\n  ", format!("({})", turn.thinking).dimmed()));
        }
        output.push_str(&turn.text);
        output.push('\n');
    }
    output
}
