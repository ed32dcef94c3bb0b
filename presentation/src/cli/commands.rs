//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for mapchat
#[derive(Parser, Debug)]
#[command(name = "mapchat")]
#[command(author, version, about = "Chat with a model that can show places and routes on a map")]
#[command(long_about = r#"
mapchat is a conversational map explorer. Ask about a place and the model
moves the map there; ask for a route and it draws directions.

The model API key is read from the environment variable named by
model.api_key_env (default GEMINI_API_KEY).

Configuration files are loaded from (in priority order):
1. MAPCHAT_* environment variables (e.g. MAPCHAT_MAPS__API_KEY)
2. --config <path>     Explicit config file
3. ./mapchat.toml      Project-level config
4. ~/.config/mapchat/config.toml   Global config

Example:
  mapchat
  mapchat --prompt "Show me San Francisco"
  mapchat -vv --log-file mapchat.log --conversation-log chat.jsonl
"#)]
pub struct Cli {
    /// Send a single message, print the reply and exit
    #[arg(short, long, value_name = "TEXT")]
    pub prompt: Option<String>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration sources and the effective configuration, then exit
    #[arg(long)]
    pub show_config: bool,

    /// Write diagnostic logs to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Append the conversation as JSONL to this file
    #[arg(long, value_name = "PATH")]
    pub conversation_log: Option<PathBuf>,
}
