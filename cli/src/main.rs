//! CLI entrypoint for mapchat
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use colored::Colorize;
use mapchat_application::{
    ChatSessionController, ConversationLogger, MapQueryListener, NoConversationLogger,
};
use mapchat_domain::ChatRole;
use mapchat_infrastructure::{
    ConfigLoader, FileConfig, GeminiRuntime, JsonlConversationLogger, McpClient, McpServer,
    ToolDispatcher, create_linked_pair, map_tool_spec,
};
use mapchat_presentation::{ChatRepl, Cli, ConsoleChatView, MapRenderer};
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Keep the guard alive so buffered log lines reach the file on exit.
    let _log_guard = init_logging(cli.verbose, cli.log_file.as_deref())?;

    info!("Starting mapchat");

    // === Configuration ===
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("Failed to load configuration")?
    };

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        println!();
        println!("Effective configuration:");
        println!("{}", toml::to_string_pretty(&redacted(&config))?);
        return Ok(());
    }

    let issues = config.validate();
    if !issues.is_empty() {
        let list = issues
            .iter()
            .map(|issue| format!("  - {}", issue))
            .collect::<Vec<_>>()
            .join("\n");
        bail!("Invalid configuration:\n{}", list);
    }

    let Some(api_key) = config.model.api_key() else {
        bail!(
            "{} is not set. Export your Gemini API key, e.g. `export {}=...`, \
             or point model.api_key_env at another variable.",
            config.model.api_key_env,
            config.model.api_key_env
        );
    };

    // === Dependency Injection ===
    // Map renderer (degrades to a no-op without a usable key)
    let map = Arc::new(MapRenderer::new(config.maps.usable_api_key()));
    if let Some(banner) = map.banner() {
        warn!("Map provider key missing, map updates disabled");
        if cli.prompt.is_some() {
            eprintln!("{}", banner.red().bold());
        }
    }

    // Tool dispatch behind the in-process MCP bridge
    let listener: Arc<dyn MapQueryListener> = map.clone();
    let dispatcher = ToolDispatcher::new(map_tool_spec(), listener)?;
    let (client_end, server_end) = create_linked_pair();
    let _server = McpServer::new(Arc::new(dispatcher)).spawn(server_end);
    let client = McpClient::connect(client_end)
        .await
        .context("Tool bridge handshake failed")?;
    info!(tools = client.tools().len(), "Tool bridge connected");

    // Model runtime
    let settings = config.model.to_settings();
    let model_name = settings.model.clone();
    let runtime = GeminiRuntime::connect(settings, api_key, Arc::new(client))?;

    // Chat
    let view = ConsoleChatView::new()
        .with_assistant_label(&model_name)
        .with_echo_user(cli.prompt.is_some());
    let controller = ChatSessionController::new(Arc::new(runtime), Arc::new(view))
        .with_conversation_logger(conversation_logger(&cli, &config))
        .with_params(config.chat.to_params());

    let mut repl = ChatRepl::new(controller, map).with_model(&model_name);

    match cli.prompt {
        Some(prompt) => {
            repl.send(&prompt).await;
            let failed = repl
                .session()
                .transcript
                .last()
                .is_some_and(|turn| turn.role == ChatRole::Error);
            if failed {
                bail!("The model request failed");
            }
        }
        None => repl.run().await?,
    }

    Ok(())
}

/// Install the tracing subscriber: stderr by default, a file with `--log-file`.
fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Cannot open log file {}", path.display()))?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(writer)
                .init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
            Ok(None)
        }
    }
}

/// JSONL logger from `--conversation-log` or `logging.conversation_log`.
fn conversation_logger(cli: &Cli, config: &FileConfig) -> Arc<dyn ConversationLogger> {
    let path = cli
        .conversation_log
        .as_ref()
        .or(config.logging.conversation_log.as_ref());

    match path.and_then(JsonlConversationLogger::new) {
        Some(logger) => {
            info!(path = %logger.path().display(), "Conversation log enabled");
            Arc::new(logger)
        }
        None => Arc::new(NoConversationLogger),
    }
}

/// Copy of the config safe to print.
fn redacted(config: &FileConfig) -> FileConfig {
    let mut config = config.clone();
    if config.maps.api_key.is_some() {
        config.maps.api_key = Some("********".to_string());
    }
    config
}
