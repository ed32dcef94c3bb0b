//! Configuration file loading for mapchat
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `MAPCHAT_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./mapchat.toml` or `./.mapchat.toml`
//! 4. Global: `$XDG_CONFIG_HOME/mapchat/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileChatConfig, FileConfig, FileLoggingConfig, FileMapsConfig,
    FileModelConfig, is_placeholder_key,
};
pub use loader::ConfigLoader;
