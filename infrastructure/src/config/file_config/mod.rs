//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Each section converts into the settings type its consumer expects.

mod chat;
mod logging;
mod maps;
mod model;

pub use chat::FileChatConfig;
pub use logging::FileLoggingConfig;
pub use maps::{FileMapsConfig, is_placeholder_key};
pub use model::FileModelConfig;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigValidationError {
    #[error("model.name cannot be empty")]
    EmptyModelName,

    #[error("model.max_remote_calls cannot be 0")]
    NoRemoteCalls,

    #[error("model.api_key_env cannot be empty")]
    EmptyApiKeyEnv,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Model runtime settings
    pub model: FileModelConfig,
    /// Map provider settings
    pub maps: FileMapsConfig,
    /// Chat behavior
    pub chat: FileChatConfig,
    /// Conversation logging
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the configuration, returning every problem found.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut issues = Vec::new();

        if self.model.name.trim().is_empty() {
            issues.push(ConfigValidationError::EmptyModelName);
        }
        if self.model.max_remote_calls == 0 {
            issues.push(ConfigValidationError::NoRemoteCalls);
        }
        if self.model.api_key_env.trim().is_empty() {
            issues.push(ConfigValidationError::EmptyApiKeyEnv);
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[model]
name = "gemini-2.5-pro"
include_thoughts = false
max_remote_calls = 4

[maps]
api_key = "AIzaSyExample"

[chat]
scroll_delay_ms = 250

[logging]
conversation_log = "/tmp/mapchat.jsonl"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.model.name, "gemini-2.5-pro");
        assert!(!config.model.include_thoughts);
        assert_eq!(config.model.max_remote_calls, 4);
        assert_eq!(config.maps.usable_api_key(), Some("AIzaSyExample"));
        assert_eq!(
            config.chat.to_params().scroll_delay,
            Duration::from_millis(250)
        );
        assert_eq!(
            config.logging.conversation_log.as_deref(),
            Some(std::path::Path::new("/tmp/mapchat.jsonl"))
        );
    }

    #[test]
    fn test_deserialize_partial_config() {
        let toml_str = r#"
[model]
name = "gemini-2.0-flash"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.model.name, "gemini-2.0-flash");
        // Defaults should apply
        assert_eq!(config.model.api_key_env, "GEMINI_API_KEY");
        assert_eq!(config.model.max_remote_calls, 10);
        assert!(config.maps.api_key.is_none());
        assert_eq!(config.chat.scroll_delay_ms, 100);
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(FileConfig::default().validate().is_empty());
    }

    #[test]
    fn test_validate_reports_every_issue() {
        let mut config = FileConfig::default();
        config.model.name = "  ".to_string();
        config.model.max_remote_calls = 0;

        assert_eq!(
            config.validate(),
            vec![
                ConfigValidationError::EmptyModelName,
                ConfigValidationError::NoRemoteCalls,
            ]
        );
    }

    #[test]
    fn test_default_round_trips_through_toml() {
        let rendered = toml::to_string_pretty(&FileConfig::default()).unwrap();
        let parsed: FileConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed, FileConfig::default());
    }
}
