//! Model runtime configuration from TOML (`[model]` section)

use crate::gemini::GeminiSettings;
use serde::{Deserialize, Serialize};

/// Raw model configuration from TOML
///
/// # Example
///
/// ```toml
/// [model]
/// name = "gemini-2.5-flash"
/// api_key_env = "GEMINI_API_KEY"
/// include_thoughts = true
/// max_remote_calls = 10
/// system_instruction = "You are a helpful travel guide."
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileModelConfig {
    /// Model name used in the request path
    pub name: String,
    /// API root, without the `/v1beta` suffix
    pub base_url: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Ask the model to stream its reasoning
    pub include_thoughts: bool,
    /// Maximum tool invocations per message
    pub max_remote_calls: usize,
    /// System instruction sent with every request
    pub system_instruction: Option<String>,
}

impl Default for FileModelConfig {
    fn default() -> Self {
        let settings = GeminiSettings::default();
        Self {
            name: settings.model,
            base_url: settings.base_url,
            api_key_env: "GEMINI_API_KEY".to_string(),
            include_thoughts: settings.include_thoughts,
            max_remote_calls: settings.max_remote_calls,
            system_instruction: Some(DEFAULT_SYSTEM_INSTRUCTION.to_string()),
        }
    }
}

const DEFAULT_SYSTEM_INSTRUCTION: &str = "You are a friendly map guide. When the user mentions a \
place, call view_location_google_maps to show it. When the user asks how to get from one place \
to another, call directions_on_google_maps. If no place is mentioned, answer in text and ask \
which place they would like to explore.";

impl FileModelConfig {
    pub fn to_settings(&self) -> GeminiSettings {
        GeminiSettings {
            model: self.name.clone(),
            base_url: self.base_url.clone(),
            include_thoughts: self.include_thoughts,
            max_remote_calls: self.max_remote_calls,
            system_instruction: self.system_instruction.clone(),
        }
    }

    /// Read the API key from the configured environment variable.
    ///
    /// Blank values count as missing.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_runtime_settings() {
        let config = FileModelConfig::default();
        let settings = config.to_settings();
        assert_eq!(settings.model, "gemini-2.5-flash");
        assert_eq!(settings.max_remote_calls, 10);
        assert!(settings.include_thoughts);
        assert!(
            settings
                .system_instruction
                .unwrap()
                .contains("view_location_google_maps")
        );
    }

    #[test]
    fn test_missing_env_var_means_no_key() {
        let config = FileModelConfig {
            api_key_env: "MAPCHAT_TEST_SURELY_UNSET_KEY".to_string(),
            ..Default::default()
        };
        assert_eq!(config.api_key(), None);
    }
}
