//! Map provider configuration from TOML (`[maps]` section)

use serde::{Deserialize, Serialize};

/// Raw map provider configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileMapsConfig {
    /// Google Maps API key
    pub api_key: Option<String>,
}

impl FileMapsConfig {
    /// The API key, unless it is missing or still a template placeholder.
    pub fn usable_api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !is_placeholder_key(key))
    }
}

/// Keys left blank or copied verbatim from a config template.
pub fn is_placeholder_key(key: &str) -> bool {
    let key = key.trim();
    if key.is_empty() || (key.starts_with('<') && key.ends_with('>')) {
        return true;
    }
    let upper = key.to_ascii_uppercase();
    upper.starts_with("YOUR_") || upper.starts_with("YOUR-") || upper == "CHANGE_ME"
}
