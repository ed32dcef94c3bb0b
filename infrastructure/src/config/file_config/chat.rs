//! Chat configuration from TOML (`[chat]` section)

use mapchat_application::ChatParams;
use serde::{Deserialize, Serialize};

/// Raw chat configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileChatConfig {
    /// Delay before scrolling to the latest turn after a send completes
    pub scroll_delay_ms: u64,
}

impl Default for FileChatConfig {
    fn default() -> Self {
        Self {
            scroll_delay_ms: ChatParams::default().scroll_delay.as_millis() as u64,
        }
    }
}

impl FileChatConfig {
    pub fn to_params(&self) -> ChatParams {
        ChatParams::default().with_scroll_delay_ms(self.scroll_delay_ms)
    }
}
