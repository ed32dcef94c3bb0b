//! Chat parameters: use case behavior control.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Parameters that control the chat session controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatParams {
    /// Debounce before scrolling to the latest turn once a response completes.
    pub scroll_delay: Duration,
}

impl Default for ChatParams {
    fn default() -> Self {
        Self {
            scroll_delay: Duration::from_millis(100),
        }
    }
}

impl ChatParams {
    pub fn with_scroll_delay(mut self, delay: Duration) -> Self {
        self.scroll_delay = delay;
        self
    }

    pub fn with_scroll_delay_ms(self, millis: u64) -> Self {
        self.with_scroll_delay(Duration::from_millis(millis))
    }
}
