//! Streaming fragments of a model response.
//!
//! A response arrives as an ordered sequence of [`Fragment`]s. Thought and
//! text fragments are rendered as they arrive; tool-call notices are only
//! logged, since the tool has already been dispatched underneath the stream.

use std::collections::HashMap;

/// One incremental unit of a streamed model response.
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    /// Reasoning text the model exposes while working.
    Thought(String),
    /// Display text for the user.
    Text(String),
    /// Notice that the model requested a tool call.
    ToolCall {
        name: String,
        arguments: HashMap<String, serde_json::Value>,
    },
}

impl Fragment {
    pub fn thought(text: impl Into<String>) -> Self {
        Fragment::Thought(text.into())
    }

    pub fn text(text: impl Into<String>) -> Self {
        Fragment::Text(text.into())
    }

    pub fn tool_call(name: impl Into<String>, arguments: serde_json::Value) -> Self {
        let arguments = match arguments {
            serde_json::Value::Object(map) => map.into_iter().collect(),
            _ => HashMap::new(),
        };
        Fragment::ToolCall {
            name: name.into(),
            arguments,
        }
    }
}
