//! Infrastructure layer for mapchat
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.
//!
//! - [`tools`]: map tool registry, validation and dispatch
//! - [`mcp`]: in-process JSON-RPC bridge between the model runtime and the
//!   tool dispatcher
//! - [`gemini`]: streaming model runtime with automatic function calling
//! - [`config`]: layered TOML/env configuration
//! - [`logging`]: JSONL conversation log

pub mod config;
pub mod gemini;
pub mod logging;
pub mod mcp;
pub mod tools;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileChatConfig, FileConfig, FileLoggingConfig,
    FileMapsConfig, FileModelConfig, is_placeholder_key,
};
pub use gemini::{GeminiRuntime, GeminiSettings};
pub use logging::JsonlConversationLogger;
pub use mcp::{McpClient, McpError, McpServer, create_linked_pair};
pub use tools::{DispatcherError, JsonSchemaToolConverter, ToolDispatcher, map_tool_spec};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gemini::client::{ChunkStream, GenerateContentApi};
    use crate::gemini::protocol::GenerateContentRequest;
    use crate::gemini::stream::decode_sse;
    use async_trait::async_trait;
    use futures::StreamExt;
    use mapchat_application::{MapQueryListener, ModelRuntime, RuntimeError};
    use mapchat_domain::{Fragment, MapAction};
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    /// Replays raw SSE bodies, cut into small byte slices, through the real decoder.
    struct SseReplay {
        bodies: Mutex<VecDeque<String>>,
        requests: Mutex<Vec<GenerateContentRequest>>,
    }

    impl SseReplay {
        fn new(bodies: &[&str]) -> Self {
            Self {
                bodies: Mutex::new(bodies.iter().map(|b| b.to_string()).collect()),
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl GenerateContentApi for SseReplay {
        async fn stream_generate(
            &self,
            request: &GenerateContentRequest,
        ) -> Result<ChunkStream, RuntimeError> {
            self.requests.lock().unwrap().push(request.clone());
            let body = self.bodies.lock().unwrap().pop_front().unwrap_or_default();
            let pieces: Vec<Result<Vec<u8>, std::io::Error>> = body
                .as_bytes()
                .chunks(16)
                .map(|piece| Ok(piece.to_vec()))
                .collect();
            Ok(decode_sse(futures::stream::iter(pieces)).boxed())
        }
    }

    #[derive(Default)]
    struct RecordingMap {
        actions: Mutex<Vec<MapAction>>,
    }

    impl MapQueryListener for RecordingMap {
        fn on_map_query(&self, action: MapAction) {
            self.actions.lock().unwrap().push(action);
        }
    }

    const CALL_BODY: &str = "data: {\"candidates\":[{\"content\":{\"role\":\"model\",\"parts\":[{\"functionCall\":{\"name\":\"view_location_google_maps\",\"args\":{\"query\":\"San Francisco\"}}}]}}]}\r\n\r\n";
    const ANSWER_BODY: &str = "data: {\"candidates\":[{\"content\":{\"role\":\"model\",\"parts\":[{\"text\":\"Here.\"}]}}]}\r\n\r\n";

    #[tokio::test]
    async fn show_me_a_city_moves_the_map_once() {
        let map = Arc::new(RecordingMap::default());
        let listener: Arc<dyn MapQueryListener> = map.clone();
        let dispatcher = ToolDispatcher::new(map_tool_spec(), listener).unwrap();
        let (client_end, server_end) = create_linked_pair();
        let _server = McpServer::new(Arc::new(dispatcher)).spawn(server_end);
        let client = McpClient::connect(client_end).await.unwrap();

        let api = Arc::new(SseReplay::new(&[CALL_BODY, ANSWER_BODY]));
        let runtime = GeminiRuntime::with_api(api.clone(), GeminiSettings::default(), Arc::new(client));

        let items: Vec<_> = runtime
            .send_message_stream("Show me San Francisco")
            .await
            .unwrap()
            .collect()
            .await;

        assert_eq!(
            items,
            vec![
                Ok(Fragment::tool_call(
                    "view_location_google_maps",
                    serde_json::json!({"query": "San Francisco"})
                )),
                Ok(Fragment::text("Here.")),
            ]
        );
        assert_eq!(
            *map.actions.lock().unwrap(),
            vec![MapAction::view_location("San Francisco")]
        );

        let requests = api.requests.lock().unwrap();
        assert_eq!(requests.len(), 2);
        let response = requests[1].contents.last().unwrap().parts[0]
            .function_response
            .as_ref()
            .unwrap();
        assert_eq!(
            response.response,
            serde_json::json!({"result": "Navigating to: San Francisco"})
        );
    }
}
