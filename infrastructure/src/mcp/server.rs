//! Tool server: answers protocol requests on one endpoint.
//!
//! [`McpServer`] runs as a single background task for the life of the
//! process. Each request is handled to completion before the next one is
//! read, so map actions are issued in the order calls arrive.

use super::protocol::{
    CallToolParams, CallToolResult, Implementation, InitializeResult, JsonRpcMessage,
    JsonRpcRequest, JsonRpcResponse, ListToolsResult, McpTool, PROTOCOL_VERSION, RpcError,
    ServerCapabilities, ToolsCapability, error_codes, methods,
};
use super::transport::Endpoint;
use crate::tools::{JsonSchemaToolConverter, ToolDispatcher};
use mapchat_domain::{CallId, ToolCall};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

/// Server side of the tool bridge, backed by a [`ToolDispatcher`].
pub struct McpServer {
    dispatcher: Arc<ToolDispatcher>,
    info: Implementation,
}

impl McpServer {
    pub fn new(dispatcher: Arc<ToolDispatcher>) -> Self {
        Self {
            dispatcher,
            info: Implementation::new("mapchat-tools", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Run [`serve`](Self::serve) on a background task.
    pub fn spawn(self, endpoint: Endpoint) -> JoinHandle<()> {
        tokio::spawn(self.serve(endpoint))
    }

    /// Answer requests until the peer goes away.
    pub async fn serve(self, endpoint: Endpoint) {
        let (sender, mut receiver) = endpoint.split();

        while let Some(message) = receiver.recv().await {
            match message {
                JsonRpcMessage::Request(request) => {
                    let response = self.handle_request(request);
                    if sender.send(response).is_err() {
                        debug!("Server: client gone, dropping response");
                        break;
                    }
                }
                JsonRpcMessage::Notification(notification) => {
                    trace!(method = %notification.method, "Server: notification");
                }
                JsonRpcMessage::Response(response) => {
                    warn!(id = response.id, "Server: ignoring unsolicited response");
                }
            }
        }

        info!("Server: transport closed, loop ended");
    }

    /// Produce the response for one request.
    pub fn handle_request(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let id = request.id;
        debug!(id, method = %request.method, "Server: request");

        let outcome = match request.method.as_str() {
            methods::INITIALIZE => self.initialize(),
            methods::TOOLS_LIST => self.list_tools(),
            methods::TOOLS_CALL => self.call_tool(id, request.params),
            other => Err(RpcError::method_not_found(other)),
        };

        match outcome {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(error) => JsonRpcResponse::error(id, error),
        }
    }

    fn initialize(&self) -> Result<serde_json::Value, RpcError> {
        to_result(&InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            server_info: self.info.clone(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability::default()),
            },
        })
    }

    fn list_tools(&self) -> Result<serde_json::Value, RpcError> {
        let converter = JsonSchemaToolConverter;
        let tools = self
            .dispatcher
            .tool_spec()
            .all()
            .map(|tool| McpTool {
                name: tool.name.clone(),
                description: tool.description.clone(),
                input_schema: converter.input_schema(tool),
            })
            .collect();

        to_result(&ListToolsResult { tools })
    }

    fn call_tool(
        &self,
        request_id: u64,
        params: Option<serde_json::Value>,
    ) -> Result<serde_json::Value, RpcError> {
        let params: CallToolParams = params
            .ok_or_else(|| RpcError::invalid_params("tools/call requires params"))
            .and_then(|p| {
                serde_json::from_value(p).map_err(|e| RpcError::invalid_params(e.to_string()))
            })?;

        let call_id = params
            .meta
            .map(|m| CallId::new(m.call_id))
            .unwrap_or_else(|| CallId::from(request_id));
        let call = ToolCall::new(call_id, params.name)
            .with_json_args(serde_json::Value::Object(params.arguments));

        let result = self.dispatcher.handle(call);
        let text = result.text_for_model();
        let payload = match result.error() {
            None => CallToolResult::text(text),
            Some(error) => CallToolResult::error(text).with_error_code(error.code.clone()),
        };

        to_result(&payload)
    }
}

fn to_result<T: serde::Serialize>(value: &T) -> Result<serde_json::Value, RpcError> {
    serde_json::to_value(value)
        .map_err(|e| RpcError::new(error_codes::INTERNAL_ERROR, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::protocol::Content;
    use crate::mcp::transport::create_linked_pair;
    use crate::tools::map_tool_spec;
    use mapchat_application::ports::map_listener::MapQueryListener;
    use mapchat_domain::MapAction;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingListener {
        actions: Mutex<Vec<MapAction>>,
    }

    impl MapQueryListener for RecordingListener {
        fn on_map_query(&self, action: MapAction) {
            self.actions.lock().unwrap().push(action);
        }
    }

    fn server() -> (McpServer, Arc<RecordingListener>) {
        let listener = Arc::new(RecordingListener::default());
        let dispatcher = ToolDispatcher::new(map_tool_spec(), listener.clone()).unwrap();
        (McpServer::new(Arc::new(dispatcher)), listener)
    }

    fn call_request(id: u64, name: &str, arguments: serde_json::Value) -> JsonRpcRequest {
        JsonRpcRequest::new(
            id,
            methods::TOOLS_CALL,
            Some(serde_json::json!({"name": name, "arguments": arguments})),
        )
    }

    #[test]
    fn initialize_announces_tools() {
        let (server, _) = server();
        let result = server
            .handle_request(JsonRpcRequest::new(1, methods::INITIALIZE, None))
            .into_result()
            .unwrap();

        let init: InitializeResult = serde_json::from_value(result).unwrap();
        assert_eq!(init.protocol_version, PROTOCOL_VERSION);
        assert_eq!(init.server_info.name, "mapchat-tools");
        assert!(init.capabilities.tools.is_some());
    }

    #[test]
    fn list_tools_advertises_registry() {
        let (server, _) = server();
        let result = server
            .handle_request(JsonRpcRequest::new(2, methods::TOOLS_LIST, None))
            .into_result()
            .unwrap();

        let list: ListToolsResult = serde_json::from_value(result).unwrap();
        let names: Vec<_> = list.tools.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["view_location_google_maps", "directions_on_google_maps"]
        );
        assert_eq!(list.tools[0].input_schema["required"][0], "query");
    }

    #[test]
    fn call_tool_dispatches_and_acknowledges() {
        let (server, listener) = server();
        let result = server
            .handle_request(call_request(
                3,
                "view_location_google_maps",
                serde_json::json!({"query": "San Francisco"}),
            ))
            .into_result()
            .unwrap();

        let result: CallToolResult = serde_json::from_value(result).unwrap();
        assert!(!result.is_error);
        assert_eq!(
            result.content,
            vec![Content::Text {
                text: "Navigating to: San Francisco".to_string()
            }]
        );
        assert_eq!(
            *listener.actions.lock().unwrap(),
            vec![MapAction::view_location("San Francisco")]
        );
    }

    #[test]
    fn call_unknown_tool_is_tool_error_not_rpc_error() {
        let (server, listener) = server();
        let result = server
            .handle_request(call_request(4, "teleport", serde_json::json!({})))
            .into_result()
            .unwrap();

        let result: CallToolResult = serde_json::from_value(result).unwrap();
        assert!(result.is_error);
        assert_eq!(result.joined_text(), "unknown tool: teleport");
        assert_eq!(result.error_code(), Some("NOT_FOUND"));
        assert!(listener.actions.lock().unwrap().is_empty());
    }

    #[test]
    fn call_without_params_is_invalid() {
        let (server, _) = server();
        let error = server
            .handle_request(JsonRpcRequest::new(5, methods::TOOLS_CALL, None))
            .into_result()
            .unwrap_err();
        assert_eq!(error.code, error_codes::INVALID_PARAMS);
    }

    #[test]
    fn unknown_method_is_method_not_found() {
        let (server, _) = server();
        let response = server.handle_request(JsonRpcRequest::new(6, "resources/list", None));
        assert_eq!(response.id, 6);
        assert_eq!(
            response.into_result().unwrap_err().code,
            error_codes::METHOD_NOT_FOUND
        );
    }

    #[tokio::test]
    async fn serve_answers_over_transport() {
        let (server, _) = server();
        let (mut client, server_end) = create_linked_pair();
        let handle = server.spawn(server_end);

        client
            .send(JsonRpcRequest::new(9, methods::TOOLS_LIST, None))
            .unwrap();
        match client.recv().await.unwrap() {
            JsonRpcMessage::Response(response) => {
                assert_eq!(response.id, 9);
                assert!(response.error.is_none());
            }
            other => panic!("expected response, got {:?}", other),
        }

        drop(client);
        handle.await.unwrap();
    }
}
