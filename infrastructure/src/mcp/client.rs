//! Tool client: request/response correlation over one endpoint.
//!
//! [`McpClient`] owns the sending half of its endpoint and hands the
//! receiving half to a background reader task. Each request is registered in
//! `pending_responses` under a fresh id before it is sent; the reader task
//! fulfils the matching oneshot when the response arrives, so concurrent
//! calls never resolve each other.
//!
//! There is no timeout: a server that never answers stalls the caller. When
//! the transport closes, every pending call fails with
//! [`McpError::TransportClosed`].

use super::error::{McpError, Result};
use super::protocol::{
    CallMeta, CallToolParams, CallToolResult, Implementation, InitializeParams, InitializeResult,
    JsonRpcMessage, JsonRpcNotification, JsonRpcRequest, JsonRpcResponse, ListToolsResult,
    PROTOCOL_VERSION, methods,
};
use super::transport::{Endpoint, EndpointReceiver, EndpointSender};
use crate::tools::JsonSchemaToolConverter;
use async_trait::async_trait;
use mapchat_application::ports::tool_invoker::ToolInvoker;
use mapchat_domain::{ToolCall, ToolError, ToolResult, ToolSpec};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{Mutex, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

/// Pending requests plus a flag the reader sets once the transport is gone.
#[derive(Default)]
struct PendingResponses {
    senders: HashMap<u64, oneshot::Sender<JsonRpcResponse>>,
    closed: bool,
}

/// Client side of the tool bridge.
pub struct McpClient {
    sender: EndpointSender,
    /// Request-response correlation (request_id -> oneshot sender).
    pending_responses: Arc<Mutex<PendingResponses>>,
    next_id: AtomicU64,
    tools: ToolSpec,
    _reader_handle: JoinHandle<()>,
}

impl McpClient {
    /// Connect over `endpoint`: handshake, then fetch and cache the tool list.
    pub async fn connect(endpoint: Endpoint) -> Result<Self> {
        let (sender, receiver) = endpoint.split();
        let pending_responses = Arc::new(Mutex::new(PendingResponses::default()));

        let pending_bg = Arc::clone(&pending_responses);
        let reader_handle = tokio::spawn(async move {
            Self::reader_loop(receiver, pending_bg).await;
        });

        let mut client = Self {
            sender,
            pending_responses,
            next_id: AtomicU64::new(1),
            tools: ToolSpec::new(),
            _reader_handle: reader_handle,
        };

        let init = client.initialize().await?;
        info!(
            server = %init.server_info.name,
            version = %init.server_info.version,
            "Connected to tool server"
        );

        client.tools = client.list_tools().await?;
        debug!(tools = client.tools.len(), "Cached tool list");

        Ok(client)
    }

    /// Background reader loop: single owner of the receiving half.
    ///
    /// Responses are matched to pending requests by id. When the peer goes
    /// away, the pending map is closed and cleared so every waiter observes
    /// a dropped sender.
    async fn reader_loop(mut receiver: EndpointReceiver, pending: Arc<Mutex<PendingResponses>>) {
        while let Some(message) = receiver.recv().await {
            match message {
                JsonRpcMessage::Response(response) => {
                    let id = response.id;
                    let sender = pending.lock().await.senders.remove(&id);
                    match sender {
                        Some(tx) => {
                            let _ = tx.send(response);
                        }
                        None => debug!("Client: no pending receiver for response id={}", id),
                    }
                }
                JsonRpcMessage::Notification(notification) => {
                    trace!(method = %notification.method, "Client: notification");
                }
                JsonRpcMessage::Request(request) => {
                    warn!(method = %request.method, "Client: ignoring server request");
                }
            }
        }

        info!("Client: reader loop ended, failing pending calls");
        let mut pending = pending.lock().await;
        pending.closed = true;
        pending.senders.clear();
    }

    /// Send a request and wait for the correlated response.
    pub async fn request(
        &self,
        method: &str,
        params: Option<serde_json::Value>,
    ) -> Result<serde_json::Value> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let (tx, rx) = oneshot::channel();

        {
            let mut pending = self.pending_responses.lock().await;
            if pending.closed {
                return Err(McpError::TransportClosed);
            }
            pending.senders.insert(id, tx);
        }

        if let Err(e) = self.sender.send(JsonRpcRequest::new(id, method, params)) {
            // Clean up the pending entry to prevent leaks
            self.pending_responses.lock().await.senders.remove(&id);
            return Err(e.into());
        }

        let response = rx.await.map_err(|_| McpError::TransportClosed)?;
        Ok(response.into_result()?)
    }

    /// Send a notification (no response expected).
    pub fn notify(&self, method: &str, params: Option<serde_json::Value>) -> Result<()> {
        self.sender
            .send(JsonRpcNotification::new(method, params))
            .map_err(McpError::from)
    }

    async fn initialize(&self) -> Result<InitializeResult> {
        let params = InitializeParams {
            protocol_version: PROTOCOL_VERSION.to_string(),
            client_info: Implementation::new("mapchat", env!("CARGO_PKG_VERSION")),
            capabilities: serde_json::json!({}),
        };

        let result = self
            .request(methods::INITIALIZE, Some(serde_json::to_value(params)?))
            .await?;
        let init: InitializeResult = serde_json::from_value(result)
            .map_err(|e| McpError::UnexpectedResponse(format!("initialize: {}", e)))?;

        if init.protocol_version != PROTOCOL_VERSION {
            return Err(McpError::VersionMismatch(init.protocol_version));
        }

        self.notify(methods::INITIALIZED, None)?;
        Ok(init)
    }

    async fn list_tools(&self) -> Result<ToolSpec> {
        let result = self.request(methods::TOOLS_LIST, None).await?;
        let list: ListToolsResult = serde_json::from_value(result)
            .map_err(|e| McpError::UnexpectedResponse(format!("tools/list: {}", e)))?;

        let converter = JsonSchemaToolConverter;
        Ok(list
            .tools
            .iter()
            .map(|tool| {
                converter.definition_from_schema(&tool.name, &tool.description, &tool.input_schema)
            })
            .collect())
    }

    /// Call a tool by name and wait for its result.
    pub async fn call(&self, params: CallToolParams) -> Result<CallToolResult> {
        let result = self
            .request(methods::TOOLS_CALL, Some(serde_json::to_value(params)?))
            .await?;
        serde_json::from_value(result)
            .map_err(|e| McpError::UnexpectedResponse(format!("tools/call: {}", e)))
    }

    pub fn tools(&self) -> &ToolSpec {
        &self.tools
    }
}

#[async_trait]
impl ToolInvoker for McpClient {
    fn tool_spec(&self) -> &ToolSpec {
        &self.tools
    }

    async fn call_tool(&self, call: ToolCall) -> ToolResult {
        let params = CallToolParams {
            name: call.tool_name.clone(),
            meta: Some(CallMeta {
                call_id: call.call_id.to_string(),
            }),
            arguments: call.arguments.into_iter().collect(),
        };

        match self.call(params).await {
            Ok(result) if !result.is_error => {
                ToolResult::success(call.call_id, call.tool_name, result.joined_text())
            }
            Ok(result) => {
                let code = result.error_code().unwrap_or("EXECUTION_FAILED");
                let error = ToolError::new(code, result.joined_text());
                ToolResult::failure(call.call_id, call.tool_name, error)
            }
            Err(e) => {
                warn!(tool = %call.tool_name, error = %e, "Tool call failed in transport");
                ToolResult::failure(
                    call.call_id,
                    call.tool_name,
                    ToolError::execution_failed(e.to_string()),
                )
            }
        }
    }
}
