//! Streaming model runtime with automatic function calling.
//!
//! [`GeminiRuntime`] implements [`ModelRuntime`]. Each send runs on its own
//! producer task:
//!
//! ```text
//! send_message_stream(text)
//!   └─ loop
//!        ├─ stream_generate(history)      → Thought / Text / ToolCall fragments
//!        ├─ no function calls             → done
//!        └─ function calls                → ToolInvoker::call_tool (in order)
//!                                           → append responses, re-query
//! ```
//!
//! History lives in memory for the life of the runtime. A turn that fails is
//! rolled back so the next send starts from the last good exchange.

use super::client::{GenerateContentApi, HttpGenerateContentApi};
use super::protocol::{
    Content, FunctionCall, FunctionDeclaration, FunctionResponse, GenerateContentRequest,
    GenerationConfig, Part, ThinkingConfig, Tool,
};
use crate::tools::JsonSchemaToolConverter;
use async_trait::async_trait;
use futures::StreamExt;
use mapchat_application::ports::model_runtime::{
    FragmentItem, FragmentStream, ModelRuntime, RuntimeError,
};
use mapchat_application::ports::tool_invoker::ToolInvoker;
use mapchat_domain::{Fragment, ToolCall};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, info, warn};

/// Capacity of the fragment channel between producer task and consumer.
const FRAGMENT_BUFFER: usize = 64;

/// Settings for [`GeminiRuntime`]
#[derive(Debug, Clone, PartialEq)]
pub struct GeminiSettings {
    pub model: String,
    pub base_url: String,
    pub include_thoughts: bool,
    /// Upper bound on tool invocations within a single send.
    pub max_remote_calls: usize,
    pub system_instruction: Option<String>,
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            include_thoughts: true,
            max_remote_calls: 10,
            system_instruction: None,
        }
    }
}

/// Model runtime backed by the `streamGenerateContent` API.
pub struct GeminiRuntime {
    api: Arc<dyn GenerateContentApi>,
    invoker: Arc<dyn ToolInvoker>,
    settings: GeminiSettings,
    history: Arc<Mutex<Vec<Content>>>,
}

impl GeminiRuntime {
    /// Create a runtime that talks HTTPS to the configured endpoint.
    pub fn connect(
        settings: GeminiSettings,
        api_key: impl Into<String>,
        invoker: Arc<dyn ToolInvoker>,
    ) -> Result<Self, RuntimeError> {
        let api = HttpGenerateContentApi::new(&settings.base_url, &settings.model, api_key)?;
        info!(model = %settings.model, endpoint = %api.endpoint(), "Model runtime ready");
        Ok(Self::with_api(Arc::new(api), settings, invoker))
    }

    pub fn with_api(
        api: Arc<dyn GenerateContentApi>,
        settings: GeminiSettings,
        invoker: Arc<dyn ToolInvoker>,
    ) -> Self {
        Self {
            api,
            invoker,
            settings,
            history: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn settings(&self) -> &GeminiSettings {
        &self.settings
    }

    /// Snapshot of the in-memory conversation history.
    pub async fn history(&self) -> Vec<Content> {
        self.history.lock().await.clone()
    }
}

#[async_trait]
impl ModelRuntime for GeminiRuntime {
    async fn send_message_stream(&self, message: &str) -> Result<FragmentStream, RuntimeError> {
        let (tx, rx) = mpsc::channel(FRAGMENT_BUFFER);

        let turn = Turn {
            api: Arc::clone(&self.api),
            invoker: Arc::clone(&self.invoker),
            settings: self.settings.clone(),
            tx,
        };
        let history = Arc::clone(&self.history);
        let message = message.to_string();

        tokio::spawn(async move {
            let mut history = history.lock_owned().await;
            turn.run(&mut history, message).await;
        });

        Ok(FragmentStream::new(rx))
    }
}

/// Everything one producer task needs.
struct Turn {
    api: Arc<dyn GenerateContentApi>,
    invoker: Arc<dyn ToolInvoker>,
    settings: GeminiSettings,
    tx: mpsc::Sender<FragmentItem>,
}

/// The consumer dropped its stream.
struct Abandoned;

impl Turn {
    async fn run(self, history: &mut Vec<Content>, message: String) {
        let checkpoint = history.len();
        history.push(Content::user(vec![Part::text(message)]));

        match self.exchange(history).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                warn!(error = %e, "Model turn failed, rolling back history");
                history.truncate(checkpoint);
                let _ = self.tx.send(Err(e)).await;
            }
            Err(Abandoned) => {
                debug!("Fragment stream dropped, rolling back history");
                history.truncate(checkpoint);
            }
        }
    }

    /// Query the model until it answers without function calls.
    async fn exchange(
        &self,
        history: &mut Vec<Content>,
    ) -> Result<Result<(), RuntimeError>, Abandoned> {
        let tools = self.declarations();
        let mut remote_calls = 0usize;

        loop {
            let request = self.request(history, &tools);
            let mut chunks = match self.api.stream_generate(&request).await {
                Ok(chunks) => chunks,
                Err(e) => return Ok(Err(e)),
            };

            let mut model_parts: Vec<Part> = Vec::new();
            let mut calls: Vec<FunctionCall> = Vec::new();

            while let Some(chunk) = chunks.next().await {
                let chunk = match chunk {
                    Ok(chunk) => chunk,
                    Err(e) => return Ok(Err(e)),
                };

                for part in chunk.parts() {
                    if let Some(fragment) = fragment_for(part) {
                        self.emit(fragment).await?;
                    }
                    if let Some(call) = &part.function_call {
                        calls.push(call.clone());
                    }
                    push_part(&mut model_parts, part.clone());
                }
            }

            if !model_parts.is_empty() {
                history.push(Content::model(model_parts));
            }

            if calls.is_empty() {
                return Ok(Ok(()));
            }

            let first_call = remote_calls;
            remote_calls += calls.len();
            if remote_calls > self.settings.max_remote_calls {
                return Ok(Err(RuntimeError::TooManyRemoteCalls(
                    self.settings.max_remote_calls,
                )));
            }

            let mut responses = Vec::with_capacity(calls.len());
            for (index, call) in calls.into_iter().enumerate() {
                self.emit(Fragment::tool_call(call.name.clone(), call.args.clone()))
                    .await?;
                responses.push(self.invoke(call, first_call + index + 1).await);
            }
            history.push(Content::user(responses));
        }
    }

    async fn invoke(&self, call: FunctionCall, sequence: usize) -> Part {
        let call_id = call
            .id
            .clone()
            .unwrap_or_else(|| format!("call-{}", sequence));
        let tool_call = ToolCall::new(call_id.as_str(), call.name.clone())
            .with_json_args(call.args.clone());

        debug!(tool = %call.name, call_id = %call_id, "Invoking tool");
        let result = self.invoker.call_tool(tool_call).await;

        let response = if result.is_success() {
            serde_json::json!({ "result": result.text_for_model() })
        } else {
            serde_json::json!({ "error": result.text_for_model() })
        };

        Part::function_response(FunctionResponse {
            id: call.id,
            name: call.name,
            response,
        })
    }

    async fn emit(&self, fragment: Fragment) -> Result<(), Abandoned> {
        self.tx.send(Ok(fragment)).await.map_err(|_| Abandoned)
    }

    fn declarations(&self) -> Vec<Tool> {
        let spec = self.invoker.tool_spec();
        if spec.is_empty() {
            return Vec::new();
        }
        let function_declarations = JsonSchemaToolConverter
            .sorted_tools(spec)
            .into_iter()
            .map(FunctionDeclaration::from_definition)
            .collect();
        vec![Tool {
            function_declarations,
        }]
    }

    fn request(&self, history: &[Content], tools: &[Tool]) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: history.to_vec(),
            system_instruction: self
                .settings
                .system_instruction
                .as_deref()
                .filter(|s| !s.trim().is_empty())
                .map(Content::instruction),
            tools: tools.to_vec(),
            generation_config: self.settings.include_thoughts.then(|| GenerationConfig {
                thinking_config: Some(ThinkingConfig {
                    include_thoughts: true,
                }),
            }),
        }
    }
}

/// The user-facing fragment for one response part, if any.
/// Display fragment for a streamed part. Function calls are announced when
/// they are dispatched, not here.
fn fragment_for(part: &Part) -> Option<Fragment> {
    match &part.text {
        Some(text) if text.is_empty() => None,
        Some(text) if part.thought => Some(Fragment::Thought(text.clone())),
        Some(text) => Some(Fragment::Text(text.clone())),
        None => None,
    }
}

fn push_part(parts: &mut Vec<Part>, part: Part) {
    let leftover = match parts.last_mut() {
        Some(last) => last.merge(part),
        None => Some(part),
    };
    if let Some(part) = leftover {
        parts.push(part);
    }
}
