//! HTTP client for the `streamGenerateContent` endpoint.

use super::protocol::{GenerateContentRequest, GenerateContentResponse};
use super::stream::{decode_sse, error_summary};
use async_trait::async_trait;
use futures::StreamExt;
use futures::stream::BoxStream;
use mapchat_application::ports::model_runtime::RuntimeError;
use tracing::{debug, trace};
use url::Url;

/// Stream of parsed response chunks for one request.
pub type ChunkStream = BoxStream<'static, Result<GenerateContentResponse, RuntimeError>>;

/// One streamed generation request.
///
/// The runtime's function-calling loop issues one of these per model turn.
#[async_trait]
pub trait GenerateContentApi: Send + Sync {
    async fn stream_generate(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<ChunkStream, RuntimeError>;
}

/// `reqwest`-backed implementation.
pub struct HttpGenerateContentApi {
    client: reqwest::Client,
    endpoint: Url,
    api_key: String,
}

impl HttpGenerateContentApi {
    pub fn new(
        base_url: &str,
        model: &str,
        api_key: impl Into<String>,
    ) -> Result<Self, RuntimeError> {
        Ok(Self {
            client: reqwest::Client::new(),
            endpoint: stream_endpoint(base_url, model)?,
            api_key: api_key.into(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

/// `{base}/v1beta/models/{model}:streamGenerateContent?alt=sse`
pub fn stream_endpoint(base_url: &str, model: &str) -> Result<Url, RuntimeError> {
    let invalid = |reason: String| {
        RuntimeError::Connection(format!("invalid base URL '{}': {}", base_url, reason))
    };

    let method = format!("{}:streamGenerateContent", model);
    let mut url = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| invalid("cannot be a base".to_string()))?
        .pop_if_empty()
        .extend(["v1beta", "models", method.as_str()]);
    url.query_pairs_mut().append_pair("alt", "sse");
    Ok(url)
}

#[async_trait]
impl GenerateContentApi for HttpGenerateContentApi {
    async fn stream_generate(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<ChunkStream, RuntimeError> {
        debug!(
            endpoint = %self.endpoint,
            turns = request.contents.len(),
            "Streaming generate request"
        );
        trace!(
            "Request body: {}",
            serde_json::to_string(request).unwrap_or_default()
        );

        let response = self
            .client
            .post(self.endpoint.clone())
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| RuntimeError::Connection(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<no body>".to_string());
            return Err(RuntimeError::Http {
                status: status.as_u16(),
                message: error_summary(&body),
            });
        }

        Ok(decode_sse(response.bytes_stream()).boxed())
    }
}
