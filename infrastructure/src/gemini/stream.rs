//! Server-sent events decoding for streamed responses.
//!
//! The API answers `?alt=sse` requests with `data: {json}` events. Framing is
//! left to `eventsource-stream`; this module only turns event payloads into
//! [`GenerateContentResponse`] chunks.

use super::protocol::GenerateContentResponse;
use eventsource_stream::{EventStreamError, Eventsource};
use futures::{Stream, StreamExt};
use mapchat_application::ports::model_runtime::RuntimeError;
use std::fmt::Display;
use tracing::trace;

/// Parse one `data` payload.
///
/// A payload carrying an `error` object becomes [`RuntimeError::Provider`].
pub fn parse_chunk(payload: &str) -> Result<GenerateContentResponse, RuntimeError> {
    let chunk: GenerateContentResponse = serde_json::from_str(payload)
        .map_err(|e| RuntimeError::InvalidResponse(format!("{}: {}", e, payload)))?;
    match &chunk.error {
        Some(error) => Err(RuntimeError::Provider(error.message.clone())),
        None => Ok(chunk),
    }
}

/// Pull a one-line summary out of an error body.
///
/// Looks for `error.message`, then a string `error`, then `message`; falls
/// back to the trimmed body.
pub fn error_summary(body: &str) -> String {
    let trimmed = body.trim();
    let summary = serde_json::from_str::<serde_json::Value>(trimmed)
        .ok()
        .and_then(|value| {
            value
                .pointer("/error/message")
                .and_then(|v| v.as_str())
                .or_else(|| value.get("error").and_then(|v| v.as_str()))
                .or_else(|| value.get("message").and_then(|v| v.as_str()))
                .map(str::to_owned)
        });

    match summary {
        Some(text) => text.split_whitespace().collect::<Vec<_>>().join(" "),
        None if trimmed.is_empty() => "<empty>".to_string(),
        None => trimmed.to_string(),
    }
}

fn stream_error<E: Display>(error: EventStreamError<E>) -> RuntimeError {
    match error {
        EventStreamError::Transport(e) => RuntimeError::Connection(e.to_string()),
        other => RuntimeError::InvalidResponse(other.to_string()),
    }
}

/// Decode a byte stream into response chunks.
///
/// The first stream error is yielded once and ends the stream.
pub fn decode_sse<S, B, E>(
    bytes: S,
) -> impl Stream<Item = Result<GenerateContentResponse, RuntimeError>> + Send + 'static
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Display + Send + 'static,
{
    let events = Box::pin(bytes.eventsource());

    futures::stream::unfold(Some(events), |events| async move {
        let mut events = events?;
        loop {
            match events.next().await? {
                Ok(event) if event.data.trim().is_empty() => {
                    trace!(event = %event.event, "SSE: skipping event without data");
                }
                Ok(event) => return Some((parse_chunk(&event.data), Some(events))),
                Err(e) => return Some((Err(stream_error(e)), None)),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_chunk(text: &str) -> String {
        format!(
            "data: {{\"candidates\":[{{\"content\":{{\"role\":\"model\",\"parts\":[{{\"text\":\"{}\"}}]}}}}]}}\r\n\r\n",
            text
        )
    }

    fn texts(chunks: &[Result<GenerateContentResponse, RuntimeError>]) -> Vec<String> {
        chunks
            .iter()
            .map(|chunk| {
                chunk.as_ref().unwrap().parts()[0]
                    .text
                    .clone()
                    .unwrap_or_default()
            })
            .collect()
    }

    #[test]
    fn parse_chunk_surfaces_provider_error() {
        let err = parse_chunk(r#"{"error":{"code":429,"message":"Resource exhausted"}}"#)
            .unwrap_err();
        assert_eq!(err, RuntimeError::Provider("Resource exhausted".to_string()));
    }

    #[test]
    fn parse_chunk_rejects_garbage() {
        assert!(matches!(
            parse_chunk("not json"),
            Err(RuntimeError::InvalidResponse(_))
        ));
    }

    #[test]
    fn error_summary_prefers_nested_message() {
        let body = r#"{"error":{"code":400,"message":"API key not valid.\n Please pass a valid key.","status":"INVALID_ARGUMENT"}}"#;
        assert_eq!(
            error_summary(body),
            "API key not valid. Please pass a valid key."
        );
        assert_eq!(error_summary("<html>502</html>"), "<html>502</html>");
        assert_eq!(error_summary("  "), "<empty>");
    }

    #[tokio::test]
    async fn decode_sse_yields_chunks_in_order() {
        let body = format!("{}{}", text_chunk("Hello"), text_chunk(" there"));
        let (first, second) = body.split_at(30);
        let bytes = futures::stream::iter(vec![
            Ok::<_, std::io::Error>(first.as_bytes().to_vec()),
            Ok(second.as_bytes().to_vec()),
        ]);

        let chunks: Vec<_> = decode_sse(bytes).collect().await;

        assert_eq!(texts(&chunks), vec!["Hello", " there"]);
    }

    #[tokio::test]
    async fn decode_sse_reassembles_events_split_across_many_chunks() {
        let body = format!(
            ": keep-alive\n\n{}{}{}",
            text_chunk("one"),
            text_chunk("two"),
            text_chunk("three")
        );
        // Seven-byte slices cut through field names, payloads and separators.
        let pieces: Vec<Result<Vec<u8>, std::io::Error>> = body
            .as_bytes()
            .chunks(7)
            .map(|piece| Ok(piece.to_vec()))
            .collect();

        let chunks: Vec<_> = decode_sse(futures::stream::iter(pieces)).collect().await;

        assert_eq!(texts(&chunks), vec!["one", "two", "three"]);
    }

    #[tokio::test]
    async fn decode_sse_joins_multi_line_data() {
        let body = "data: {\"candidates\":[{\"content\":\ndata: {\"parts\":[{\"text\":\"joined\"}]}}]}\n\n";
        let bytes = futures::stream::iter(vec![Ok::<_, std::io::Error>(body.as_bytes().to_vec())]);

        let chunks: Vec<_> = decode_sse(bytes).collect().await;

        assert_eq!(texts(&chunks), vec!["joined"]);
    }

    #[tokio::test]
    async fn decode_sse_reports_transport_error_once() {
        let bytes = futures::stream::iter(vec![
            Ok(text_chunk("partial").into_bytes()),
            Err("connection reset"),
            Ok(text_chunk("never").into_bytes()),
        ]);

        let chunks: Vec<_> = decode_sse(bytes).collect().await;

        assert_eq!(chunks.len(), 2);
        assert!(chunks[0].is_ok());
        assert_eq!(
            chunks[1],
            Err(RuntimeError::Connection("connection reset".to_string()))
        );
    }
}
