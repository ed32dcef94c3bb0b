//! Model runtime port
//!
//! Defines how the chat session talks to a language-model provider. The
//! runtime owns conversation history and any automatic function calling; the
//! caller only sees the resulting [`Fragment`] stream.

use async_trait::async_trait;
use futures::Stream;
use mapchat_domain::Fragment;
use std::pin::Pin;
use std::task::{Context, Poll};
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors that can occur while producing a streamed response
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Too many remote calls (limit {0})")]
    TooManyRemoteCalls(usize),

    #[error("Stream closed")]
    StreamClosed,
}

/// Item carried by a [`FragmentStream`].
pub type FragmentItem = Result<Fragment, RuntimeError>;

/// Handle for receiving the fragments of one streamed response.
///
/// Wraps an `mpsc::Receiver` fed by the runtime's producer task. The stream
/// ends when the producer drops its sender.
pub struct FragmentStream {
    receiver: mpsc::Receiver<FragmentItem>,
}

impl FragmentStream {
    pub fn new(receiver: mpsc::Receiver<FragmentItem>) -> Self {
        Self { receiver }
    }

    /// Build an already-complete stream from a list of items.
    #[cfg(test)]
    pub(crate) fn from_items(items: Vec<FragmentItem>) -> Self {
        let (tx, rx) = mpsc::channel(items.len().max(1));
        for item in items {
            // Capacity covers every item, so this never fails.
            let _ = tx.try_send(item);
        }
        Self::new(rx)
    }
}

impl Stream for FragmentStream {
    type Item = FragmentItem;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}

/// Streaming language-model runtime
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait ModelRuntime: Send + Sync {
    /// Send a user message and stream back the response fragments.
    ///
    /// Errors returned here mean the request could not be started; errors
    /// after that arrive as `Err` items in the stream.
    async fn send_message_stream(&self, message: &str) -> Result<FragmentStream, RuntimeError>;
}
