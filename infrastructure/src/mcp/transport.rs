//! In-process transport pair.
//!
//! [`create_linked_pair`] returns two [`Endpoint`]s joined back to back: a
//! message sent on one arrives, in order, on the other. Messages are moved,
//! never serialized.
//!
//! Each endpoint can be [`split`](Endpoint::split) so a background reader
//! task owns the receiving half exclusively while any number of writers share
//! the sending half.

use super::protocol::JsonRpcMessage;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::trace;

/// Errors that can occur on a transport endpoint
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Transport closed")]
    Closed,
}

/// Create two linked endpoints.
pub fn create_linked_pair() -> (Endpoint, Endpoint) {
    let (a_tx, b_rx) = mpsc::unbounded_channel();
    let (b_tx, a_rx) = mpsc::unbounded_channel();

    (
        Endpoint {
            sender: EndpointSender { tx: a_tx },
            receiver: EndpointReceiver { rx: a_rx },
        },
        Endpoint {
            sender: EndpointSender { tx: b_tx },
            receiver: EndpointReceiver { rx: b_rx },
        },
    )
}

/// One side of a linked pair.
pub struct Endpoint {
    sender: EndpointSender,
    receiver: EndpointReceiver,
}

impl Endpoint {
    /// Deliver a message to the peer.
    ///
    /// Fails with [`TransportError::Closed`] once the peer is dropped.
    pub fn send(&self, message: impl Into<JsonRpcMessage>) -> Result<(), TransportError> {
        self.sender.send(message)
    }

    /// Receive the next message from the peer, or `None` once the peer is
    /// dropped and every queued message has been read.
    pub async fn recv(&mut self) -> Option<JsonRpcMessage> {
        self.receiver.recv().await
    }

    pub fn split(self) -> (EndpointSender, EndpointReceiver) {
        (self.sender, self.receiver)
    }
}

/// Sending half of an [`Endpoint`].
#[derive(Clone)]
pub struct EndpointSender {
    tx: mpsc::UnboundedSender<JsonRpcMessage>,
}

impl EndpointSender {
    pub fn send(&self, message: impl Into<JsonRpcMessage>) -> Result<(), TransportError> {
        let message = message.into();
        trace!(method = ?message.method(), "Transport send");
        self.tx.send(message).map_err(|_| TransportError::Closed)
    }
}

/// Receiving half of an [`Endpoint`].
pub struct EndpointReceiver {
    rx: mpsc::UnboundedReceiver<JsonRpcMessage>,
}

impl EndpointReceiver {
    pub async fn recv(&mut self) -> Option<JsonRpcMessage> {
        self.rx.recv().await
    }
}
