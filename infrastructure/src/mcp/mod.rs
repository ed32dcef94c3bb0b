//! In-process tool protocol bridge.
//!
//! ```text
//! McpClient ──(Endpoint)══(Endpoint)── McpServer ── ToolDispatcher ── MapQueryListener
//! ```
//!
//! - [`protocol`]: JSON-RPC message and payload types
//! - [`transport`]: the linked endpoint pair
//! - [`server`]: answers `initialize`, `tools/list` and `tools/call`
//! - [`client`]: handshake, tool cache and call correlation; implements
//!   [`ToolInvoker`](mapchat_application::ToolInvoker)

pub mod client;
pub mod error;
pub mod protocol;
pub mod server;
pub mod transport;

pub use client::McpClient;
pub use error::McpError;
pub use server::McpServer;
pub use transport::{Endpoint, TransportError, create_linked_pair};
