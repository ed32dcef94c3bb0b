//! Map query listener port
//!
//! Entry point through which resolved map intents reach the UI.

use mapchat_domain::MapAction;

/// Receives map intents, fire-and-forget.
///
/// Called from the dispatcher task; implementations must not block. Actions
/// arrive in tool-dispatch order.
pub trait MapQueryListener: Send + Sync {
    fn on_map_query(&self, action: MapAction);
}
