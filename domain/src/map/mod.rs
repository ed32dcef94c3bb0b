//! Map domain module
//!
//! The closed set of map tools the assistant may call ([`MapTool`]) and the
//! resolved intent each call produces ([`MapAction`]).
//!
//! ```text
//! ToolCall("view_location_google_maps", {query})          → MapAction::ViewLocation
//! ToolCall("directions_on_google_maps", {origin, destination}) → MapAction::Directions
//! ```

pub mod action;
pub mod tools;

pub use action::MapAction;
pub use tools::MapTool;
