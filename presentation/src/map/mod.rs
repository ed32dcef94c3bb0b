//! Map rendering
//!
//! [`MapRenderer`] is the production [`MapQueryListener`](mapchat_application::MapQueryListener);
//! [`MapScene`] holds what the map currently shows.

mod renderer;
mod scene;

pub use renderer::MapRenderer;
pub use scene::{Camera, MapScene, Marker, Route, directions_link, place_link};
