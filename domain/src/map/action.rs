//! Resolved map intents.

use serde::{Deserialize, Serialize};

/// One resolved map intent, handed to the map view.
///
/// Serializes to the notification shapes `{"location": ...}` and
/// `{"origin": ..., "destination": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MapAction {
    /// Show a route between two places.
    Directions { origin: String, destination: String },
    /// Move the camera to a place.
    ViewLocation { location: String },
}

impl MapAction {
    pub fn view_location(location: impl Into<String>) -> Self {
        MapAction::ViewLocation {
            location: location.into(),
        }
    }

    pub fn directions(origin: impl Into<String>, destination: impl Into<String>) -> Self {
        MapAction::Directions {
            origin: origin.into(),
            destination: destination.into(),
        }
    }

    /// Acknowledgement payload returned to the model once the action is issued.
    pub fn acknowledgement(&self) -> String {
        match self {
            MapAction::ViewLocation { location } => format!("Navigating to: {}", location),
            MapAction::Directions {
                origin,
                destination,
            } => format!("Navigating from {} to {}", origin, destination),
        }
    }
}

impl std::fmt::Display for MapAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MapAction::ViewLocation { location } => write!(f, "location '{}'", location),
            MapAction::Directions {
                origin,
                destination,
            } => write!(f, "directions '{}' -> '{}'", origin, destination),
        }
    }
}
