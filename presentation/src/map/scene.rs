//! Map scene state: camera, markers and route.
//!
//! A location action replaces the scene with a single marker; a directions
//! action replaces it with origin/destination markers and a route line.

use mapchat_domain::MapAction;
use url::Url;

const SEARCH_URL: &str = "https://www.google.com/maps/search/";
const DIRECTIONS_URL: &str = "https://www.google.com/maps/dir/";

/// Where the camera points
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Camera {
    /// Default world view before any action
    World,
    /// Centered on a place
    Place(String),
    /// Framing a route
    Route { origin: String, destination: String },
}

/// A pin on the map
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    pub label: char,
    pub place: String,
}

/// A route polyline between two places
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub origin: String,
    pub destination: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapScene {
    pub camera: Camera,
    pub markers: Vec<Marker>,
    pub route: Option<Route>,
    /// Number of actions applied so far
    pub revision: u64,
}

impl Default for MapScene {
    fn default() -> Self {
        Self {
            camera: Camera::World,
            markers: Vec::new(),
            route: None,
            revision: 0,
        }
    }
}

impl MapScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the scene contents with the given action.
    pub fn apply(&mut self, action: &MapAction) {
        match action {
            MapAction::ViewLocation { location } => {
                self.camera = Camera::Place(location.clone());
                self.markers = vec![Marker {
                    label: 'A',
                    place: location.clone(),
                }];
                self.route = None;
            }
            MapAction::Directions {
                origin,
                destination,
            } => {
                self.camera = Camera::Route {
                    origin: origin.clone(),
                    destination: destination.clone(),
                };
                self.markers = vec![
                    Marker {
                        label: 'A',
                        place: origin.clone(),
                    },
                    Marker {
                        label: 'B',
                        place: destination.clone(),
                    },
                ];
                self.route = Some(Route {
                    origin: origin.clone(),
                    destination: destination.clone(),
                });
            }
        }
        self.revision += 1;
    }

    /// Shareable link for the current view.
    pub fn link(&self) -> Option<Url> {
        match &self.camera {
            Camera::World => None,
            Camera::Place(place) => place_link(place),
            Camera::Route {
                origin,
                destination,
            } => directions_link(origin, destination),
        }
    }

    /// One-line description of the current view.
    pub fn describe(&self) -> String {
        match &self.camera {
            Camera::World => "World view (no place selected yet)".to_string(),
            Camera::Place(place) => format!("Showing {}", place),
            Camera::Route {
                origin,
                destination,
            } => format!("Route from {} to {}", origin, destination),
        }
    }
}

/// Google Maps search link for a place.
pub fn place_link(place: &str) -> Option<Url> {
    Url::parse_with_params(SEARCH_URL, &[("api", "1"), ("query", place)]).ok()
}

/// Google Maps directions link between two places.
pub fn directions_link(origin: &str, destination: &str) -> Option<Url> {
    Url::parse_with_params(
        DIRECTIONS_URL,
        &[("api", "1"), ("origin", origin), ("destination", destination)],
    )
    .ok()
}
