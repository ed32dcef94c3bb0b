//! The closed set of map tools.

use super::action::MapAction;
use crate::core::error::DomainError;
use crate::tool::entities::{ToolCall, ToolDefinition, ToolParameter};
use crate::tool::value_objects::ToolError;
use std::str::FromStr;

/// A map tool the assistant may call.
///
/// Tool handler dispatch is a lookup from the wire name to one of these
/// variants; [`MapTool::ALL`] lets registration be checked for exhaustiveness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapTool {
    /// Show a place on the map (`query`).
    ViewLocation,
    /// Show a route (`origin`, `destination`).
    Directions,
}

impl MapTool {
    pub const ALL: [MapTool; 2] = [MapTool::ViewLocation, MapTool::Directions];

    pub const VIEW_LOCATION: &'static str = "view_location_google_maps";
    pub const DIRECTIONS: &'static str = "directions_on_google_maps";

    /// Wire name advertised to the model.
    pub fn name(&self) -> &'static str {
        match self {
            MapTool::ViewLocation => Self::VIEW_LOCATION,
            MapTool::Directions => Self::DIRECTIONS,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tool| tool.name() == name)
    }

    /// Tool definition registered at startup.
    pub fn definition(&self) -> ToolDefinition {
        match self {
            MapTool::ViewLocation => ToolDefinition::new(
                Self::VIEW_LOCATION,
                "View a specific place or geographical location and display it in the embedded map.",
            )
            .with_parameter(ToolParameter::new(
                "query",
                "The place to show, e.g. a city, landmark or address",
                true,
            )),
            MapTool::Directions => ToolDefinition::new(
                Self::DIRECTIONS,
                "Show directions from an origin to a destination on the embedded map.",
            )
            .with_parameter(ToolParameter::new("origin", "Where the route starts", true))
            .with_parameter(ToolParameter::new("destination", "Where the route ends", true)),
        }
    }

    /// Build the map intent for a validated call.
    ///
    /// Re-checks the string arguments so a call that skipped validation still
    /// yields a structured error naming the field.
    pub fn resolve(&self, call: &ToolCall) -> Result<MapAction, ToolError> {
        let require = |field: &str| {
            call.get_string(field)
                .map(str::to_string)
                .ok_or_else(|| ToolError::missing_argument(field))
        };

        match self {
            MapTool::ViewLocation => Ok(MapAction::ViewLocation {
                location: require("query")?,
            }),
            MapTool::Directions => Ok(MapAction::Directions {
                origin: require("origin")?,
                destination: require("destination")?,
            }),
        }
    }
}

impl FromStr for MapTool {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| DomainError::UnknownMapTool(s.to_string()))
    }
}

impl std::fmt::Display for MapTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
