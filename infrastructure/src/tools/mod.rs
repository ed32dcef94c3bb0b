//! Map tool registry and dispatch
//!
//! - [`map_tool_spec`] builds the immutable registry at startup
//! - [`ToolDispatcher`] validates calls and forwards map actions to the UI
//! - [`JsonSchemaToolConverter`] turns definitions into advertised schemas

mod dispatcher;
mod schema;

pub use dispatcher::{DispatcherError, ToolDispatcher};
pub use schema::JsonSchemaToolConverter;

use mapchat_domain::{MapTool, ToolSpec};

/// Create the tool specification with every map tool.
pub fn map_tool_spec() -> ToolSpec {
    MapTool::ALL.iter().map(MapTool::definition).collect()
}
