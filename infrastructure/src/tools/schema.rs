//! JSON Schema tool converter.
//!
//! Converts [`ToolDefinition`]s to the JSON Schema `inputSchema` advertised in
//! `tools/list`, and back again on the client side.

use mapchat_domain::{ToolDefinition, ToolParameter, ToolSpec};

/// Converts between tool definitions and provider-neutral JSON Schema.
///
/// Handles param_type → JSON Schema type mapping:
/// - `"string"` → `"string"`
/// - `"number"` → `"number"`
/// - `"integer"` → `"integer"`
/// - `"boolean"` → `"boolean"`
/// - anything else → `"string"`
pub struct JsonSchemaToolConverter;

impl JsonSchemaToolConverter {
    /// Object schema describing the tool's parameters.
    pub fn input_schema(&self, tool: &ToolDefinition) -> serde_json::Value {
        let mut properties = serde_json::Map::new();
        let mut required = Vec::new();

        for param in &tool.parameters {
            let schema_type = match param.param_type.as_str() {
                "number" => "number",
                "integer" => "integer",
                "boolean" => "boolean",
                _ => "string",
            };

            properties.insert(
                param.name.clone(),
                serde_json::json!({
                    "type": schema_type,
                    "description": param.description,
                }),
            );

            if param.required {
                required.push(serde_json::json!(param.name));
            }
        }

        serde_json::json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }

    /// Rebuild a definition from an advertised schema.
    ///
    /// A property with no `type` is treated as a string.
    pub fn definition_from_schema(
        &self,
        name: &str,
        description: &str,
        schema: &serde_json::Value,
    ) -> ToolDefinition {
        let required: Vec<&str> = schema
            .get("required")
            .and_then(|r| r.as_array())
            .map(|r| r.iter().filter_map(|v| v.as_str()).collect())
            .unwrap_or_default();

        let mut definition = ToolDefinition::new(name, description);
        if let Some(properties) = schema.get("properties").and_then(|p| p.as_object()) {
            for (param_name, prop) in properties {
                let param_type = prop.get("type").and_then(|t| t.as_str()).unwrap_or("string");
                let param_description = prop
                    .get("description")
                    .and_then(|d| d.as_str())
                    .unwrap_or_default();
                definition = definition.with_parameter(
                    ToolParameter::new(
                        param_name.as_str(),
                        param_description,
                        required.contains(&param_name.as_str()),
                    )
                    .with_type(param_type),
                );
            }
        }
        definition
    }

    /// All tools, sorted by name.
    pub fn sorted_tools<'a>(&self, spec: &'a ToolSpec) -> Vec<&'a ToolDefinition> {
        let mut tools: Vec<&ToolDefinition> = spec.all().collect();
        tools.sort_by_key(|t| &t.name);
        tools
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mapchat_domain::MapTool;

    #[test]
    fn test_input_schema() {
        let converter = JsonSchemaToolConverter;
        let tool = ToolDefinition::new("route", "Plan a route")
            .with_parameter(ToolParameter::new("origin", "Start", true))
            .with_parameter(ToolParameter::new("stops", "Max stops", false).with_type("integer"));

        let schema = converter.input_schema(&tool);

        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"]["origin"]["type"], "string");
        assert_eq!(schema["properties"]["origin"]["description"], "Start");
        assert_eq!(schema["properties"]["stops"]["type"], "integer");

        let required = schema["required"].as_array().unwrap();
        assert_eq!(required.len(), 1);
        assert_eq!(required[0], "origin");
    }

    #[test]
    fn test_definition_from_schema_keeps_required_flags() {
        let converter = JsonSchemaToolConverter;
        let original = MapTool::Directions.definition();
        let schema = converter.input_schema(&original);

        let rebuilt =
            converter.definition_from_schema(&original.name, &original.description, &schema);

        assert_eq!(rebuilt.name, "directions_on_google_maps");
        assert!(rebuilt.parameter("origin").unwrap().required);
        assert!(rebuilt.parameter("destination").unwrap().required);
        assert_eq!(rebuilt.parameter("origin").unwrap().param_type, "string");
    }

    #[test]
    fn test_definition_from_schema_without_properties() {
        let rebuilt = JsonSchemaToolConverter.definition_from_schema(
            "ping",
            "No arguments",
            &serde_json::json!({"type": "object"}),
        );
        assert!(rebuilt.parameters.is_empty());
    }

    #[test]
    fn test_sorted_tools() {
        let spec = ToolSpec::new()
            .register(MapTool::ViewLocation.definition())
            .register(MapTool::Directions.definition());

        let names: Vec<_> = JsonSchemaToolConverter
            .sorted_tools(&spec)
            .into_iter()
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(
            names,
            vec!["directions_on_google_maps", "view_location_google_maps"]
        );
    }
}
