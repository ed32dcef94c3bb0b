//! Request and response types for the `streamGenerateContent` API.

use mapchat_domain::ToolDefinition;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request body for `streamGenerateContent`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<Tool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

/// One turn of conversation history
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    pub fn user(parts: Vec<Part>) -> Self {
        Self {
            role: Some("user".to_string()),
            parts,
        }
    }

    pub fn model(parts: Vec<Part>) -> Self {
        Self {
            role: Some("model".to_string()),
            parts,
        }
    }

    /// System instruction content (no role).
    pub fn instruction(text: impl Into<String>) -> Self {
        Self {
            role: None,
            parts: vec![Part::text(text)],
        }
    }
}

/// One part of a content turn
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Set on parts that carry the model's reasoning rather than its answer.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub thought: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thought_signature: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_call: Option<FunctionCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_response: Option<FunctionResponse>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn function_response(response: FunctionResponse) -> Self {
        Self {
            function_response: Some(response),
            ..Default::default()
        }
    }

    /// Plain text part that can absorb a following chunk of the same kind.
    fn is_mergeable_text(&self) -> bool {
        self.text.is_some()
            && self.function_call.is_none()
            && self.function_response.is_none()
            && self.thought_signature.is_none()
    }

    /// Append `next` to this part if both are streamed text of the same kind.
    ///
    /// Returns `next` back when it cannot be merged.
    pub fn merge(&mut self, next: Part) -> Option<Part> {
        if self.is_mergeable_text() && next.is_mergeable_text() && self.thought == next.thought {
            if let (Some(text), Some(more)) = (self.text.as_mut(), next.text) {
                text.push_str(&more);
            }
            None
        } else {
            Some(next)
        }
    }
}

/// A function call requested by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub args: Value,
}

/// The result of a function call, returned to the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub response: Value,
}

/// Tool block carrying function declarations
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    pub function_declarations: Vec<FunctionDeclaration>,
}

/// One callable function, described in the API's schema dialect
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionDeclaration {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

impl FunctionDeclaration {
    /// Build a declaration from a tool definition.
    ///
    /// Schema types use the API's upper-case names (`OBJECT`, `STRING`, ...).
    pub fn from_definition(tool: &ToolDefinition) -> Self {
        let mut properties = serde_json::Map::new();
        let mut required = Vec::new();

        for param in &tool.parameters {
            let schema_type = match param.param_type.as_str() {
                "number" => "NUMBER",
                "integer" => "INTEGER",
                "boolean" => "BOOLEAN",
                _ => "STRING",
            };
            properties.insert(
                param.name.clone(),
                serde_json::json!({ "type": schema_type, "description": param.description }),
            );
            if param.required {
                required.push(Value::String(param.name.clone()));
            }
        }

        Self {
            name: tool.name.clone(),
            description: tool.description.clone(),
            parameters: serde_json::json!({
                "type": "OBJECT",
                "properties": properties,
                "required": required,
            }),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thinking_config: Option<ThinkingConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThinkingConfig {
    pub include_thoughts: bool,
}

/// One streamed response chunk
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub error: Option<ApiError>,
}

impl GenerateContentResponse {
    /// Parts of the first candidate, in order.
    pub fn parts(&self) -> &[Part] {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| c.parts.as_slice())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Error object returned by the API
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub code: Option<u16>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mapchat_domain::MapTool;

    #[test]
    fn request_serializes_in_camel_case() {
        let request = GenerateContentRequest {
            contents: vec![Content::user(vec![Part::text("Show me Paris")])],
            system_instruction: Some(Content::instruction("You are a map guide.")),
            tools: vec![Tool {
                function_declarations: vec![FunctionDeclaration::from_definition(
                    &MapTool::ViewLocation.definition(),
                )],
            }],
            generation_config: Some(GenerationConfig {
                thinking_config: Some(ThinkingConfig {
                    include_thoughts: true,
                }),
            }),
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "Show me Paris");
        assert!(json["contents"][0]["parts"][0].get("thought").is_none());
        assert_eq!(json["systemInstruction"]["parts"][0]["text"], "You are a map guide.");
        assert_eq!(
            json["tools"][0]["functionDeclarations"][0]["name"],
            "view_location_google_maps"
        );
        assert_eq!(
            json["generationConfig"]["thinkingConfig"]["includeThoughts"],
            true
        );
    }

    #[test]
    fn empty_tools_are_omitted() {
        let json = serde_json::to_value(GenerateContentRequest::default()).unwrap();
        assert!(json.get("tools").is_none());
        assert!(json.get("systemInstruction").is_none());
    }

    #[test]
    fn declaration_uses_upper_case_types() {
        let declaration = FunctionDeclaration::from_definition(&MapTool::Directions.definition());
        assert_eq!(declaration.parameters["type"], "OBJECT");
        assert_eq!(declaration.parameters["properties"]["origin"]["type"], "STRING");
        assert_eq!(
            declaration.parameters["required"],
            serde_json::json!(["origin", "destination"])
        );
    }

    #[test]
    fn response_chunk_with_thought_and_call() {
        let chunk: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [
                        {"text": "The user wants Paris.", "thought": true},
                        {"functionCall": {"name": "view_location_google_maps", "args": {"query": "Paris"}}}
                    ]
                }
            }]
        }))
        .unwrap();

        let parts = chunk.parts();
        assert_eq!(parts.len(), 2);
        assert!(parts[0].thought);
        let call = parts[1].function_call.as_ref().unwrap();
        assert_eq!(call.name, "view_location_google_maps");
        assert_eq!(call.args["query"], "Paris");
    }

    #[test]
    fn merge_joins_text_of_same_kind() {
        let mut part = Part::text("Hello");
        assert!(part.merge(Part::text(", world")).is_none());
        assert_eq!(part.text.as_deref(), Some("Hello, world"));

        let thought = Part {
            thought: true,
            ..Part::text("hmm")
        };
        assert!(part.merge(thought).is_some());
    }

    #[test]
    fn chunk_without_candidates_has_no_parts() {
        let chunk: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(chunk.parts().is_empty());
    }
}
