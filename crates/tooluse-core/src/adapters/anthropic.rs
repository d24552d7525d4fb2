//! Anthropic messages-API envelopes
//!
//! Tool definitions use `input_schema`; tool calls arrive as `tool_use`
//! content blocks; results go back as `tool_result` blocks inside a user
//! message.

use serde_json::{json, Value};

use crate::schema::{ParameterSchema, ToolSchema};

use super::{json_schema_object, json_schema_parameter, ProviderAdapter, ToolCall};

/// Adapter for the Anthropic messages API
#[derive(Debug, Clone, Copy, Default)]
pub struct AnthropicAdapter;

impl AnthropicAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl ProviderAdapter for AnthropicAdapter {
    fn format_schema(&self, schema: &ToolSchema) -> Value {
        json!({
            "name": schema.name,
            "description": schema.description,
            "input_schema": json_schema_object(schema),
        })
    }

    fn format_parameter(&self, parameter: &ParameterSchema) -> Value {
        json_schema_parameter(parameter)
    }

    fn extract_tool_calls(&self, response: &Value) -> Vec<ToolCall> {
        let blocks = match response.get("content").and_then(Value::as_array) {
            Some(blocks) => blocks,
            None => return Vec::new(),
        };
        blocks
            .iter()
            .filter(|b| b.get("type").and_then(Value::as_str) == Some("tool_use"))
            .filter_map(|b| {
                Some(ToolCall {
                    id: b.get("id").and_then(Value::as_str).map(str::to_string),
                    name: b.get("name")?.as_str()?.to_string(),
                    arguments: b.get("input").cloned().unwrap_or_else(|| json!({})),
                })
            })
            .collect()
    }

    fn assistant_message(&self, response: &Value) -> Value {
        json!({
            "role": "assistant",
            "content": response.get("content").cloned().unwrap_or_else(|| json!([])),
        })
    }

    fn response_text(&self, response: &Value) -> Option<String> {
        let blocks = response.get("content")?.as_array()?;
        let text: Vec<&str> = blocks
            .iter()
            .filter(|b| b.get("type").and_then(Value::as_str) == Some("text"))
            .filter_map(|b| b.get("text").and_then(Value::as_str))
            .collect();
        if text.is_empty() {
            None
        } else {
            Some(text.join(""))
        }
    }

    fn format_tool_response(&self, call: &ToolCall, output: &Value) -> Value {
        let content = match output {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        json!({
            "role": "user",
            "content": [{
                "type": "tool_result",
                "tool_use_id": call.id.clone().unwrap_or_default(),
                "content": content,
            }],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::test_fixtures::calculator_schema;

    #[test]
    fn test_format_schema_envelope() {
        let formatted = AnthropicAdapter::new().format_schema(&calculator_schema());

        assert_eq!(formatted["name"], "calculator");
        assert_eq!(formatted["input_schema"]["type"], "object");
        assert_eq!(
            formatted["input_schema"]["properties"]["operation"]["type"],
            "string"
        );
        assert_eq!(
            formatted["input_schema"]["properties"]["operation"]["enum"][0],
            "add"
        );
        // operand2 is optional, so required holds exactly the other two
        assert_eq!(
            formatted["input_schema"]["required"],
            json!(["operation", "operand1"])
        );
    }

    #[test]
    fn test_extract_tool_calls_from_tool_use_blocks() {
        let response = json!({
            "content": [
                {"type": "text", "text": "Let me calculate that."},
                {
                    "type": "tool_use",
                    "id": "toolu_123",
                    "name": "calculator",
                    "input": {"operation": "add", "operand1": 5, "operand2": 3}
                }
            ]
        });

        let calls = AnthropicAdapter::new().extract_tool_calls(&response);
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].id.as_deref(), Some("toolu_123"));
        assert_eq!(calls[0].name, "calculator");
        assert_eq!(calls[0].arguments["operand1"], 5);
    }

    #[test]
    fn test_extract_tool_calls_empty_without_tool_use() {
        let response = json!({"content": [{"type": "text", "text": "8"}]});
        assert!(AnthropicAdapter::new()
            .extract_tool_calls(&response)
            .is_empty());
    }

    #[test]
    fn test_response_text_joins_text_blocks() {
        let response = json!({
            "content": [
                {"type": "text", "text": "The answer "},
                {"type": "tool_use", "id": "x", "name": "calculator", "input": {}},
                {"type": "text", "text": "is 8."}
            ]
        });
        assert_eq!(
            AnthropicAdapter::new().response_text(&response).as_deref(),
            Some("The answer is 8.")
        );
    }

    #[test]
    fn test_format_tool_response_envelope() {
        let call = ToolCall {
            id: Some("toolu_123".to_string()),
            name: "calculator".to_string(),
            arguments: json!({}),
        };
        let message = AnthropicAdapter::new().format_tool_response(&call, &json!(8.0));

        assert_eq!(message["role"], "user");
        assert_eq!(message["content"][0]["type"], "tool_result");
        assert_eq!(message["content"][0]["tool_use_id"], "toolu_123");
        assert_eq!(message["content"][0]["content"], "8.0");
    }
}
