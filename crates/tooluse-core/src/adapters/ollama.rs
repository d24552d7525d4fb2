//! Ollama chat-API envelopes
//!
//! Tool definitions use the OpenAI-style `{type: function, function: ..}`
//! wrapper; tool calls arrive under `message.tool_calls`; results go back
//! as `role: tool` messages.

use serde_json::{json, Value};

use crate::schema::{ParameterSchema, ToolSchema};

use super::{json_schema_object, json_schema_parameter, ProviderAdapter, ToolCall};

/// Adapter for the Ollama chat API
#[derive(Debug, Clone, Copy, Default)]
pub struct OllamaAdapter;

impl OllamaAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl ProviderAdapter for OllamaAdapter {
    fn format_schema(&self, schema: &ToolSchema) -> Value {
        json!({
            "type": "function",
            "function": {
                "name": schema.name,
                "description": schema.description,
                "parameters": json_schema_object(schema),
            },
        })
    }

    fn format_parameter(&self, parameter: &ParameterSchema) -> Value {
        json_schema_parameter(parameter)
    }

    fn extract_tool_calls(&self, response: &Value) -> Vec<ToolCall> {
        let calls = match response
            .pointer("/message/tool_calls")
            .and_then(Value::as_array)
        {
            Some(calls) => calls,
            None => return Vec::new(),
        };
        calls
            .iter()
            .filter_map(|c| {
                let function = c.get("function")?;
                Some(ToolCall {
                    id: None,
                    name: function.get("name")?.as_str()?.to_string(),
                    arguments: function.get("arguments").cloned().unwrap_or_else(|| json!({})),
                })
            })
            .collect()
    }

    fn assistant_message(&self, response: &Value) -> Value {
        response.get("message").cloned().unwrap_or_else(|| {
            json!({"role": "assistant", "content": ""})
        })
    }

    fn response_text(&self, response: &Value) -> Option<String> {
        response
            .pointer("/message/content")
            .and_then(Value::as_str)
            .map(str::to_string)
    }

    fn format_tool_response(&self, call: &ToolCall, output: &Value) -> Value {
        let content = match output {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        json!({
            "role": "tool",
            "name": call.name,
            "content": content,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::test_fixtures::calculator_schema;

    #[test]
    fn test_format_schema_envelope() {
        let formatted = OllamaAdapter::new().format_schema(&calculator_schema());

        assert_eq!(formatted["type"], "function");
        assert_eq!(formatted["function"]["name"], "calculator");
        assert_eq!(formatted["function"]["parameters"]["type"], "object");
        assert_eq!(
            formatted["function"]["parameters"]["properties"]["operand1"]["type"],
            "number"
        );
        assert_eq!(
            formatted["function"]["parameters"]["required"],
            json!(["operation", "operand1"])
        );
    }

    #[test]
    fn test_extract_tool_calls_from_message() {
        let response = json!({
            "message": {
                "role": "assistant",
                "content": "",
                "tool_calls": [
                    {"function": {"name": "calculator", "arguments": {"operation": "add", "operand1": 5, "operand2": 3}}}
                ]
            }
        });

        let calls = OllamaAdapter::new().extract_tool_calls(&response);
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].name, "calculator");
        assert_eq!(calls[0].id, None);
        assert_eq!(calls[0].arguments["operation"], "add");
    }

    #[test]
    fn test_extract_tool_calls_empty_without_calls() {
        let response = json!({"message": {"role": "assistant", "content": "8"}});
        assert!(OllamaAdapter::new().extract_tool_calls(&response).is_empty());
    }

    #[test]
    fn test_response_text_reads_message_content() {
        let response = json!({"message": {"role": "assistant", "content": "The answer is 8."}});
        assert_eq!(
            OllamaAdapter::new().response_text(&response).as_deref(),
            Some("The answer is 8.")
        );
    }

    #[test]
    fn test_format_tool_response_envelope() {
        let call = ToolCall {
            id: None,
            name: "calculator".to_string(),
            arguments: json!({}),
        };
        let message = OllamaAdapter::new().format_tool_response(&call, &json!(8.0));

        assert_eq!(message["role"], "tool");
        assert_eq!(message["name"], "calculator");
        assert_eq!(message["content"], "8.0");
    }

    #[test]
    fn test_both_adapters_preserve_parameter_fidelity() {
        let schema = calculator_schema();
        let anthropic = crate::adapters::AnthropicAdapter::new().format_schema(&schema);
        let ollama = OllamaAdapter::new().format_schema(&schema);

        // Same properties and required list under either envelope
        assert_eq!(
            anthropic["input_schema"]["properties"],
            ollama["function"]["parameters"]["properties"]
        );
        assert_eq!(
            anthropic["input_schema"]["required"],
            ollama["function"]["parameters"]["required"]
        );
    }
}
