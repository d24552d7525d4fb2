//! Provider adapters
//!
//! Pure, stateless transforms between the normalized [`ToolSchema`] shape
//! and each provider's wire envelopes. Adapters never perform I/O; the
//! LLM client feeds them raw response JSON and sends what they produce.
//!
//! Every adapter must preserve parameter names, type tags and
//! requiredness exactly; only the surrounding envelope differs.

mod anthropic;
mod ollama;

pub use anthropic::AnthropicAdapter;
pub use ollama::OllamaAdapter;

use serde_json::Value;

use crate::schema::{ParameterSchema, ToolSchema};

/// A tool invocation requested by the model
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCall {
    /// Provider-assigned call id, where the provider uses one
    pub id: Option<String>,
    /// Name of the tool being called
    pub name: String,
    /// Keyword arguments as a JSON object
    pub arguments: Value,
}

/// Stateless formatter for one provider's tool-calling envelopes
pub trait ProviderAdapter: Send + Sync {
    /// Translate a schema into the provider's tool definition shape
    fn format_schema(&self, schema: &ToolSchema) -> Value;

    /// Translate one parameter into the provider's property shape
    fn format_parameter(&self, parameter: &ParameterSchema) -> Value;

    /// Pull tool calls out of a raw provider response
    fn extract_tool_calls(&self, response: &Value) -> Vec<ToolCall>;

    /// The assistant message to append to the transcript for this response
    fn assistant_message(&self, response: &Value) -> Value;

    /// Plain text content of a response, if any
    fn response_text(&self, response: &Value) -> Option<String>;

    /// The message carrying a tool's output back to the model
    fn format_tool_response(&self, call: &ToolCall, output: &Value) -> Value;
}

/// Shared property-shape formatting
///
/// Anthropic and Ollama both use JSON Schema properties; only the outer
/// envelope differs, so both adapters delegate here.
pub(crate) fn json_schema_parameter(parameter: &ParameterSchema) -> Value {
    let mut property = serde_json::Map::new();
    property.insert(
        "type".to_string(),
        Value::String(parameter.param_type.as_str().to_string()),
    );
    if let Some(ref description) = parameter.description {
        property.insert(
            "description".to_string(),
            Value::String(description.clone()),
        );
    }
    if let Some(ref values) = parameter.enum_values {
        property.insert(
            "enum".to_string(),
            Value::Array(values.iter().cloned().map(Value::String).collect()),
        );
    }
    if let Some(nullable) = parameter.nullable {
        property.insert("nullable".to_string(), Value::Bool(nullable));
    }
    Value::Object(property)
}

/// Shared `{type: object, properties, required}` body
pub(crate) fn json_schema_object(schema: &ToolSchema) -> Value {
    let properties: serde_json::Map<String, Value> = schema
        .parameters
        .iter()
        .map(|p| (p.name.clone(), json_schema_parameter(p)))
        .collect();
    serde_json::json!({
        "type": "object",
        "properties": properties,
        "required": schema.required_names(),
    })
}

#[cfg(test)]
pub(crate) mod test_fixtures {
    use crate::schema::{ParamType, ParameterSchema, ToolSchema};

    /// The calculator schema both adapter test suites format
    pub fn calculator_schema() -> ToolSchema {
        ToolSchema::new(
            "calculator",
            "A simple calculator that performs basic arithmetic operations.",
        )
        .with_parameter(
            ParameterSchema::new("operation", ParamType::String)
                .with_description("The arithmetic operation to perform.")
                .with_enum(vec![
                    "add".to_string(),
                    "subtract".to_string(),
                    "multiply".to_string(),
                    "divide".to_string(),
                ]),
        )
        .with_parameter(
            ParameterSchema::new("operand1", ParamType::Number)
                .with_description("The first operand."),
        )
        .with_parameter(
            ParameterSchema::new("operand2", ParamType::Number)
                .with_description("The second operand.")
                .optional(),
        )
    }
}
