//! Remote tool references
//!
//! An [`McpToolReference`] wraps one tool discovered from an MCP server
//! behind the same [`Callable`] interface native tools use, so the
//! registry and collections never care where a tool runs.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::schema::{ParamType, ParameterSchema, ToolSchema};
use crate::tools::{Callable, InvocationError, Tool, ToolCollection, ToolRegistry};

use super::client::{McpClient, McpResult};

/// Reference to a tool living on a connected MCP server
#[derive(Clone)]
pub struct McpToolReference {
    name: String,
    description: String,
    input_schema: Value,
    client: Arc<McpClient>,
}

impl McpToolReference {
    /// Wrap a tool listed by the server
    pub fn from_mcp_tool(tool: rmcp::model::Tool, client: Arc<McpClient>) -> Self {
        Self {
            name: tool.name.to_string(),
            description: tool.description.map(|s| s.to_string()).unwrap_or_default(),
            input_schema: serde_json::to_value(tool.input_schema.as_ref()).unwrap_or_default(),
            client,
        }
    }

    /// The remote tool's name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Convert the server's JSON Schema into the normalized shape
    pub fn schema(&self) -> ToolSchema {
        tool_schema_from_input_schema(&self.name, &self.description, &self.input_schema)
    }

    /// Wrap the reference as a registry tool
    pub fn into_tool(self) -> Tool {
        Tool::new(self.schema(), Arc::new(self))
    }
}

#[async_trait]
impl Callable for McpToolReference {
    async fn invoke(&self, args: Value) -> Result<Value, InvocationError> {
        let result = self
            .client
            .call_tool(&self.name, args)
            .await
            .map_err(|e| InvocationError::new(self.name.as_str(), e))?;

        // First text content item, the same extraction the server's own
        // clients use
        let text = result
            .content
            .iter()
            .filter_map(|c| match &c.raw {
                rmcp::model::RawContent::Text(t) => Some(t.text.clone()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("\n");

        if result.is_error.unwrap_or(false) {
            return Err(InvocationError::new(self.name.as_str(), text));
        }

        Ok(Value::String(text))
    }
}

/// Build a [`ToolSchema`] from an MCP `inputSchema` object
///
/// Properties map to parameters; the `required` array sets the flags.
/// A property with no `type` is treated as a string, matching what
/// servers in the wild actually send.
pub fn tool_schema_from_input_schema(
    name: &str,
    description: &str,
    input_schema: &Value,
) -> ToolSchema {
    let required: Vec<&str> = input_schema
        .get("required")
        .and_then(Value::as_array)
        .map(|a| a.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    let mut schema = ToolSchema::new(name, description);
    if let Some(properties) = input_schema.get("properties").and_then(Value::as_object) {
        for (prop_name, prop) in properties {
            let tag = prop.get("type").and_then(Value::as_str).unwrap_or("string");
            let mut param = ParameterSchema::new(prop_name.as_str(), ParamType::from_tag(tag));
            param.required = required.contains(&prop_name.as_str());
            param.description = prop
                .get("description")
                .and_then(Value::as_str)
                .map(str::to_string);
            param.enum_values = prop.get("enum").and_then(Value::as_array).map(|a| {
                a.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            });
            param.nullable = prop.get("nullable").and_then(Value::as_bool);
            schema.parameters.push(param);
        }
    }
    schema
}

/// Discover a server's tools and register them all
///
/// Registration happens tool by tool; it is not transactional. Returns
/// the collection of the discovered names.
pub async fn load_tools(
    client: Arc<McpClient>,
    registry: Arc<ToolRegistry>,
) -> McpResult<ToolCollection> {
    let listed = client.list_tools().await?;
    let tools: Vec<Tool> = listed
        .into_iter()
        .map(|t| McpToolReference::from_mcp_tool(t, Arc::clone(&client)).into_tool())
        .collect();
    Ok(ToolCollection::from_tools(registry, tools))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_input_schema_conversion_preserves_properties() {
        let input_schema = json!({
            "type": "object",
            "properties": {
                "operation": {
                    "type": "string",
                    "description": "The arithmetic operation to perform.",
                    "enum": ["add", "subtract"]
                },
                "operand1": {"type": "number"},
                "note": {"nullable": true}
            },
            "required": ["operation", "operand1"]
        });

        let schema = tool_schema_from_input_schema("calculator", "Basic arithmetic", &input_schema);

        assert_eq!(schema.name, "calculator");
        assert_eq!(schema.parameters.len(), 3);

        let operation = schema
            .parameters
            .iter()
            .find(|p| p.name == "operation")
            .unwrap();
        assert_eq!(operation.param_type, ParamType::String);
        assert!(operation.required);
        assert_eq!(
            operation.enum_values,
            Some(vec!["add".to_string(), "subtract".to_string()])
        );

        // No declared type falls back to string; absent from required
        let note = schema.parameters.iter().find(|p| p.name == "note").unwrap();
        assert_eq!(note.param_type, ParamType::String);
        assert!(!note.required);
        assert_eq!(note.nullable, Some(true));
    }

    #[test]
    fn test_input_schema_conversion_without_properties() {
        let schema = tool_schema_from_input_schema("ping", "Liveness check", &json!({}));
        assert!(schema.parameters.is_empty());
        assert_eq!(schema.required_names(), Vec::<&str>::new());
    }
}
