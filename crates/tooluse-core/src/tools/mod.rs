//! Tool management module
//!
//! A [`Tool`] binds a schema to a callable (a native closure or a remote
//! MCP reference). Tools live in a [`ToolRegistry`], the single
//! process-wide authority for tool identity, and are grouped into
//! [`ToolCollection`]s — composable name-set views over the registry that
//! support union, exclusion, membership tests and dispatch.

mod collection;
mod registry;

pub use collection::ToolCollection;
pub use registry::ToolRegistry;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::schema::{FunctionSignature, SchemaError, SchemaGenerator, ToolSchema};

/// Errors from registry and collection operations
#[derive(Error, Debug)]
pub enum ToolError {
    /// Name absent from the registry, or not a member of the collection
    #[error("tool '{0}' is not registered")]
    NotFound(String),

    /// Schema construction or validation failed
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// The underlying callable or remote call failed
    #[error(transparent)]
    Invocation(#[from] InvocationError),
}

pub type ToolResult<T> = Result<T, ToolError>;

/// Failure raised by a tool's own implementation
///
/// Carries the tool name and the original error as the source, so the
/// failure's identity survives propagation to the caller.
#[derive(Error, Debug)]
#[error("tool '{tool}' failed: {source}")]
pub struct InvocationError {
    tool: String,
    #[source]
    source: Box<dyn std::error::Error + Send + Sync>,
}

impl InvocationError {
    /// Wrap an error raised by the named tool
    pub fn new(
        tool: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self {
            tool: tool.into(),
            source: source.into(),
        }
    }

    /// Name of the tool that failed
    pub fn tool(&self) -> &str {
        &self.tool
    }
}

/// An invocable tool implementation
///
/// Arguments arrive as a JSON object of keyword arguments; the result is
/// whatever JSON value the tool produces. Plain closures of type
/// `Fn(Value) -> Result<Value, InvocationError>` implement this trait,
/// so native tools need no boilerplate; `McpToolReference` implements it
/// for remote tools.
#[async_trait]
pub trait Callable: Send + Sync {
    async fn invoke(&self, args: Value) -> Result<Value, InvocationError>;
}

#[async_trait]
impl<F> Callable for F
where
    F: Fn(Value) -> Result<Value, InvocationError> + Send + Sync,
{
    async fn invoke(&self, args: Value) -> Result<Value, InvocationError> {
        (self)(args)
    }
}

/// A named callable plus its schema
///
/// The schema's name is the tool's only identity key, in the registry and
/// everywhere else.
#[derive(Clone)]
pub struct Tool {
    schema: ToolSchema,
    handler: Arc<dyn Callable>,
}

impl Tool {
    /// Bind a schema to a handler
    pub fn new(schema: ToolSchema, handler: Arc<dyn Callable>) -> Self {
        Self { schema, handler }
    }

    /// Build a tool by running a schema generator over a declared signature
    pub async fn from_signature(
        signature: &FunctionSignature,
        generator: &dyn SchemaGenerator,
        handler: Arc<dyn Callable>,
    ) -> Result<Self, SchemaError> {
        let schema = generator.generate_schema(signature).await?;
        Ok(Self::new(schema, handler))
    }

    /// The tool's identity key
    pub fn name(&self) -> &str {
        &self.schema.name
    }

    /// The tool's schema
    pub fn schema(&self) -> &ToolSchema {
        &self.schema
    }

    /// Replace the schema, e.g. after delegated regeneration
    ///
    /// The new schema must carry the same name; the registry key would
    /// silently diverge otherwise.
    pub fn update_schema(&mut self, schema: ToolSchema) -> Result<(), SchemaError> {
        schema.validate()?;
        if schema.name != self.schema.name {
            return Err(SchemaError::Malformed(format!(
                "schema name '{}' does not match tool '{}'",
                schema.name, self.schema.name
            )));
        }
        self.schema = schema;
        Ok(())
    }

    /// Invoke the underlying callable
    pub async fn invoke(&self, args: Value) -> Result<Value, InvocationError> {
        self.handler.invoke(args).await
    }
}

impl fmt::Debug for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tool").field("name", &self.name()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ParamType, StaticSchemaGenerator};
    use serde_json::json;

    fn add_tool() -> Tool {
        let schema = ToolSchema::new("add", "Add x plus y")
            .with_parameter(crate::schema::ParameterSchema::new("x", ParamType::Number))
            .with_parameter(crate::schema::ParameterSchema::new("y", ParamType::Number));
        Tool::new(
            schema,
            Arc::new(|args: Value| {
                let x = args["x"].as_f64().ok_or_else(|| {
                    InvocationError::new("add", "argument 'x' must be a number".to_string())
                })?;
                let y = args["y"].as_f64().ok_or_else(|| {
                    InvocationError::new("add", "argument 'y' must be a number".to_string())
                })?;
                Ok(json!(x + y))
            }),
        )
    }

    #[tokio::test]
    async fn test_tool_invokes_like_the_function() {
        let tool = add_tool();
        let result = tool.invoke(json!({"x": 5, "y": 3})).await.unwrap();
        assert_eq!(result, json!(8.0));
    }

    #[tokio::test]
    async fn test_tool_propagates_handler_failure() {
        let tool = add_tool();
        let err = tool.invoke(json!({"x": "five"})).await.unwrap_err();
        assert_eq!(err.tool(), "add");
    }

    #[tokio::test]
    async fn test_tool_from_signature() {
        let sig = FunctionSignature::new("add")
            .with_doc("Add x plus y")
            .param("x", ParamType::Number)
            .param("y", ParamType::Number);
        let tool = Tool::from_signature(
            &sig,
            &StaticSchemaGenerator::new(),
            Arc::new(|_args: Value| -> Result<Value, InvocationError> { Ok(json!(null)) }),
        )
        .await
        .unwrap();

        assert_eq!(tool.name(), "add");
        assert_eq!(tool.schema().parameters.len(), 2);
    }

    #[tokio::test]
    async fn test_update_schema_rejects_renames() {
        let mut tool = add_tool();
        let renamed = ToolSchema::new("sum", "Add numbers");
        assert!(tool.update_schema(renamed).is_err());

        let updated = ToolSchema::new("add", "Adds two numbers together");
        tool.update_schema(updated).unwrap();
        assert_eq!(tool.schema().description, "Adds two numbers together");
    }
}
