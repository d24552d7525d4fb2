//! Tooluse Core
//!
//! Registers plain functions and remote MCP tools as named, schema-carrying
//! tools, groups them into composable collections, and formats their
//! schemas for LLM provider APIs (Anthropic, Ollama).
//!
//! ## Tool registry and collections
//!
//! The `tools` module is the heart of the crate:
//! - `ToolRegistry`: process-wide name → tool map (explicit state object,
//!   shared as `Arc`, last write wins on duplicate names)
//! - `ToolCollection`: immutable name-set view with union / exclusion /
//!   membership / dispatch, resolved lazily through the registry
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use serde_json::json;
//! use tooluse_core::logging::NoOpLogger;
//! use tooluse_core::schema::ToolSchema;
//! use tooluse_core::tools::{Tool, ToolCollection, ToolRegistry};
//!
//! let registry = Arc::new(ToolRegistry::new(Arc::new(NoOpLogger::new())));
//! let tools = ToolCollection::from_tools(Arc::clone(&registry), vec![add_tool]);
//!
//! let result = tools.call("add", json!({"a": 5, "b": 3})).await?;
//! let schemas = tools.schemas()?; // sorted by name, ready for an adapter
//! ```
//!
//! Schemas come from the `schema` module (static signature-driven
//! generation, or delegated to a model), provider envelopes from
//! `adapters`, the conversation loop from `llm`, and remote tools from
//! `mcp`.

pub mod adapters;
pub mod config;
pub mod llm;
pub mod logging;
pub mod mcp;
pub mod schema;
pub mod tools;

// Re-export commonly used types
pub use schema::{
    CompletionBackend, FunctionSignature, LlmSchemaGenerator, ParamSpec, ParamType,
    ParameterSchema, SchemaError, SchemaGenerator, StaticSchemaGenerator, ToolSchema,
};

pub use tools::{Callable, InvocationError, Tool, ToolCollection, ToolError, ToolRegistry};

pub use adapters::{AnthropicAdapter, OllamaAdapter, ProviderAdapter, ToolCall};

pub use config::{ClientType, ConfigError, ModelConfig};

pub use llm::{LlmClient, ProviderError, ProviderResult};

pub use logging::{ConsoleLogger, Logger, NoOpLogger};

pub use mcp::{load_tools, McpClient, McpError, McpResult, McpToolReference};
