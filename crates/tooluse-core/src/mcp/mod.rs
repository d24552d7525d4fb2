//! MCP (Model Context Protocol) integration
//!
//! Uses the official rmcp SDK to connect to MCP servers over stdio
//! (spawned child process) or streamable HTTP, and loads their tools
//! into the registry as ordinary [`crate::tools::Tool`]s.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tooluse_core::logging::NoOpLogger;
//! use tooluse_core::mcp::{load_tools, McpClient};
//! use tooluse_core::tools::ToolRegistry;
//!
//! let logger: Arc<dyn Logger> = Arc::new(NoOpLogger::new());
//! let registry = Arc::new(ToolRegistry::new(Arc::clone(&logger)));
//!
//! let client = Arc::new(
//!     McpClient::connect_stdio("python", &["-m".into(), "calc_server".into()], logger).await?,
//! );
//!
//! // Discover and register every tool the server offers
//! let tools = load_tools(client, Arc::clone(&registry)).await?;
//! let result = tools.call("add", serde_json::json!({"a": 5, "b": 3})).await?;
//! ```

mod client;
mod reference;

pub use client::{McpClient, McpError, McpResult};
pub use reference::{load_tools, tool_schema_from_input_schema, McpToolReference};

// Re-export rmcp types that consumers might need
pub use rmcp::model::{CallToolResult as McpToolResult, Tool as McpTool};
