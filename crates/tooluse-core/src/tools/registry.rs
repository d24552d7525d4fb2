//! Process-wide tool registry

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::logging::Logger;

use super::{Tool, ToolError, ToolResult};

/// Single process-wide authority mapping tool name to [`Tool`]
///
/// The registry is an explicit state object: create it once, share it as
/// `Arc<ToolRegistry>`, and pass it to the collections and clients that
/// need it. There is no ambient global instance.
///
/// Duplicate policy: **last write wins**. Registering a tool under an
/// existing name replaces the previous entry (a warning is logged); it is
/// never rejected.
pub struct ToolRegistry {
    tools: RwLock<HashMap<String, Tool>>,
    logger: Arc<dyn Logger>,
}

impl ToolRegistry {
    /// Create an empty registry
    pub fn new(logger: Arc<dyn Logger>) -> Self {
        Self {
            tools: RwLock::new(HashMap::new()),
            logger,
        }
    }

    /// Insert a tool, replacing any existing entry with the same name
    pub fn register(&self, tool: Tool) {
        let name = tool.name().to_string();
        let previous = self.tools.write().insert(name.clone(), tool);
        match previous {
            Some(_) => self
                .logger
                .warn(&format!("[ToolRegistry] Replaced tool: {}", name)),
            None => self
                .logger
                .debug(&format!("[ToolRegistry] Registered tool: {}", name)),
        }
    }

    /// Register several tools
    ///
    /// Not transactional: each tool is inserted independently, so tools
    /// registered before a failure elsewhere in the caller stay
    /// registered.
    pub fn register_all(&self, tools: impl IntoIterator<Item = Tool>) {
        for tool in tools {
            self.register(tool);
        }
    }

    /// Look up a tool by name
    pub fn get(&self, name: &str) -> ToolResult<Tool> {
        self.tools
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| ToolError::NotFound(name.to_string()))
    }

    /// Snapshot of all registered names
    ///
    /// The returned set does not track later registrations or resets.
    pub fn available_tools(&self) -> BTreeSet<String> {
        self.tools.read().keys().cloned().collect()
    }

    /// Remove every entry
    ///
    /// Used for test isolation and explicit reconfiguration.
    pub fn reset(&self) {
        self.tools.write().clear();
        self.logger.debug("[ToolRegistry] Registry has been reset");
    }

    /// Number of registered tools
    pub fn tool_count(&self) -> usize {
        self.tools.read().len()
    }
}
