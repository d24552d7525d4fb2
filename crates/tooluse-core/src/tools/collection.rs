//! Named tool collections with set algebra

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::schema::ToolSchema;

use super::{Tool, ToolRegistry, ToolResult};

/// An immutable name-set view over a [`ToolRegistry`]
///
/// A collection holds tool *names*, not tools. Names are resolved through
/// the registry at call and query time, so the view is lazy: after a
/// registry `reset()`, a member name simply stops resolving and lookups
/// return `NotFound`. Construction does not validate membership.
///
/// The algebra (`union`, `exclude`, `difference`) always returns a new
/// collection and never touches the registry. An empty collection is
/// valid and acts as the identity for union and difference.
#[derive(Clone)]
pub struct ToolCollection {
    registry: Arc<ToolRegistry>,
    names: BTreeSet<String>,
}

impl ToolCollection {
    /// Create a collection from an explicit set of names
    pub fn new(registry: Arc<ToolRegistry>, names: impl IntoIterator<Item = String>) -> Self {
        Self {
            registry,
            names: names.into_iter().collect(),
        }
    }

    /// Register the given tools, then collect their names
    ///
    /// Registration is the side effect here; the returned collection is
    /// just a view of the names that were registered.
    pub fn from_tools(registry: Arc<ToolRegistry>, tools: impl IntoIterator<Item = Tool>) -> Self {
        let mut names = BTreeSet::new();
        for tool in tools {
            names.insert(tool.name().to_string());
            registry.register(tool);
        }
        Self { registry, names }
    }

    /// Collection over every tool currently registered
    ///
    /// The name-set is a snapshot; tools registered afterwards are not
    /// picked up.
    pub fn all(registry: Arc<ToolRegistry>) -> Self {
        let names = registry.available_tools();
        Self { registry, names }
    }

    /// Union of both collections' name-sets
    pub fn union(&self, other: &ToolCollection) -> ToolCollection {
        ToolCollection {
            registry: Arc::clone(&self.registry),
            names: self.names.union(&other.names).cloned().collect(),
        }
    }

    /// Remove the given names from the view
    ///
    /// A name that is not a member is ignored; the registry entries are
    /// untouched either way.
    pub fn exclude<I, S>(&self, names: I) -> ToolCollection
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let exclude: BTreeSet<String> = names.into_iter().map(Into::into).collect();
        ToolCollection {
            registry: Arc::clone(&self.registry),
            names: self
                .names
                .iter()
                .filter(|n| !exclude.contains(*n))
                .cloned()
                .collect(),
        }
    }

    /// Remove another collection's members from the view
    pub fn difference(&self, other: &ToolCollection) -> ToolCollection {
        ToolCollection {
            registry: Arc::clone(&self.registry),
            names: self.names.difference(&other.names).cloned().collect(),
        }
    }

    /// Membership test against the collection's name-set (not the registry)
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Execute a member tool by name
    ///
    /// Fails with `NotFound` when the name is not a member or no longer
    /// resolves in the registry; a failure from the tool itself is
    /// propagated unchanged as `Invocation`.
    pub async fn call(&self, name: &str, args: Value) -> ToolResult<Value> {
        if !self.contains(name) {
            return Err(super::ToolError::NotFound(name.to_string()));
        }
        let tool = self.registry.get(name)?;
        Ok(tool.invoke(args).await?)
    }

    /// Resolve every member through the registry
    pub fn tools(&self) -> ToolResult<Vec<Tool>> {
        self.names.iter().map(|n| self.registry.get(n)).collect()
    }

    /// Schemas of every member, sorted by tool name
    ///
    /// The name-set is a `BTreeSet`, so the order is deterministic.
    pub fn schemas(&self) -> ToolResult<Vec<ToolSchema>> {
        self.names
            .iter()
            .map(|n| self.registry.get(n).map(|t| t.schema().clone()))
            .collect()
    }

    /// Member names, sorted
    pub fn names(&self) -> &BTreeSet<String> {
        &self.names
    }

    /// Number of members
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the collection has no members
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl fmt::Debug for ToolCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolCollection")
            .field("names", &self.names)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::NoOpLogger;
    use crate::schema::{ParamType, ParameterSchema};
    use crate::tools::{InvocationError, ToolError};
    use serde_json::json;

    fn registry() -> Arc<ToolRegistry> {
        Arc::new(ToolRegistry::new(Arc::new(NoOpLogger::new())))
    }

    fn add_tool() -> Tool {
        let schema = ToolSchema::new("add", "Add a plus b")
            .with_parameter(ParameterSchema::new("a", ParamType::Number))
            .with_parameter(ParameterSchema::new("b", ParamType::Number));
        Tool::new(
            schema,
            Arc::new(|args: Value| {
                let a = args["a"]
                    .as_f64()
                    .ok_or_else(|| InvocationError::new("add", "'a' must be a number".to_string()))?;
                let b = args["b"]
                    .as_f64()
                    .ok_or_else(|| InvocationError::new("add", "'b' must be a number".to_string()))?;
                Ok(json!(a + b))
            }),
        )
    }

    fn named_tool(name: &str) -> Tool {
        Tool::new(
            ToolSchema::new(name, format!("Function {name}")),
            Arc::new(|_args: Value| -> Result<Value, InvocationError> { Ok(json!(null)) }),
        )
    }

    #[tokio::test]
    async fn test_call_matches_direct_invocation() {
        let registry = registry();
        let collection = ToolCollection::from_tools(Arc::clone(&registry), vec![add_tool()]);

        let result = collection.call("add", json!({"a": 5, "b": 3})).await.unwrap();
        assert_eq!(result, json!(8.0));

        let direct = add_tool().invoke(json!({"a": 5, "b": 3})).await.unwrap();
        assert_eq!(result, direct);
    }

    #[tokio::test]
    async fn test_call_unknown_name_is_not_found() {
        let registry = registry();
        let collection = ToolCollection::new(Arc::clone(&registry), vec![]);
        let err = collection.call("nonexistent", json!({})).await.unwrap_err();
        assert!(matches!(err, ToolError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_call_registered_but_not_member_is_not_found() {
        let registry = registry();
        registry.register(add_tool());

        let collection = ToolCollection::new(Arc::clone(&registry), vec!["other".to_string()]);
        let err = collection.call("add", json!({})).await.unwrap_err();
        assert!(matches!(err, ToolError::NotFound(name) if name == "add"));
    }

    #[tokio::test]
    async fn test_call_propagates_tool_failure_unchanged() {
        let registry = registry();
        let collection = ToolCollection::from_tools(Arc::clone(&registry), vec![add_tool()]);

        let err = collection.call("add", json!({"a": "x"})).await.unwrap_err();
        match err {
            ToolError::Invocation(inner) => assert_eq!(inner.tool(), "add"),
            other => panic!("expected Invocation, got {other:?}"),
        }
    }

    #[test]
    fn test_union_membership() {
        let registry = registry();
        let a = ToolCollection::from_tools(
            Arc::clone(&registry),
            vec![named_tool("add"), named_tool("subtract")],
        );
        let b = ToolCollection::from_tools(
            Arc::clone(&registry),
            vec![named_tool("subtract"), named_tool("multiply")],
        );

        let both = a.union(&b);
        for name in ["add", "subtract", "multiply"] {
            assert_eq!(both.contains(name), a.contains(name) || b.contains(name));
        }
        assert_eq!(both.len(), 3);
    }

    #[test]
    fn test_exclude_membership() {
        let registry = registry();
        let a = ToolCollection::from_tools(
            Arc::clone(&registry),
            vec![named_tool("add"), named_tool("subtract"), named_tool("multiply")],
        );

        let trimmed = a.exclude(["subtract"]);
        assert!(trimmed.contains("add"));
        assert!(!trimmed.contains("subtract"));
        assert!(trimmed.contains("multiply"));

        // The registry is untouched by view-level exclusion
        assert!(registry.get("subtract").is_ok());
    }

    #[test]
    fn test_exclude_non_member_is_a_no_op() {
        let registry = registry();
        let a = ToolCollection::from_tools(Arc::clone(&registry), vec![named_tool("add")]);

        let same = a.exclude(["never_registered"]);
        assert_eq!(same.names(), a.names());
    }

    #[test]
    fn test_difference_of_collections() {
        let registry = registry();
        let a = ToolCollection::from_tools(
            Arc::clone(&registry),
            vec![named_tool("add"), named_tool("subtract")],
        );
        let b = ToolCollection::new(Arc::clone(&registry), vec!["subtract".to_string()]);

        let only_add = a.difference(&b);
        assert!(only_add.contains("add"));
        assert!(!only_add.contains("subtract"));
    }

    #[test]
    fn test_empty_collection_is_union_and_difference_identity() {
        let registry = registry();
        let a = ToolCollection::from_tools(Arc::clone(&registry), vec![named_tool("add")]);
        let empty = ToolCollection::new(Arc::clone(&registry), vec![]);

        assert!(empty.is_empty());
        assert_eq!(a.union(&empty).names(), a.names());
        assert_eq!(a.difference(&empty).names(), a.names());
        assert!(empty.difference(&a).is_empty());
    }

    #[test]
    fn test_disjoint_collections_share_no_member() {
        let registry = registry();
        let a = ToolCollection::from_tools(
            Arc::clone(&registry),
            vec![named_tool("add"), named_tool("subtract")],
        );
        let b = ToolCollection::from_tools(
            Arc::clone(&registry),
            vec![named_tool("multiply"), named_tool("divide")],
        );

        for name in a.names() {
            assert!(!b.contains(name));
        }
        for name in b.names() {
            assert!(!a.contains(name));
        }
    }

    #[test]
    fn test_schemas_sorted_by_name() {
        let registry = registry();
        let collection = ToolCollection::from_tools(
            Arc::clone(&registry),
            vec![named_tool("zebra"), named_tool("apple"), named_tool("mango")],
        );

        let schemas = collection.schemas().unwrap();
        let names: Vec<_> = schemas.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["apple", "mango", "zebra"]);
    }

    #[test]
    fn test_collection_is_a_lazy_view_over_the_registry() {
        let registry = registry();
        let collection = ToolCollection::from_tools(Arc::clone(&registry), vec![named_tool("add")]);

        registry.reset();

        // The name is still a member of the view, but no longer resolves
        assert!(collection.contains("add"));
        assert!(matches!(
            collection.schemas(),
            Err(ToolError::NotFound(name)) if name == "add"
        ));
    }

    #[test]
    fn test_all_snapshots_the_registry() {
        let registry = registry();
        registry.register(named_tool("add"));
        registry.register(named_tool("subtract"));

        let all = ToolCollection::all(Arc::clone(&registry));
        assert_eq!(all.len(), 2);

        registry.register(named_tool("multiply"));
        assert_eq!(all.len(), 2);
    }
}
