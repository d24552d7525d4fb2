//! Provider-agnostic tool schemas
//!
//! A [`ToolSchema`] describes a callable tool (name, parameters, purpose)
//! in a normalized shape. Provider adapters translate it into the envelope
//! each LLM API expects; the schema itself never leaves this shape.
//!
//! Schemas serialize to and from JSON with an exact round-trip:
//! `ToolSchema::from_file(s.to_file(..)) == s` for every valid schema.

mod generators;

pub use generators::{
    CompletionBackend, FunctionSignature, LlmSchemaGenerator, ParamSpec, SchemaGenerator,
    StaticSchemaGenerator,
};

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from schema construction, validation or (de)serialization
#[derive(Error, Debug)]
pub enum SchemaError {
    /// Schema name missing or empty
    #[error("schema name must not be empty")]
    EmptyName,

    /// Schema description missing or empty
    #[error("schema '{0}' has an empty description")]
    EmptyDescription(String),

    /// Two parameters share a name within one schema
    #[error("schema '{schema}' declares parameter '{parameter}' more than once")]
    DuplicateParameter { schema: String, parameter: String },

    /// Delegated generation produced output that cannot be used
    #[error("malformed schema output: {0}")]
    Malformed(String),

    /// Delegated generation could not reach the model
    #[error("schema generation request failed: {0}")]
    Backend(String),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SchemaResult<T> = Result<T, SchemaError>;

/// Type tag for a tool parameter
///
/// The tags mirror JSON Schema's primitive types plus `any` for
/// parameters with no declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    Integer,
    Number,
    Boolean,
    Array,
    Object,
    Any,
}

impl ParamType {
    /// Map a JSON Schema type string onto a tag
    ///
    /// Unknown or compound types fall back to `Any`, mirroring the
    /// missing-annotation policy for declared signatures.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "string" => ParamType::String,
            "integer" => ParamType::Integer,
            "number" => ParamType::Number,
            "boolean" => ParamType::Boolean,
            "array" => ParamType::Array,
            "object" => ParamType::Object,
            _ => ParamType::Any,
        }
    }

    /// The serialized tag
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamType::String => "string",
            ParamType::Integer => "integer",
            ParamType::Number => "number",
            ParamType::Boolean => "boolean",
            ParamType::Array => "array",
            ParamType::Object => "object",
            ParamType::Any => "any",
        }
    }
}

/// Schema for a single tool parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSchema {
    /// Parameter name, unique within its schema
    pub name: String,
    /// Type tag
    #[serde(rename = "type")]
    pub param_type: ParamType,
    /// Whether the caller must supply this parameter
    pub required: bool,
    /// Natural-language description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Allowed values, if the parameter is an enumeration
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
    /// Whether null is accepted in place of a value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,
}

impl ParameterSchema {
    /// Create a required parameter with the given type tag
    pub fn new(name: impl Into<String>, param_type: ParamType) -> Self {
        Self {
            name: name.into(),
            param_type,
            required: true,
            description: None,
            enum_values: None,
            nullable: None,
        }
    }

    /// Mark the parameter optional
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Restrict the parameter to a fixed set of values
    pub fn with_enum(mut self, values: Vec<String>) -> Self {
        self.enum_values = Some(values);
        self
    }

    /// Mark the parameter nullable
    pub fn nullable(mut self) -> Self {
        self.nullable = Some(true);
        self
    }
}

/// Normalized description of a callable tool
///
/// The name doubles as the tool's identity key in the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSchema {
    /// Tool name (function name)
    pub name: String,
    /// Description of what the tool does
    pub description: String,
    /// Ordered parameter list
    pub parameters: Vec<ParameterSchema>,
}

impl ToolSchema {
    /// Create a schema with no parameters
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: Vec::new(),
        }
    }

    /// Append a parameter
    pub fn with_parameter(mut self, parameter: ParameterSchema) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Names of required parameters, in declaration order
    pub fn required_names(&self) -> Vec<&str> {
        self.parameters
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name.as_str())
            .collect()
    }

    /// Check the schema invariants
    ///
    /// Name and description must be non-empty and parameter names unique.
    pub fn validate(&self) -> SchemaResult<()> {
        if self.name.is_empty() {
            return Err(SchemaError::EmptyName);
        }
        if self.description.is_empty() {
            return Err(SchemaError::EmptyDescription(self.name.clone()));
        }
        let mut seen = HashSet::new();
        for param in &self.parameters {
            if !seen.insert(param.name.as_str()) {
                return Err(SchemaError::DuplicateParameter {
                    schema: self.name.clone(),
                    parameter: param.name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Serialize to a pretty JSON string
    pub fn to_json(&self) -> SchemaResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse and validate a schema from a JSON string
    pub fn from_json(json: &str) -> SchemaResult<Self> {
        let schema: Self = serde_json::from_str(json)?;
        schema.validate()?;
        Ok(schema)
    }

    /// Write the schema to a JSON file
    pub fn to_file(&self, path: impl AsRef<Path>) -> SchemaResult<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Read and validate a schema from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> SchemaResult<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}
