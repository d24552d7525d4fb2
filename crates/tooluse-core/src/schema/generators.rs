//! Schema generation strategies
//!
//! Two generators produce a [`ToolSchema`] from a declared function
//! signature:
//!
//! - [`StaticSchemaGenerator`] derives the schema directly from the
//!   signature. A parameter without a type annotation is tagged `any`
//!   rather than rejected.
//! - [`LlmSchemaGenerator`] asks a model to enrich the static schema with
//!   better descriptions. Its output is validated against the same
//!   invariants as any other schema; malformed output is an error, never
//!   a silent partial acceptance.
//!
//! Rust functions carry no runtime-introspectable signature, so the
//! signature is an explicit [`FunctionSignature`] value declared next to
//! the handler.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;

use super::{ParamType, ParameterSchema, SchemaError, SchemaResult, ToolSchema};

/// A single declared parameter
#[derive(Debug, Clone)]
pub struct ParamSpec {
    /// Parameter name
    pub name: String,
    /// Declared type, or `None` for an unannotated parameter
    pub type_tag: Option<ParamType>,
    /// Whether the parameter has no default
    pub required: bool,
    /// Declared description
    pub description: Option<String>,
}

/// Declared signature of a native tool function
#[derive(Debug, Clone)]
pub struct FunctionSignature {
    /// Function name, used as the tool's identity key
    pub name: String,
    /// Doc string
    pub doc: Option<String>,
    /// Declared parameters, in order
    pub params: Vec<ParamSpec>,
}

impl FunctionSignature {
    /// Start a signature for the given function name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: None,
            params: Vec::new(),
        }
    }

    /// Attach the function's doc string
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Declare a required, typed parameter
    pub fn param(mut self, name: impl Into<String>, type_tag: ParamType) -> Self {
        self.params.push(ParamSpec {
            name: name.into(),
            type_tag: Some(type_tag),
            required: true,
            description: None,
        });
        self
    }

    /// Declare a required parameter without a type annotation
    pub fn untyped_param(mut self, name: impl Into<String>) -> Self {
        self.params.push(ParamSpec {
            name: name.into(),
            type_tag: None,
            required: true,
            description: None,
        });
        self
    }

    /// Declare an optional, typed parameter
    pub fn optional_param(mut self, name: impl Into<String>, type_tag: ParamType) -> Self {
        self.params.push(ParamSpec {
            name: name.into(),
            type_tag: Some(type_tag),
            required: false,
            description: None,
        });
        self
    }

    /// Attach a description to the most recently declared parameter
    pub fn describe_param(mut self, description: impl Into<String>) -> Self {
        if let Some(last) = self.params.last_mut() {
            last.description = Some(description.into());
        }
        self
    }
}

/// Capability for turning a declared signature into a schema
#[async_trait]
pub trait SchemaGenerator: Send + Sync {
    /// Generate a validated schema for the signature
    async fn generate_schema(&self, signature: &FunctionSignature) -> SchemaResult<ToolSchema>;
}

/// Derives a schema from the declared signature alone
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticSchemaGenerator;

impl StaticSchemaGenerator {
    pub fn new() -> Self {
        Self
    }

    fn build(&self, signature: &FunctionSignature) -> SchemaResult<ToolSchema> {
        let description = signature
            .doc
            .clone()
            .unwrap_or_else(|| format!("Function {}", signature.name));

        let mut schema = ToolSchema::new(signature.name.as_str(), description);
        for spec in &signature.params {
            // Missing annotation is tagged `any`, not rejected
            let mut param =
                ParameterSchema::new(spec.name.as_str(), spec.type_tag.unwrap_or(ParamType::Any));
            param.required = spec.required;
            param.description = spec.description.clone();
            schema.parameters.push(param);
        }

        schema.validate()?;
        Ok(schema)
    }
}

#[async_trait]
impl SchemaGenerator for StaticSchemaGenerator {
    async fn generate_schema(&self, signature: &FunctionSignature) -> SchemaResult<ToolSchema> {
        self.build(signature)
    }
}

/// Capability for sending a prompt to a model and getting text back
///
/// Implemented by `LlmClient`; tests substitute a canned backend.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(
        &self,
        prompt: &str,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>>;
}

const SCHEMA_PROMPT: &str = "Given this function information:
signature: {signature}
basic schema: {basic_schema}
docs: {docs}

Please extend this with clear, detailed descriptions of what this function and each parameter does.
Respond with the following JSON shape:
{
    \"description\": \"A clear, detailed description of what this function does\",
    \"parameters\": {
        \"param1\": {
            \"description\": \"A clear, detailed description of what this parameter does\"
        }
    }
}
Reply with the JSON only, and nothing else.
";

/// Expected shape of the model's reply
#[derive(Debug, Deserialize)]
struct Enhancement {
    description: String,
    #[serde(default)]
    parameters: HashMap<String, ParamEnhancement>,
}

#[derive(Debug, Deserialize)]
struct ParamEnhancement {
    description: String,
}

/// Enriches a static schema with model-written descriptions
///
/// The model's reply must parse, reference only declared parameters and
/// pass schema validation; anything else is a [`SchemaError::Malformed`].
pub struct LlmSchemaGenerator<B> {
    backend: B,
    base: StaticSchemaGenerator,
}

impl<B: CompletionBackend> LlmSchemaGenerator<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            base: StaticSchemaGenerator::new(),
        }
    }

    fn build_prompt(&self, signature: &FunctionSignature, basic: &ToolSchema) -> String {
        let params = signature
            .params
            .iter()
            .map(|p| match p.type_tag {
                Some(t) => format!("{}: {}", p.name, t.as_str()),
                None => p.name.clone(),
            })
            .collect::<Vec<_>>()
            .join(", ");
        let rendered = format!("{}({})", signature.name, params);

        SCHEMA_PROMPT
            .replace("{signature}", &rendered)
            .replace(
                "{basic_schema}",
                &serde_json::to_string(basic).unwrap_or_default(),
            )
            .replace("{docs}", signature.doc.as_deref().unwrap_or(""))
    }

    fn apply(&self, mut schema: ToolSchema, reply: &str) -> SchemaResult<ToolSchema> {
        let json = extract_json(reply);
        let enhancement: Enhancement = serde_json::from_str(json)
            .map_err(|e| SchemaError::Malformed(format!("reply is not the expected JSON: {e}")))?;

        for name in enhancement.parameters.keys() {
            if !schema.parameters.iter().any(|p| &p.name == name) {
                return Err(SchemaError::Malformed(format!(
                    "reply describes unknown parameter '{name}'"
                )));
            }
        }

        schema.description = enhancement.description;
        for param in &mut schema.parameters {
            if let Some(extra) = enhancement.parameters.get(&param.name) {
                param.description = Some(extra.description.clone());
            }
        }

        schema.validate()?;
        Ok(schema)
    }
}

#[async_trait]
impl<B: CompletionBackend> SchemaGenerator for LlmSchemaGenerator<B> {
    async fn generate_schema(&self, signature: &FunctionSignature) -> SchemaResult<ToolSchema> {
        let basic = self.base.build(signature)?;
        let prompt = self.build_prompt(signature, &basic);

        let reply = self
            .backend
            .complete(&prompt)
            .await
            .map_err(|e| SchemaError::Backend(e.to_string()))?;

        self.apply(basic, &reply)
    }
}

/// Pull the JSON body out of a reply, tolerating a ```json fence
fn extract_json(content: &str) -> &str {
    if let Some(start) = content.find("```") {
        let after = &content[start + 3..];
        let after = after.strip_prefix("json").unwrap_or(after);
        if let Some(end) = after.find("```") {
            return after[..end].trim();
        }
    }
    content.trim()
}
