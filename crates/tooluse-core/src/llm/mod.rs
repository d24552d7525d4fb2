//! LLM client with tool-calling loop
//!
//! Thin pass-through over the provider HTTP APIs. The client owns a
//! [`ToolCollection`] resolved from the config's `allowed_tools`, formats
//! its schemas through the matching [`ProviderAdapter`], and runs the
//! request / extract-calls / dispatch / feed-back loop until the model
//! stops asking for tools.
//!
//! A failed tool call is reported back to the model as a structured
//! error payload; it never crashes the conversation loop.

mod error;

pub use error::{ProviderError, ProviderResult};

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::adapters::{AnthropicAdapter, OllamaAdapter, ProviderAdapter};
use crate::config::{ClientType, ModelConfig};
use crate::logging::Logger;
use crate::schema::CompletionBackend;
use crate::tools::{ToolCollection, ToolRegistry};

/// Anthropic messages endpoint
const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";

/// Anthropic API version header value
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Upper bound on request/dispatch rounds within one `chat` call
const MAX_TOOL_ROUNDS: u32 = 10;

/// Client for one configured provider plus its allowed tools
pub struct LlmClient {
    http: reqwest::Client,
    config: ModelConfig,
    api_key: Option<String>,
    tools: ToolCollection,
    logger: Arc<dyn Logger>,
}

impl std::fmt::Debug for LlmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl LlmClient {
    /// Build a client, reading the Anthropic key from `ANTHROPIC_API_KEY`
    pub fn new(
        config: ModelConfig,
        registry: Arc<ToolRegistry>,
        logger: Arc<dyn Logger>,
    ) -> ProviderResult<Self> {
        let api_key = match config.client_type {
            ClientType::Anthropic => Some(
                std::env::var("ANTHROPIC_API_KEY")
                    .map_err(|_| ProviderError::missing_api_key("anthropic"))?,
            ),
            ClientType::Ollama => None,
        };
        Self::build(config, registry, api_key, logger)
    }

    /// Build a client with an explicit API key
    pub fn with_api_key(
        config: ModelConfig,
        registry: Arc<ToolRegistry>,
        api_key: impl Into<String>,
        logger: Arc<dyn Logger>,
    ) -> ProviderResult<Self> {
        Self::build(config, registry, Some(api_key.into()), logger)
    }

    fn build(
        config: ModelConfig,
        registry: Arc<ToolRegistry>,
        api_key: Option<String>,
        logger: Arc<dyn Logger>,
    ) -> ProviderResult<Self> {
        let tools = Self::resolve_tools(&config, &registry, &logger)?;
        Ok(Self {
            http: reqwest::Client::new(),
            config,
            api_key,
            tools,
            logger,
        })
    }

    /// Resolve `allowed_tools` into a collection over the registry
    ///
    /// `None` means every registered tool. A requested name the registry
    /// does not know is an error rather than a silent drop.
    fn resolve_tools(
        config: &ModelConfig,
        registry: &Arc<ToolRegistry>,
        logger: &Arc<dyn Logger>,
    ) -> ProviderResult<ToolCollection> {
        let all = ToolCollection::all(Arc::clone(registry));
        let allowed = match &config.allowed_tools {
            None => {
                logger.debug(&format!("[LlmClient] All tools allowed: {:?}", all.names()));
                return Ok(all);
            }
            Some(allowed) => allowed,
        };

        let available = registry.available_tools();
        for name in allowed {
            if !available.contains(name) {
                return Err(ProviderError::UnknownTool(name.clone()));
            }
        }

        let excluded: Vec<String> = available
            .iter()
            .filter(|n| !allowed.contains(*n))
            .cloned()
            .collect();
        logger.debug(&format!("[LlmClient] Excluded tools: {:?}", excluded));
        Ok(all.exclude(excluded))
    }

    /// The collection of tools this client exposes to the model
    pub fn tools(&self) -> &ToolCollection {
        &self.tools
    }

    fn adapter(&self) -> &'static dyn ProviderAdapter {
        match self.config.client_type {
            ClientType::Anthropic => &AnthropicAdapter,
            ClientType::Ollama => &OllamaAdapter,
        }
    }

    fn provider_name(&self) -> &'static str {
        match self.config.client_type {
            ClientType::Anthropic => "anthropic",
            ClientType::Ollama => "ollama",
        }
    }

    /// POST one request and return the raw response JSON
    async fn send(&self, messages: &[Value], tools: &[Value]) -> ProviderResult<Value> {
        let request = match self.config.client_type {
            ClientType::Anthropic => {
                let key = self
                    .api_key
                    .as_deref()
                    .ok_or_else(|| ProviderError::missing_api_key("anthropic"))?;
                let mut body = json!({
                    "model": self.config.model,
                    "max_tokens": self.config.max_tokens,
                    "messages": messages,
                });
                if !tools.is_empty() {
                    body["tools"] = json!(tools);
                }
                self.http
                    .post(ANTHROPIC_API_URL)
                    .header("x-api-key", key)
                    .header("anthropic-version", ANTHROPIC_VERSION)
                    .json(&body)
            }
            ClientType::Ollama => {
                let mut body = json!({
                    "model": self.config.model,
                    "messages": messages,
                    "stream": false,
                });
                if !tools.is_empty() {
                    body["tools"] = json!(tools);
                }
                let url = format!("{}/api/chat", self.config.host.trim_end_matches('/'));
                self.http.post(url).json(&body)
            }
        };

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::api_error(
                self.provider_name(),
                status.as_u16(),
                message,
            ));
        }
        Ok(response.json().await?)
    }

    /// Run the conversation until the model stops calling tools
    ///
    /// Messages are provider-shaped JSON objects. Returns the final text
    /// reply.
    pub async fn chat(&self, mut messages: Vec<Value>) -> ProviderResult<String> {
        let adapter = self.adapter();
        let schemas = self
            .tools
            .schemas()
            .map_err(|e| ProviderError::Other(e.to_string()))?;
        let tools: Vec<Value> = schemas.iter().map(|s| adapter.format_schema(s)).collect();

        for _ in 0..MAX_TOOL_ROUNDS {
            let response = self.send(&messages, &tools).await?;
            let calls = adapter.extract_tool_calls(&response);
            if calls.is_empty() {
                return Ok(adapter.response_text(&response).unwrap_or_default());
            }

            messages.push(adapter.assistant_message(&response));
            for call in calls {
                self.logger.info(&format!(
                    "[LlmClient] Dispatching tool call: {}",
                    call.name
                ));
                let output = match self.tools.call(&call.name, call.arguments.clone()).await {
                    Ok(value) => value,
                    Err(e) => {
                        // Reported to the model as data, not recovered here
                        self.logger
                            .error(&format!("[LlmClient] Tool call failed: {}", e));
                        json!({"error": e.to_string()})
                    }
                };
                messages.push(adapter.format_tool_response(&call, &output));
            }
        }

        Err(ProviderError::ToolLoopExceeded(MAX_TOOL_ROUNDS))
    }
}

#[async_trait]
impl CompletionBackend for LlmClient {
    /// One-shot completion with no tools, used by delegated schema generation
    async fn complete(
        &self,
        prompt: &str,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let messages = vec![json!({"role": "user", "content": prompt})];
        let response = self.send(&messages, &[]).await?;
        Ok(self.adapter().response_text(&response).unwrap_or_default())
    }
}
