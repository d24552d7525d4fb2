//! Settings file handling
//!
//! The client is configured from the `[llm]` table of a TOML file:
//!
//! ```toml
//! [llm]
//! client_type = "ollama"
//! model = "llama3.1"
//! host = "http://localhost:11434"
//! allowed_tools = ["add", "subtract"]
//! max_tokens = 1000
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while loading settings
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Which provider API the client talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientType {
    Anthropic,
    Ollama,
}

/// Model and tool settings for one client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Provider API to use
    pub client_type: ClientType,
    /// Model identifier as the provider knows it
    pub model: String,
    /// Host for self-hosted providers (Ollama)
    #[serde(default = "default_host")]
    pub host: String,
    /// Tools the model may call; `None` means every registered tool
    #[serde(default)]
    pub allowed_tools: Option<Vec<String>>,
    /// Response token budget
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_host() -> String {
    "http://localhost:11434".to_string()
}

fn default_max_tokens() -> u32 {
    1000
}

/// On-disk settings file layout
#[derive(Debug, Deserialize)]
struct SettingsFile {
    llm: ModelConfig,
}

impl ModelConfig {
    /// Minimal config for the given provider and model
    pub fn new(client_type: ClientType, model: impl Into<String>) -> Self {
        Self {
            client_type,
            model: model.into(),
            host: default_host(),
            allowed_tools: None,
            max_tokens: default_max_tokens(),
        }
    }

    /// Restrict the client to the named tools
    pub fn with_allowed_tools(mut self, tools: Vec<String>) -> Self {
        self.allowed_tools = Some(tools);
        self
    }

    /// Parse the `[llm]` table of a TOML string
    pub fn from_toml_str(toml_str: &str) -> ConfigResult<Self> {
        let file: SettingsFile = toml::from_str(toml_str)?;
        Ok(file.llm)
    }

    /// Load settings from a TOML file
    pub fn from_toml(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Default settings location under the user config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("tooluse").join("config.toml"))
    }
}
