//! Provider Models
//!
//! Types describing AI providers and the models they host.
//! A `ModelRef` names a configured model; the `ProviderResolver`
//! collaborator (see `services::knowledge::params`) maps it to the
//! `Provider` that serves it.

use serde::{Deserialize, Serialize};

/// Supported provider families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    OpenAi,
    Gemini,
    Anthropic,
    Azure,
    Ollama,
    SiliconFlow,
}

impl std::fmt::Display for ProviderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderType::OpenAi => write!(f, "openai"),
            ProviderType::Gemini => write!(f, "gemini"),
            ProviderType::Anthropic => write!(f, "anthropic"),
            ProviderType::Azure => write!(f, "azure"),
            ProviderType::Ollama => write!(f, "ollama"),
            ProviderType::SiliconFlow => write!(f, "siliconflow"),
        }
    }
}

/// Reference to a configured model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelRef {
    /// Model identifier as the provider knows it (e.g. "text-embedding-3-small")
    pub id: String,
    /// Identifier of the provider hosting this model
    pub provider: String,
}

impl ModelRef {
    pub fn new(id: impl Into<String>, provider: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            provider: provider.into(),
        }
    }
}

/// A configured AI provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Provider {
    /// Unique provider identifier
    pub id: String,
    /// Provider family
    pub provider_type: ProviderType,
    /// API host, e.g. "https://api.siliconflow.cn"
    pub api_host: String,
    /// API key (not needed for local providers)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// API version (Azure-style providers)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
}

impl Provider {
    /// The provider endpoint base URL: the API host without a trailing slash.
    pub fn base_url(&self) -> String {
        self.api_host.trim_end_matches('/').to_string()
    }
}
