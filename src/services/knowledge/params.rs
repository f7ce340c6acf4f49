//! Knowledge Search Parameters
//!
//! Derives the connection parameters sent to the search collaborator
//! from a knowledge base configuration: provider endpoint, credentials,
//! chunking settings and the rerank model, with defaults substituted
//! for anything unset.

use serde::{Deserialize, Serialize};

use crate::models::{KnowledgeBase, ModelRef, Provider, ProviderType};
use crate::utils::error::AppResult;

/// Chunk size used when the knowledge base does not set one
pub const DEFAULT_CHUNK_SIZE: u32 = 500;
/// Chunk overlap used when the knowledge base does not set one
pub const DEFAULT_CHUNK_OVERLAP: u32 = 50;
/// Public reranker used when the knowledge base has no rerank model
pub const DEFAULT_RERANK_MODEL: &str = "BAAI/bge-reranker-v2-m3";
/// Placeholder credential for providers that do not require a key
pub const API_KEY_PLACEHOLDER: &str = "secret";

/// Resolves a model reference to the provider serving it.
///
/// An unresolvable model is a configuration error; implementations
/// return `AppError::Config` rather than guessing.
pub trait ProviderResolver: Send + Sync {
    fn provider_for_model(&self, model: &ModelRef) -> AppResult<Provider>;
}

/// Request-scoped search parameters derived from a knowledge base
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeBaseParams {
    /// Knowledge base identifier
    pub id: String,
    /// Embedding model identifier
    pub model: String,
    /// Embedding dimensionality
    pub dimensions: u32,
    /// Provider API key, or the placeholder when absent
    pub api_key: String,
    /// Provider API version (Azure-style providers)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
    /// Fully-formed provider endpoint
    pub base_url: String,
    /// Chunk size
    pub chunk_size: u32,
    /// Chunk overlap
    pub chunk_overlap: u32,
    /// Rerank model identifier
    pub rerank_model: String,
}

/// Build search parameters for a knowledge base.
///
/// Pure derivation, no I/O. Gemini providers expose an
/// OpenAI-compatible surface under a fixed path suffix, so their base
/// endpoint gets "/v1beta/openai/" appended.
pub fn build_knowledge_params(
    base: &KnowledgeBase,
    providers: &dyn ProviderResolver,
) -> AppResult<KnowledgeBaseParams> {
    let provider = providers.provider_for_model(&base.model)?;

    let mut host = provider.base_url();
    if provider.provider_type == ProviderType::Gemini {
        host.push_str("/v1beta/openai/");
    }

    Ok(KnowledgeBaseParams {
        id: base.id.clone(),
        model: base.model.id.clone(),
        dimensions: base.dimensions,
        api_key: provider
            .api_key
            .clone()
            .filter(|key| !key.is_empty())
            .unwrap_or_else(|| API_KEY_PLACEHOLDER.to_string()),
        api_version: provider.api_version.clone(),
        base_url: host,
        chunk_size: base.chunk_size.unwrap_or(DEFAULT_CHUNK_SIZE),
        chunk_overlap: base.chunk_overlap.unwrap_or(DEFAULT_CHUNK_OVERLAP),
        rerank_model: base
            .rerank_model
            .as_ref()
            .map(|model| model.id.clone())
            .unwrap_or_else(|| DEFAULT_RERANK_MODEL.to_string()),
    })
}
