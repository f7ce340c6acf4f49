//! Knowledge Base Models
//!
//! Configuration of a knowledge base (embedding/rerank model settings
//! plus its indexed items) and the wire types exchanged with the
//! search collaborator.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::provider::ModelRef;

/// Content type of an indexed knowledge base item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KnowledgeItemType {
    File,
    Url,
    Note,
    Sitemap,
    Directory,
}

/// An item indexed into a knowledge base
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeItem {
    /// Loader identifier tying search hits back to this item
    pub unique_id: String,
    /// Content type of the item
    #[serde(rename = "type")]
    pub item_type: KnowledgeItemType,
}

/// Configuration of a knowledge base. Immutable per request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeBase {
    /// Unique knowledge base identifier
    pub id: String,
    /// Human-readable name
    #[serde(default)]
    pub name: String,
    /// Embedding model used to index and search this base
    pub model: ModelRef,
    /// Embedding dimensionality
    pub dimensions: u32,
    /// Optional rerank model for secondary relevance scoring
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rerank_model: Option<ModelRef>,
    /// Chunk size used at indexing time (default 500)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunk_size: Option<u32>,
    /// Chunk overlap used at indexing time (default 50)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunk_overlap: Option<u32>,
    /// Items indexed into this base
    #[serde(default)]
    pub items: Vec<KnowledgeItem>,
}

/// A chat message whose content seeds the knowledge search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Message text content
    pub content: String,
}

impl Message {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

/// Metadata attached to a search hit.
///
/// Upstream loaders attach arbitrary fields; the ones this crate reads
/// default to empty strings when absent, everything else is preserved
/// in `extra`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HitMetadata {
    /// Originating content source (URL or path)
    #[serde(default)]
    pub source: String,
    /// Loader identifier of the knowledge base item that produced this chunk
    #[serde(default, rename = "uniqueLoaderId")]
    pub unique_loader_id: String,
    /// Loader-specific fields opaque to this crate
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// A unit of retrieved content returned by the search collaborator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    /// Chunk text content
    #[serde(rename = "pageContent")]
    pub page_content: String,
    /// Similarity score from the vector search (overwritten by reranking)
    #[serde(default)]
    pub score: f32,
    /// Hit metadata
    #[serde(default)]
    pub metadata: HitMetadata,
}
