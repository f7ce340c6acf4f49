//! Knowledge Context - Retrieval-Augmented Reference Assembly
//!
//! This library assembles retrieval-augmented context for chat
//! messages. It includes:
//! - Search parameter derivation for knowledge base providers
//! - Source resolution against managed file storage
//! - Reference assembly into a renderable JSON block
//! - Best-effort reranking over an external scoring endpoint
//!
//! External collaborators (the search engine, the file store, the
//! provider registry) are consumed through traits so callers and
//! tests can supply their own implementations.

pub mod models;
pub mod services;
pub mod utils;

pub use models::{
    FileRecord, HitMetadata, KnowledgeBase, KnowledgeItem, KnowledgeItemType, Message, ModelRef,
    Provider, ProviderType, SearchHit,
};
pub use services::knowledge::params::{
    build_knowledge_params, KnowledgeBaseParams, ProviderResolver, DEFAULT_CHUNK_OVERLAP,
    DEFAULT_CHUNK_SIZE, DEFAULT_RERANK_MODEL,
};
pub use services::knowledge::references::{
    KnowledgeContextService, KnowledgeSearcher, Reference, ResolvedHit, MAX_REFERENCES,
};
pub use services::knowledge::reranker::{HttpReranker, NoopReranker, Reranker};
pub use services::knowledge::source::{FileStore, SourceResolver};
pub use utils::error::{AppError, AppResult};
