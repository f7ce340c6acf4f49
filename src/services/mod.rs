//! Services
//!
//! Business logic services for the crate.

pub mod knowledge;

pub use knowledge::params::{build_knowledge_params, KnowledgeBaseParams, ProviderResolver};
pub use knowledge::references::{KnowledgeContextService, KnowledgeSearcher, Reference};
pub use knowledge::reranker::{HttpReranker, NoopReranker, Reranker};
pub use knowledge::source::{FileStore, SourceResolver};
