//! Knowledge System
//!
//! Retrieval-augmented context assembly for chat messages:
//! - `params`: search parameter derivation from a knowledge base config
//! - `source`: managed-storage source resolution
//! - `references`: search, resolve, truncate and serialize references
//! - `reranker`: secondary relevance scoring with graceful degradation

pub mod params;
pub mod references;
pub mod reranker;
pub mod source;
