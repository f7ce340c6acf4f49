//! Knowledge References
//!
//! Orchestrates a single search-and-format cycle: queries the search
//! collaborator, optionally reranks the hits, resolves each hit's
//! originating file, truncates to a bounded reference set, and
//! serializes the result as a fenced JSON block for markdown rendering.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::future::join_all;
use serde::{Deserialize, Serialize};

use crate::models::{FileRecord, KnowledgeBase, KnowledgeItemType, Message, SearchHit};
use crate::services::knowledge::params::{build_knowledge_params, KnowledgeBaseParams, ProviderResolver};
use crate::services::knowledge::reranker::Reranker;
use crate::services::knowledge::source::SourceResolver;
use crate::utils::error::AppResult;

/// Upper bound on references produced from a single search
pub const MAX_REFERENCES: usize = 6;

/// Search collaborator: similarity search over an indexed knowledge base.
#[async_trait]
pub trait KnowledgeSearcher: Send + Sync {
    /// Run a similarity search and return hits in relevance order.
    async fn search(
        &self,
        search: &str,
        params: &KnowledgeBaseParams,
    ) -> AppResult<Vec<SearchHit>>;
}

/// A search hit paired with its resolved file record, when local.
#[derive(Debug, Clone)]
pub struct ResolvedHit {
    pub hit: SearchHit,
    pub file: Option<FileRecord>,
}

/// A serializable reference presented to the chat consumer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reference {
    /// Dense zero-based index over the retained set
    pub id: usize,
    /// Chunk content, verbatim
    pub content: String,
    /// Remote URL, markdown file link, or the raw source string
    #[serde(rename = "sourceUrl")]
    pub source_url: String,
    /// Content type of the matching knowledge base item, if any
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub item_type: Option<KnowledgeItemType>,
}

/// Assembles knowledge references for chat messages.
///
/// Collaborators are injected so tests can substitute them; the
/// reranker is optional and pass-through when unset.
pub struct KnowledgeContextService {
    searcher: Arc<dyn KnowledgeSearcher>,
    sources: SourceResolver,
    providers: Arc<dyn ProviderResolver>,
    reranker: Option<Arc<dyn Reranker>>,
}

impl KnowledgeContextService {
    /// Create a service without reranking.
    pub fn new(
        searcher: Arc<dyn KnowledgeSearcher>,
        sources: SourceResolver,
        providers: Arc<dyn ProviderResolver>,
    ) -> Self {
        Self {
            searcher,
            sources,
            providers,
            reranker: None,
        }
    }

    /// Add a reranking pass between search and reference assembly.
    pub fn with_reranker(mut self, reranker: Arc<dyn Reranker>) -> Self {
        self.reranker = Some(reranker);
        self
    }

    /// Assemble the reference block for a chat message.
    ///
    /// Returns a string containing a fenced ```json code block whose
    /// body is the pretty-printed array of references. Configuration
    /// errors (unresolvable embedding model) propagate; everything
    /// downstream of the search degrades instead of failing.
    pub async fn get_knowledge_references(
        &self,
        base: &KnowledgeBase,
        message: &Message,
    ) -> AppResult<String> {
        let params = build_knowledge_params(base, self.providers.as_ref())?;

        let mut hits = self.searcher.search(&message.content, &params).await?;

        if let Some(reranker) = &self.reranker {
            hits = reranker.rerank(base, &message.content, hits).await;
        }

        // Resolution fans out over every hit before the reference cap
        // is applied; join_all keeps the search-result order.
        let resolved: Vec<ResolvedHit> = join_all(hits.into_iter().map(|hit| async move {
            let file = self.sources.resolve(&hit.metadata.source).await;
            ResolvedHit { hit, file }
        }))
        .await;

        let references: Vec<Reference> = resolved
            .into_iter()
            .take(MAX_REFERENCES)
            .enumerate()
            .map(|(index, item)| {
                let item_type = base
                    .items
                    .iter()
                    .find(|i| i.unique_id == item.hit.metadata.unique_loader_id)
                    .map(|i| i.item_type);
                Reference {
                    id: index,
                    source_url: source_url_for(&item),
                    content: item.hit.page_content,
                    item_type,
                }
            })
            .collect();

        tracing::debug!(
            "Assembled {} knowledge references for base '{}'",
            references.len(),
            base.id
        );

        let body = serde_json::to_string_pretty(&references)?;
        Ok(format!("```json\n{body}\n```"))
    }
}

/// Source URL precedence: remote URL passthrough, then resolved-file
/// markdown link, then the raw source string.
fn source_url_for(item: &ResolvedHit) -> String {
    let source = &item.hit.metadata.source;
    if source.starts_with("http") {
        return source.clone();
    }

    if let Some(file) = &item.file {
        return format!("[{}](http://file/{})", file.origin_name, file.name);
    }

    source.clone()
}
