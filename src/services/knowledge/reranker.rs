//! Reranker
//!
//! Secondary relevance scoring over already-retrieved search hits.
//!
//! - `NoopReranker`: pass-through, preserves original order
//! - `HttpReranker`: calls the rerank endpoint of the provider hosting
//!   the knowledge base's rerank model and reorders hits by the
//!   returned relevance scores
//!
//! Reranking is best-effort: every failure path degrades to the
//! original hit list, so a broken rerank service never fails the
//! surrounding chat turn.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::models::{KnowledgeBase, SearchHit};
use crate::services::knowledge::params::{
    ProviderResolver, DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE,
};
use crate::utils::error::{AppError, AppResult};

/// Trait for reranking search hits against a query.
#[async_trait]
pub trait Reranker: Send + Sync {
    /// Rerank hits by relevance to `search`.
    ///
    /// Never fails: implementations return the input unchanged when
    /// scoring is unavailable.
    async fn rerank(
        &self,
        base: &KnowledgeBase,
        search: &str,
        hits: Vec<SearchHit>,
    ) -> Vec<SearchHit>;
}

/// No-op reranker that preserves original order.
pub struct NoopReranker;

#[async_trait]
impl Reranker for NoopReranker {
    async fn rerank(
        &self,
        _base: &KnowledgeBase,
        _search: &str,
        hits: Vec<SearchHit>,
    ) -> Vec<SearchHit> {
        hits
    }
}

#[derive(Debug, Serialize)]
struct RerankRequest<'a> {
    model: &'a str,
    query: &'a str,
    documents: Vec<&'a str>,
    top_n: usize,
    return_documents: bool,
    max_chunks_per_doc: u32,
    overlap_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct RerankResponse {
    results: Vec<RerankEntry>,
}

#[derive(Debug, Deserialize)]
struct RerankEntry {
    index: usize,
    relevance_score: f32,
}

/// Reranker backed by a provider's `/v1/rerank` endpoint.
pub struct HttpReranker {
    client: reqwest::Client,
    providers: Arc<dyn ProviderResolver>,
}

impl HttpReranker {
    /// Create a reranker resolving endpoints through `providers`.
    pub fn new(providers: Arc<dyn ProviderResolver>) -> Self {
        Self {
            client: reqwest::Client::new(),
            providers,
        }
    }

    /// Issue the rerank request and map the scored results back onto
    /// the original hits. Any error here is recovered by the caller.
    async fn try_rerank(
        &self,
        base: &KnowledgeBase,
        search: &str,
        hits: &[SearchHit],
    ) -> AppResult<Vec<SearchHit>> {
        let rerank_model = base
            .rerank_model
            .as_ref()
            .ok_or_else(|| AppError::config("knowledge base has no rerank model"))?;
        let provider = self.providers.provider_for_model(rerank_model)?;

        let documents: Vec<&str> = hits.iter().map(|hit| hit.page_content.as_str()).collect();
        let body = RerankRequest {
            model: &rerank_model.id,
            query: search,
            top_n: documents.len(),
            documents,
            return_documents: false,
            max_chunks_per_doc: base.chunk_size.unwrap_or(DEFAULT_CHUNK_SIZE),
            overlap_tokens: base.chunk_overlap.unwrap_or(DEFAULT_CHUNK_OVERLAP),
        };

        let response = self
            .client
            .post(format!("{}/v1/rerank", provider.base_url()))
            .header(
                "Authorization",
                format!("Bearer {}", provider.api_key.clone().unwrap_or_default()),
            )
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            tracing::error!("Rerank API error: {}", body_text);
            return Err(AppError::internal(format!(
                "rerank endpoint returned {status}"
            )));
        }

        let parsed: RerankResponse = response.json().await?;

        let mut reranked = Vec::with_capacity(parsed.results.len());
        for entry in parsed.results {
            match hits.get(entry.index) {
                Some(hit) => {
                    let mut hit = hit.clone();
                    hit.score = entry.relevance_score;
                    reranked.push(hit);
                }
                None => {
                    tracing::warn!(
                        "Rerank result index {} out of range ({} documents)",
                        entry.index,
                        hits.len()
                    );
                }
            }
        }

        Ok(reranked)
    }
}

#[async_trait]
impl Reranker for HttpReranker {
    async fn rerank(
        &self,
        base: &KnowledgeBase,
        search: &str,
        hits: Vec<SearchHit>,
    ) -> Vec<SearchHit> {
        if hits.is_empty() {
            return hits;
        }

        match self.try_rerank(base, search, &hits).await {
            Ok(reranked) => reranked,
            Err(e) => {
                tracing::warn!("Reranking failed, keeping original order: {}", e);
                hits
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HitMetadata, ModelRef, Provider, ProviderType};
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct StaticResolver {
        provider: Provider,
    }

    impl ProviderResolver for StaticResolver {
        fn provider_for_model(&self, _model: &ModelRef) -> AppResult<Provider> {
            Ok(self.provider.clone())
        }
    }

    fn resolver_for(api_host: &str) -> Arc<dyn ProviderResolver> {
        Arc::new(StaticResolver {
            provider: Provider {
                id: "p1".to_string(),
                provider_type: ProviderType::SiliconFlow,
                api_host: api_host.to_string(),
                api_key: Some("rk-test".to_string()),
                api_version: None,
            },
        })
    }

    fn base_with_rerank_model() -> KnowledgeBase {
        KnowledgeBase {
            id: "kb-1".to_string(),
            name: "docs".to_string(),
            model: ModelRef::new("embed-1", "p1"),
            dimensions: 1024,
            rerank_model: Some(ModelRef::new("BAAI/bge-reranker-v2-m3", "p1")),
            chunk_size: None,
            chunk_overlap: None,
            items: vec![],
        }
    }

    fn hit(content: &str, score: f32) -> SearchHit {
        SearchHit {
            page_content: content.to_string(),
            score,
            metadata: HitMetadata::default(),
        }
    }

    #[tokio::test]
    async fn empty_hits_skip_the_network_call() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/rerank"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let reranker = HttpReranker::new(resolver_for(&server.uri()));
        let result = reranker
            .rerank(&base_with_rerank_model(), "query", vec![])
            .await;
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn service_order_and_scores_are_applied() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/rerank"))
            .and(header("Authorization", "Bearer rk-test"))
            .and(body_partial_json(serde_json::json!({
                "model": "BAAI/bge-reranker-v2-m3",
                "query": "query",
                "top_n": 3,
                "return_documents": false,
                "max_chunks_per_doc": 500,
                "overlap_tokens": 50,
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "results": [
                    {"index": 2, "relevance_score": 0.9},
                    {"index": 0, "relevance_score": 0.4},
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let reranker = HttpReranker::new(resolver_for(&server.uri()));
        let hits = vec![hit("first", 0.1), hit("second", 0.2), hit("third", 0.3)];
        let result = reranker
            .rerank(&base_with_rerank_model(), "query", hits)
            .await;

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].page_content, "third");
        assert!((result[0].score - 0.9).abs() < 1e-6);
        assert_eq!(result[1].page_content, "first");
        assert!((result[1].score - 0.4).abs() < 1e-6);
    }

    #[tokio::test]
    async fn http_failure_returns_original_order() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/rerank"))
            .respond_with(ResponseTemplate::new(500).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let reranker = HttpReranker::new(resolver_for(&server.uri()));
        let hits = vec![hit("first", 0.1), hit("second", 0.2)];
        let result = reranker
            .rerank(&base_with_rerank_model(), "query", hits)
            .await;

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].page_content, "first");
        assert!((result[0].score - 0.1).abs() < 1e-6);
        assert_eq!(result[1].page_content, "second");
    }

    #[tokio::test]
    async fn connection_failure_returns_original_order() {
        // Discard-port endpoint: connection refused without a server.
        let reranker = HttpReranker::new(resolver_for("http://127.0.0.1:9"));
        let hits = vec![hit("only", 0.5)];
        let result = reranker
            .rerank(&base_with_rerank_model(), "query", hits)
            .await;

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].page_content, "only");
        assert!((result[0].score - 0.5).abs() < 1e-6);
    }

    #[tokio::test]
    async fn malformed_response_returns_original_order() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/rerank"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let reranker = HttpReranker::new(resolver_for(&server.uri()));
        let hits = vec![hit("first", 0.1)];
        let result = reranker
            .rerank(&base_with_rerank_model(), "query", hits)
            .await;
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].page_content, "first");
    }

    #[tokio::test]
    async fn out_of_range_index_is_skipped() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/rerank"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "results": [
                    {"index": 7, "relevance_score": 0.9},
                    {"index": 0, "relevance_score": 0.4},
                ]
            })))
            .mount(&server)
            .await;

        let reranker = HttpReranker::new(resolver_for(&server.uri()));
        let hits = vec![hit("first", 0.1)];
        let result = reranker
            .rerank(&base_with_rerank_model(), "query", hits)
            .await;

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].page_content, "first");
        assert!((result[0].score - 0.4).abs() < 1e-6);
    }

    #[tokio::test]
    async fn missing_rerank_model_returns_original_order() {
        let reranker = HttpReranker::new(resolver_for("http://127.0.0.1:9"));
        let mut base = base_with_rerank_model();
        base.rerank_model = None;

        let hits = vec![hit("first", 0.1)];
        let result = reranker.rerank(&base, "query", hits).await;
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].page_content, "first");
    }

    #[tokio::test]
    async fn noop_reranker_preserves_order_and_scores() {
        let reranker = NoopReranker;
        let hits = vec![hit("first", 0.9), hit("second", 0.8)];
        let result = reranker
            .rerank(&base_with_rerank_model(), "query", hits)
            .await;
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].page_content, "first");
        assert!((result[1].score - 0.8).abs() < 1e-6);
    }
}
