use std::sync::Arc;

use crate::application::ports::embedding_provider::{EmbeddingProvider, EmbeddingRequest};
use crate::application::ports::vector_index::{SimilaritySearchResult, VectorIndex};
use crate::infrastructure::timing::timed;

pub const DEFAULT_TOP_K: usize = 4;

#[derive(Debug)]
pub enum RetrievalError {
    EmbeddingError(String),
    IndexError(String),
}

impl std::fmt::Display for RetrievalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RetrievalError::EmbeddingError(msg) => write!(f, "Embedding error: {}", msg),
            RetrievalError::IndexError(msg) => write!(f, "Index error: {}", msg),
        }
    }
}

impl std::error::Error for RetrievalError {}

pub struct RetrievalService {
    embedding_provider: Arc<dyn EmbeddingProvider>,
    vector_index: Arc<dyn VectorIndex>,
}

impl RetrievalService {
    pub fn new(
        embedding_provider: Arc<dyn EmbeddingProvider>,
        vector_index: Arc<dyn VectorIndex>,
    ) -> Self {
        Self {
            embedding_provider,
            vector_index,
        }
    }

    /// Embeds `query` with the ingestion model and returns up to `k` chunks,
    /// most similar first. No relevance threshold is applied.
    pub async fn retrieve(
        &self,
        query: &str,
        k: usize,
    ) -> Result<Vec<SimilaritySearchResult>, RetrievalError> {
        if k == 0 {
            return Ok(Vec::new());
        }

        let embedding_response = timed(
            "query embedding",
            self.embedding_provider.generate_embedding(EmbeddingRequest {
                text: query.to_string(),
            }),
        )
        .await
        .map_err(|e| RetrievalError::EmbeddingError(e.to_string()))?;

        let results = timed(
            "similarity search",
            self.vector_index.search(&embedding_response.embedding, k),
        )
        .await
        .map_err(|e| RetrievalError::IndexError(e.to_string()))?;

        tracing::debug!(
            "Retrieved {} chunks from collection '{}'",
            results.len(),
            self.vector_index.collection()
        );

        Ok(results)
    }
}
