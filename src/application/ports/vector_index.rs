use async_trait::async_trait;
use pgvector::Vector;

use crate::domain::entities::VectorEntry;
use crate::domain::value_objects::ChunkMetadata;

#[derive(Debug)]
pub enum VectorIndexError {
    CollectionNotFound(String),
    DatabaseError(String),
    DimensionMismatch { expected: usize, actual: usize },
    ValidationError(String),
}

impl std::fmt::Display for VectorIndexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VectorIndexError::CollectionNotFound(name) => write!(
                f,
                "Vector collection '{}' not found; run the ingestion first",
                name
            ),
            VectorIndexError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            VectorIndexError::DimensionMismatch { expected, actual } => write!(
                f,
                "Embedding dimension mismatch: expected {}, got {}",
                expected, actual
            ),
            VectorIndexError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
        }
    }
}

impl std::error::Error for VectorIndexError {}

#[derive(Debug, Clone, PartialEq)]
pub struct SimilaritySearchResult {
    pub text: String,
    pub metadata: ChunkMetadata,
    /// Backend-specific similarity, higher is closer. `None` when the backend
    /// does not report one.
    pub score: Option<f32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CollectionInfo {
    pub name: String,
    pub embedding_model: String,
    pub dimension: usize,
    pub entry_count: i64,
}

#[async_trait]
pub trait VectorIndex: Send + Sync {
    async fn add(&self, entries: &[VectorEntry]) -> Result<(), VectorIndexError>;

    /// Replaces every entry of the collection with `entries` in one commit.
    async fn rebuild(
        &self,
        entries: &[VectorEntry],
        embedding_model: &str,
    ) -> Result<(), VectorIndexError>;

    /// At most `k` results, most similar first.
    async fn search(
        &self,
        query: &Vector,
        k: usize,
    ) -> Result<Vec<SimilaritySearchResult>, VectorIndexError>;

    async fn count(&self) -> Result<i64, VectorIndexError>;

    fn collection(&self) -> &str;
}
