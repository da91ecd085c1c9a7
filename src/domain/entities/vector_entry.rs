use chrono::{DateTime, Utc};
use pgvector::Vector;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::Chunk;
use crate::domain::value_objects::ChunkMetadata;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorEntry {
    id: Uuid,
    text: String,
    embedding: Vector,
    metadata: ChunkMetadata,
    chunk_index: i32,
    created_at: DateTime<Utc>,
}

impl VectorEntry {
    pub fn new(text: String, embedding: Vector, metadata: ChunkMetadata, chunk_index: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            text,
            embedding,
            metadata,
            chunk_index,
            created_at: Utc::now(),
        }
    }

    pub fn from_chunk(chunk: &Chunk, embedding: Vector) -> Self {
        Self::new(
            chunk.text().to_string(),
            embedding,
            chunk.metadata().clone(),
            chunk.chunk_index(),
        )
    }

    pub fn restore(
        id: Uuid,
        text: String,
        embedding: Vector,
        metadata: ChunkMetadata,
        chunk_index: i32,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            text,
            embedding,
            metadata,
            chunk_index,
            created_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn embedding(&self) -> &Vector {
        &self.embedding
    }

    pub fn metadata(&self) -> &ChunkMetadata {
        &self.metadata
    }

    pub fn chunk_index(&self) -> i32 {
        self.chunk_index
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn dimension(&self) -> usize {
        self.embedding.as_slice().len()
    }
}
