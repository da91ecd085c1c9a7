use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{ChunkMetadata, ChunkType};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    text: String,
    chunk_index: i32,
    metadata: ChunkMetadata,
}

impl Chunk {
    pub fn new(text: String, chunk_index: i32, metadata: ChunkMetadata) -> Self {
        Self {
            text,
            chunk_index,
            metadata,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn chunk_index(&self) -> i32 {
        self.chunk_index
    }

    pub fn metadata(&self) -> &ChunkMetadata {
        &self.metadata
    }

    pub fn chunk_type(&self) -> ChunkType {
        self.metadata.chunk_type
    }

    pub fn character_count(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}
