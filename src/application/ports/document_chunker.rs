use crate::domain::entities::{Chunk, RawDocument};

/// Turns an extracted document into retrieval-sized chunks.
pub trait DocumentChunker: Send + Sync {
    fn chunk_document(&self, document: &RawDocument) -> Vec<Chunk>;
}
