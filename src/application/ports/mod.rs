pub mod completion_provider;
pub mod document_chunker;
pub mod document_extractor;
pub mod embedding_provider;
pub mod vector_index;

pub use completion_provider::CompletionProvider;
pub use document_chunker::DocumentChunker;
pub use document_extractor::DocumentExtractor;
pub use embedding_provider::EmbeddingProvider;
pub use vector_index::VectorIndex;
