pub mod document_extractors;
pub mod ollama_client;
pub mod semantic_chunking;

pub use ollama_client::{OllamaClient, OllamaCompletionProvider, OllamaEmbeddingProvider};
