pub mod ingestion_service;
pub mod prompt_composer;
pub mod rag_service;
pub mod retrieval_service;

pub use ingestion_service::{IngestionReport, IngestionService};
pub use prompt_composer::PromptComposer;
pub use rag_service::{RagAnswer, RagService};
pub use retrieval_service::RetrievalService;
