use std::path::PathBuf;
use std::sync::Arc;

use crate::application::services::{IngestionReport, IngestionService};

#[derive(Debug)]
pub enum IngestDocumentsError {
    IngestionFailed(String),
}

impl std::fmt::Display for IngestDocumentsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IngestDocumentsError::IngestionFailed(msg) => write!(f, "Ingestion failed: {}", msg),
        }
    }
}

impl std::error::Error for IngestDocumentsError {}

#[derive(Debug, Clone)]
pub struct IngestDocumentsRequest {
    pub folder: PathBuf,
}

#[derive(Debug, Clone)]
pub struct IngestDocumentsResponse {
    pub report: IngestionReport,
    pub elapsed_ms: u64,
}

pub struct IngestDocumentsUseCase {
    ingestion_service: Arc<IngestionService>,
}

impl IngestDocumentsUseCase {
    pub fn new(ingestion_service: Arc<IngestionService>) -> Self {
        Self { ingestion_service }
    }

    pub async fn execute(
        &self,
        request: IngestDocumentsRequest,
    ) -> Result<IngestDocumentsResponse, IngestDocumentsError> {
        let start_time = std::time::Instant::now();
        tracing::info!("Ingesting documents from {}", request.folder.display());

        let report = self
            .ingestion_service
            .ingest_folder(&request.folder)
            .await
            .map_err(|e| IngestDocumentsError::IngestionFailed(e.to_string()))?;

        Ok(IngestDocumentsResponse {
            report,
            elapsed_ms: start_time.elapsed().as_millis() as u64,
        })
    }
}
