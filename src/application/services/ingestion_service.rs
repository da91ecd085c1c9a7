use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::application::ports::embedding_provider::BatchEmbeddingRequest;
use crate::application::ports::{DocumentChunker, DocumentExtractor, EmbeddingProvider, VectorIndex};
use crate::domain::entities::{Chunk, VectorEntry};
use crate::domain::value_objects::ChunkType;
use crate::infrastructure::timing::timed;

pub const EMBEDDING_BATCH_SIZE: usize = 32;

#[derive(Debug)]
pub enum IngestionError {
    FolderError(String),
    EmbeddingError(String),
    IndexError(String),
}

impl std::fmt::Display for IngestionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IngestionError::FolderError(msg) => write!(f, "Folder error: {}", msg),
            IngestionError::EmbeddingError(msg) => write!(f, "Embedding error: {}", msg),
            IngestionError::IndexError(msg) => write!(f, "Index error: {}", msg),
        }
    }
}

impl std::error::Error for IngestionError {}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestionReport {
    pub files_seen: usize,
    pub files_ingested: usize,
    pub files_skipped: usize,
    pub text_chunks: usize,
    pub table_chunks: usize,
}

impl IngestionReport {
    pub fn total_chunks(&self) -> usize {
        self.text_chunks + self.table_chunks
    }
}

pub struct IngestionService {
    document_extractor: Arc<dyn DocumentExtractor>,
    document_chunker: Arc<dyn DocumentChunker>,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    vector_index: Arc<dyn VectorIndex>,
}

impl IngestionService {
    pub fn new(
        document_extractor: Arc<dyn DocumentExtractor>,
        document_chunker: Arc<dyn DocumentChunker>,
        embedding_provider: Arc<dyn EmbeddingProvider>,
        vector_index: Arc<dyn VectorIndex>,
    ) -> Self {
        Self {
            document_extractor,
            document_chunker,
            embedding_provider,
            vector_index,
        }
    }

    /// Extracts, chunks and embeds every supported file directly inside
    /// `folder`, then replaces the collection contents with the result.
    pub async fn ingest_folder(&self, folder: &Path) -> Result<IngestionReport, IngestionError> {
        let files = self.list_documents(folder).await?;
        let mut report = IngestionReport {
            files_seen: files.len(),
            ..Default::default()
        };

        let mut chunks: Vec<Chunk> = Vec::new();

        for path in &files {
            let document = match self.document_extractor.extract(path).await {
                Ok(document) => document,
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", path.display(), e);
                    report.files_skipped += 1;
                    continue;
                }
            };

            if document.is_empty() {
                tracing::warn!("Skipping {}: no text or tables found", path.display());
                report.files_skipped += 1;
                continue;
            }

            let document_chunks = self.document_chunker.chunk_document(&document);
            tracing::info!(
                "Extracted {} chunks from {} ({} pages)",
                document_chunks.len(),
                document.source(),
                document.page_count()
            );

            report.files_ingested += 1;
            chunks.extend(document_chunks);
        }

        report.text_chunks = chunks
            .iter()
            .filter(|c| c.chunk_type() == ChunkType::Text)
            .count();
        report.table_chunks = chunks.len() - report.text_chunks;

        if chunks.is_empty() {
            tracing::warn!(
                "No chunks produced from {}; collection '{}' left unchanged",
                folder.display(),
                self.vector_index.collection()
            );
            return Ok(report);
        }

        let entries = timed("chunk embedding", self.embed_chunks(&chunks)).await?;

        timed(
            "index rebuild",
            self.vector_index
                .rebuild(&entries, self.embedding_provider.model_name()),
        )
        .await
        .map_err(|e| IngestionError::IndexError(e.to_string()))?;

        tracing::info!(
            "Indexed {} chunks ({} text, {} table) into collection '{}'",
            report.total_chunks(),
            report.text_chunks,
            report.table_chunks,
            self.vector_index.collection()
        );

        Ok(report)
    }

    async fn list_documents(&self, folder: &Path) -> Result<Vec<PathBuf>, IngestionError> {
        let mut dir = tokio::fs::read_dir(folder).await.map_err(|e| {
            IngestionError::FolderError(format!("{}: {}", folder.display(), e))
        })?;

        let mut files = Vec::new();
        while let Some(entry) = dir
            .next_entry()
            .await
            .map_err(|e| IngestionError::FolderError(e.to_string()))?
        {
            let path = entry.path();
            let is_file = entry
                .file_type()
                .await
                .map(|t| t.is_file())
                .unwrap_or(false);

            if is_file && self.document_extractor.can_extract(&path) {
                files.push(path);
            }
        }

        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(files)
    }

    async fn embed_chunks(&self, chunks: &[Chunk]) -> Result<Vec<VectorEntry>, IngestionError> {
        let mut entries = Vec::with_capacity(chunks.len());

        for batch in chunks.chunks(EMBEDDING_BATCH_SIZE) {
            let texts: Vec<String> = batch.iter().map(|c| c.text().to_string()).collect();

            let response = self
                .embedding_provider
                .generate_embeddings(BatchEmbeddingRequest { texts })
                .await
                .map_err(|e| IngestionError::EmbeddingError(e.to_string()))?;

            if response.embeddings.len() != batch.len() {
                return Err(IngestionError::EmbeddingError(format!(
                    "expected {} embeddings, got {}",
                    batch.len(),
                    response.embeddings.len()
                )));
            }

            entries.extend(
                batch
                    .iter()
                    .zip(response.embeddings)
                    .map(|(chunk, embedding)| VectorEntry::from_chunk(chunk, embedding)),
            );
        }

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{ExtractedTable, RawDocument, TextBlock};
    use crate::infrastructure::external_services::semantic_chunking::RTSplitter;
    use crate::testing::{InMemoryVectorIndex, KeywordEmbeddingProvider, StaticDocumentExtractor};
    use std::fs;
    use tempfile::TempDir;

    fn document(name: &str, text: &str, with_table: bool) -> RawDocument {
        let tables = if with_table {
            vec![ExtractedTable {
                rows: vec![
                    vec!["Pollutant".to_string(), "Limit".to_string()],
                    vec!["PM2.5".to_string(), "60".to_string()],
                ],
                page: 1,
            }]
        } else {
            Vec::new()
        };

        RawDocument::new(
            name.to_string(),
            vec![TextBlock {
                text: text.to_string(),
                page: 1,
            }],
            tables,
        )
    }

    fn folder_with(files: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for name in files {
            fs::write(dir.path().join(name), b"%PDF-1.5").unwrap();
        }
        fs::create_dir(dir.path().join("nested.pdf")).unwrap();
        dir
    }

    fn service(
        extractor: StaticDocumentExtractor,
        index: Arc<InMemoryVectorIndex>,
    ) -> IngestionService {
        IngestionService::new(
            Arc::new(extractor),
            Arc::new(RTSplitter::default()),
            Arc::new(KeywordEmbeddingProvider::new(&["ozone", "pm25"])),
            index,
        )
    }

    #[tokio::test]
    async fn test_ingest_skips_broken_files() {
        let dir = folder_with(&["b.pdf", "A.PDF", "broken.pdf", "empty.pdf", "notes.txt"]);
        let extractor = StaticDocumentExtractor::default()
            .with_document("A.PDF", document("A.PDF", "ozone rises", true))
            .with_document("b.pdf", document("b.pdf", "pm25 falls", false))
            .with_document("empty.pdf", RawDocument::new("empty.pdf".to_string(), vec![], vec![]))
            .with_failure("broken.pdf");
        let index = Arc::new(InMemoryVectorIndex::default());

        let report = service(extractor, index.clone())
            .ingest_folder(dir.path())
            .await
            .unwrap();

        assert_eq!(report.files_seen, 4);
        assert_eq!(report.files_ingested, 2);
        assert_eq!(report.files_skipped, 2);
        assert_eq!(report.text_chunks, 2);
        assert_eq!(report.table_chunks, 1);

        let texts = index.texts();
        assert_eq!(texts.len(), 3);
        assert_eq!(texts[0], "ozone rises");
        assert_eq!(texts[2], "pm25 falls");
        assert_eq!(index.embedding_model().as_deref(), Some("keyword-test"));
    }

    #[tokio::test]
    async fn test_reingest_replaces_entries() {
        let dir = folder_with(&["a.pdf"]);
        let index = Arc::new(InMemoryVectorIndex::default());

        for _ in 0..2 {
            let extractor = StaticDocumentExtractor::default()
                .with_document("a.pdf", document("a.pdf", "ozone rises", false));
            service(extractor, index.clone())
                .ingest_folder(dir.path())
                .await
                .unwrap();
        }

        assert_eq!(index.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_zero_chunks_leaves_index_untouched() {
        let dir = folder_with(&["broken.pdf"]);
        let existing = document("old.pdf", "ozone", false);
        let index = Arc::new(InMemoryVectorIndex::default());
        service(
            StaticDocumentExtractor::default().with_document("broken.pdf", existing),
            index.clone(),
        )
        .ingest_folder(dir.path())
        .await
        .unwrap();

        let report = service(
            StaticDocumentExtractor::default().with_failure("broken.pdf"),
            index.clone(),
        )
        .ingest_folder(dir.path())
        .await
        .unwrap();

        assert_eq!(report.total_chunks(), 0);
        assert_eq!(report.files_skipped, 1);
        assert_eq!(index.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_batches_of_32() {
        let dir = folder_with(&["long.pdf"]);
        let text = (0..40)
            .map(|i| format!("{} {}", i, "ozone ".repeat(150)))
            .collect::<Vec<_>>()
            .join("\n\n");
        let embeddings = Arc::new(KeywordEmbeddingProvider::new(&["ozone"]));
        let index = Arc::new(InMemoryVectorIndex::default());
        let service = IngestionService::new(
            Arc::new(
                StaticDocumentExtractor::default()
                    .with_document("long.pdf", document("long.pdf", &text, false)),
            ),
            Arc::new(RTSplitter::default()),
            embeddings.clone(),
            index.clone(),
        );

        let report = service.ingest_folder(dir.path()).await.unwrap();

        assert!(report.text_chunks > EMBEDDING_BATCH_SIZE);
        assert_eq!(embeddings.batch_sizes()[0], EMBEDDING_BATCH_SIZE);
        assert_eq!(
            embeddings.batch_sizes().iter().sum::<usize>(),
            report.text_chunks
        );
        assert_eq!(index.count().await.unwrap() as usize, report.text_chunks);
    }

    #[tokio::test]
    async fn test_missing_folder() {
        let index = Arc::new(InMemoryVectorIndex::default());
        let result = service(StaticDocumentExtractor::default(), index)
            .ingest_folder(Path::new("/definitely/not/here"))
            .await;

        assert!(matches!(result, Err(IngestionError::FolderError(_))));
    }
}
