use async_trait::async_trait;
use lopdf::{Document, Object, ObjectId};
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use std::path::Path;

use super::table_detection::detect_tables;
use crate::application::ports::document_extractor::{DocumentExtractionError, DocumentExtractor};
use crate::domain::entities::{ExtractedTable, RawDocument, TextBlock};

/// Text and table extraction for PDF files, one text block per page.
#[derive(Debug, Default)]
pub struct PdfExtractor;

impl PdfExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Drops layout and image keys that text extraction never reads.
    fn filter_func(object_id: ObjectId, object: &mut Object) -> Option<(ObjectId, Object)> {
        static IGNORE: &[&[u8]] = &[
            b"Length",
            b"BBox",
            b"Matrix",
            b"Filter",
            b"ColorSpace",
            b"Width",
            b"Height",
            b"BitsPerComponent",
            b"PTEX.FileName",
            b"PTEX.PageNumber",
            b"PTEX.InfoDict",
            b"FontDescriptor",
            b"ExtGState",
            b"MediaBox",
        ];

        if let Object::Dictionary(dict) = object {
            let keys_to_remove: Vec<Vec<u8>> = dict
                .iter()
                .filter(|(key, _)| IGNORE.contains(&key.as_slice()))
                .map(|(key, _)| key.clone())
                .collect();
            for key in keys_to_remove {
                dict.remove(&key);
            }
        }

        Some((object_id, object.to_owned()))
    }

    /// Encrypted files are opened with the empty user password.
    fn load(path: &Path) -> Result<Document, DocumentExtractionError> {
        let mut doc = Document::load_filtered(path, Self::filter_func)
            .map_err(|e| DocumentExtractionError::CorruptedFile(e.to_string()))?;

        if doc.is_encrypted() {
            doc.decrypt("").map_err(|_| {
                DocumentExtractionError::ExtractionFailed(
                    "Failed to decrypt PDF: a password is required".to_string(),
                )
            })?;
        }

        Ok(doc)
    }

    /// Lines of text per page, pages in order. Pages that fail to decode
    /// are logged and left out.
    fn page_lines(doc: &Document, source: &str) -> Vec<(u32, Vec<String>)> {
        let results: Vec<Result<(u32, Vec<String>), String>> = doc
            .get_pages()
            .into_par_iter()
            .map(|(page_num, _)| {
                let text = doc
                    .extract_text(&[page_num])
                    .map_err(|e| format!("page {}: {}", page_num, e))?;

                let lines = text
                    .split('\n')
                    .map(|s| s.trim_end().to_string())
                    .filter(|s| !s.is_empty())
                    .collect();

                Ok((page_num, lines))
            })
            .collect();

        let mut pages = Vec::with_capacity(results.len());
        for result in results {
            match result {
                Ok(page) => pages.push(page),
                Err(e) => tracing::warn!("Could not extract text from {}: {}", source, e),
            }
        }
        pages.sort_by_key(|(page_num, _)| *page_num);
        pages
    }

    fn extract_blocking(path: &Path) -> Result<RawDocument, DocumentExtractionError> {
        if !path.is_file() {
            return Err(DocumentExtractionError::IoError(format!(
                "{} is not a readable file",
                path.display()
            )));
        }

        let source = path.to_string_lossy().to_string();
        let doc = Self::load(path)?;

        let mut text_blocks = Vec::new();
        let mut tables = Vec::new();

        for (page_num, lines) in Self::page_lines(&doc, &source) {
            if lines.is_empty() {
                continue;
            }
            let page = page_num as i32;

            tables.extend(
                detect_tables(&lines)
                    .into_iter()
                    .map(|rows| ExtractedTable { rows, page }),
            );
            text_blocks.push(TextBlock {
                text: lines.join("\n"),
                page,
            });
        }

        tracing::debug!(
            "{}: {} text blocks, {} tables",
            source,
            text_blocks.len(),
            tables.len()
        );

        Ok(RawDocument::new(source, text_blocks, tables))
    }
}

#[async_trait]
impl DocumentExtractor for PdfExtractor {
    async fn extract(&self, path: &Path) -> Result<RawDocument, DocumentExtractionError> {
        let path = path.to_path_buf();

        tokio::task::spawn_blocking(move || Self::extract_blocking(&path))
            .await
            .map_err(|e| DocumentExtractionError::ExtractionFailed(e.to_string()))?
    }

    fn supported_extensions(&self) -> Vec<String> {
        vec!["pdf".to_string()]
    }
}
