use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    pub text: String,
    pub page: i32,
}

/// Rows of cells, first row is the header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedTable {
    pub rows: Vec<Vec<String>>,
    pub page: i32,
}

/// Everything pulled out of one source file. Immutable once extracted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDocument {
    source: String,
    text_blocks: Vec<TextBlock>,
    tables: Vec<ExtractedTable>,
}

impl RawDocument {
    pub fn new(source: String, text_blocks: Vec<TextBlock>, tables: Vec<ExtractedTable>) -> Self {
        Self {
            source,
            text_blocks,
            tables,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn text_blocks(&self) -> &[TextBlock] {
        &self.text_blocks
    }

    pub fn tables(&self) -> &[ExtractedTable] {
        &self.tables
    }

    pub fn page_count(&self) -> usize {
        let mut pages: Vec<i32> = self
            .text_blocks
            .iter()
            .map(|b| b.page)
            .chain(self.tables.iter().map(|t| t.page))
            .collect();
        pages.sort_unstable();
        pages.dedup();
        pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text_blocks.iter().all(|b| b.text.trim().is_empty())
            && self.tables.iter().all(|t| t.rows.is_empty())
    }
}
