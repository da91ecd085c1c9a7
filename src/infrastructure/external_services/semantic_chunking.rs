use crate::application::ports::DocumentChunker;
use crate::domain::entities::{Chunk, RawDocument};
use crate::domain::value_objects::ChunkMetadata;

pub const DEFAULT_CHUNK_SIZE: usize = 1000;
pub const DEFAULT_CHUNK_OVERLAP: usize = 200;

pub trait RecursiveTextSplitter {
    fn split_text(&self, text: &str) -> Vec<String>;
}

/// Splits text into overlapping character windows, preferring to cut at
/// paragraph, line, sentence and word boundaries in that order.
///
/// Chunks are contiguous slices of the input. Each chunk after the first
/// starts `chunk_overlap` characters before the end of its predecessor.
#[derive(Debug, Clone)]
pub struct RTSplitter {
    separator_levels: Vec<Vec<&'static str>>,
    chunk_size: usize,
    chunk_overlap: usize,
}

impl Default for RTSplitter {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE, DEFAULT_CHUNK_OVERLAP)
    }
}

impl RTSplitter {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            separator_levels: vec![
                vec!["\n\n"],
                vec!["\n"],
                vec![". ", "? ", "! "],
                vec![" "],
            ],
            chunk_size,
            chunk_overlap: chunk_overlap.min(chunk_size - 1),
        }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    /// Character index just past the chosen split point for the window that
    /// starts at `start`. `offsets` maps char index to byte offset and carries
    /// one trailing entry for the end of the text.
    fn split_point(&self, text: &str, offsets: &[usize], start: usize) -> usize {
        let limit = start + self.chunk_size;
        let floor = start + self.chunk_overlap;
        let window = &text[offsets[start]..offsets[limit]];

        for level in &self.separator_levels {
            let best = level
                .iter()
                .filter_map(|sep| {
                    let found = window.rfind(sep)?;
                    let byte_end = offsets[start] + found + sep.len();
                    let char_end = offsets
                        .binary_search(&byte_end)
                        .unwrap_or_else(|insert_at| insert_at);
                    (char_end > floor && char_end <= limit).then_some(char_end)
                })
                .max();

            if let Some(end) = best {
                return end;
            }
        }

        limit
    }

    pub fn chunk_text_block(
        &self,
        text: &str,
        source: &str,
        page: i32,
        first_index: i32,
    ) -> Vec<Chunk> {
        // Blank windows inside a non-blank block stay, so overlaps keep chaining.
        self.split_text(text)
            .into_iter()
            .enumerate()
            .map(|(i, piece)| {
                Chunk::new(piece, first_index + i as i32, ChunkMetadata::text(source, page))
            })
            .collect()
    }
}

impl RecursiveTextSplitter for RTSplitter {
    fn split_text(&self, text: &str) -> Vec<String> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let mut offsets: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
        let char_count = offsets.len();
        offsets.push(text.len());

        if char_count <= self.chunk_size {
            return vec![text.to_string()];
        }

        let mut chunks = Vec::new();
        let mut start = 0;

        loop {
            if char_count - start <= self.chunk_size {
                chunks.push(text[offsets[start]..].to_string());
                break;
            }

            let end = self.split_point(text, &offsets, start);
            chunks.push(text[offsets[start]..offsets[end]].to_string());
            start = end - self.chunk_overlap;
        }

        chunks
    }
}

impl DocumentChunker for RTSplitter {
    /// Text blocks in page order, then each table as a single chunk.
    fn chunk_document(&self, document: &RawDocument) -> Vec<Chunk> {
        let source = document.source();
        let mut chunks: Vec<Chunk> = Vec::new();

        for block in document.text_blocks() {
            let next_index = chunks.len() as i32;
            chunks.extend(self.chunk_text_block(&block.text, source, block.page, next_index));
        }

        for table in document.tables() {
            let markdown = table_to_markdown(&table.rows);
            if markdown.is_empty() {
                continue;
            }
            let next_index = chunks.len() as i32;
            chunks.push(Chunk::new(
                markdown,
                next_index,
                ChunkMetadata::table(source, table.page),
            ));
        }

        chunks
    }
}

/// Renders rows as a markdown table with the first row as header. Rows
/// without cells are dropped; short rows are padded to the widest row.
pub fn table_to_markdown(rows: &[Vec<String>]) -> String {
    let rows: Vec<&Vec<String>> = rows.iter().filter(|row| !row.is_empty()).collect();
    let Some(width) = rows.iter().map(|row| row.len()).max() else {
        return String::new();
    };

    let render_row = |row: &Vec<String>| {
        let mut line = String::from("|");
        for i in 0..width {
            let cell = row.get(i).map(|c| escape_cell(c)).unwrap_or_default();
            line.push(' ');
            line.push_str(&cell);
            line.push_str(" |");
        }
        line.push('\n');
        line
    };

    let mut markdown = render_row(rows[0]);
    markdown.push('|');
    markdown.push_str(&" --- |".repeat(width));
    markdown.push('\n');

    for row in &rows[1..] {
        markdown.push_str(&render_row(*row));
    }

    markdown
}

fn escape_cell(cell: &str) -> String {
    cell.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace('|', "\\|")
}
