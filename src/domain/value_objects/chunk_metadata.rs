use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkType {
    Text,
    Table,
}

impl ChunkType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChunkType::Text => "text",
            ChunkType::Table => "table",
        }
    }

    pub fn from_string(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "text" => Ok(ChunkType::Text),
            "table" => Ok(ChunkType::Table),
            other => Err(format!("Invalid chunk type: {}", other)),
        }
    }
}

/// Where a chunk came from. Pages are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    pub source: String,
    pub page: i32,
    pub chunk_type: ChunkType,
}

impl ChunkMetadata {
    pub fn text(source: impl Into<String>, page: i32) -> Self {
        Self {
            source: source.into(),
            page,
            chunk_type: ChunkType::Text,
        }
    }

    pub fn table(source: impl Into<String>, page: i32) -> Self {
        Self {
            source: source.into(),
            page,
            chunk_type: ChunkType::Table,
        }
    }

    pub fn is_table(&self) -> bool {
        self.chunk_type == ChunkType::Table
    }
}
