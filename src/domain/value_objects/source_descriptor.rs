use serde::{Deserialize, Serialize};

use super::ChunkMetadata;

pub const UNKNOWN_SOURCE: &str = "unknown";

/// Identifies a retrieved chunk that informed an answer.
///
/// Field defaults, resolved once when the descriptor is built:
/// - `source`: the chunk's file path, or `"unknown"` when the metadata has none
/// - `page`: the chunk's 1-based page, or `None` when unavailable
/// - `score`: the index similarity for this chunk, or `None` when the backend
///   does not surface one. Scores are backend-dependent and not comparable
///   across index implementations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceDescriptor {
    pub source: String,
    pub page: Option<i32>,
    pub score: Option<f32>,
}

impl SourceDescriptor {
    pub fn from_metadata(metadata: Option<&ChunkMetadata>, score: Option<f32>) -> Self {
        let source = metadata
            .map(|m| m.source.trim())
            .filter(|s| !s.is_empty())
            .unwrap_or(UNKNOWN_SOURCE)
            .to_string();

        let page = metadata.map(|m| m.page).filter(|page| *page > 0);

        Self {
            source,
            page,
            score,
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.source == UNKNOWN_SOURCE
    }
}
