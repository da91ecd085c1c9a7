use chrono::{DateTime, Utc};
use diesel::prelude::*;
use pgvector::Vector;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::entities::VectorEntry;
use crate::domain::value_objects::{ChunkMetadata, ChunkType};
use crate::infrastructure::database::schema::vector_entries;

#[derive(Debug, Clone, Queryable, Selectable, Serialize, Identifiable)]
#[diesel(table_name = vector_entries)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct VectorEntryModel {
    pub id: Uuid,
    pub collection: String,
    pub content: String,
    pub embedding: Vector,
    pub source: String,
    pub page_number: i32,
    pub chunk_type: String,
    pub chunk_index: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = vector_entries)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewVectorEntryModel {
    pub id: Uuid,
    pub collection: String,
    pub content: String,
    pub embedding: Vector,
    pub source: String,
    pub page_number: i32,
    pub chunk_type: String,
    pub chunk_index: i32,
    pub created_at: DateTime<Utc>,
}

impl NewVectorEntryModel {
    pub fn from_entry(collection: &str, entry: &VectorEntry) -> Self {
        Self {
            id: entry.id(),
            collection: collection.to_string(),
            content: entry.text().to_string(),
            embedding: entry.embedding().clone(),
            source: entry.metadata().source.clone(),
            page_number: entry.metadata().page,
            chunk_type: entry.metadata().chunk_type.as_str().to_string(),
            chunk_index: entry.chunk_index(),
            created_at: entry.created_at(),
        }
    }
}

impl VectorEntryModel {
    pub fn metadata(&self) -> Result<ChunkMetadata, String> {
        Ok(ChunkMetadata {
            source: self.source.clone(),
            page: self.page_number,
            chunk_type: ChunkType::from_string(&self.chunk_type)?,
        })
    }
}
