use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;

use crate::application::ports::vector_index::CollectionInfo;
use crate::infrastructure::database::schema::vector_collections;

#[derive(Debug, Clone, Queryable, Selectable, Serialize, Identifiable)]
#[diesel(table_name = vector_collections)]
#[diesel(primary_key(name))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct VectorCollectionModel {
    pub name: String,
    pub embedding_model: String,
    pub dimension: i32,
    pub entry_count: i64,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = vector_collections)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewVectorCollectionModel {
    pub name: String,
    pub embedding_model: String,
    pub dimension: i32,
    pub entry_count: i64,
    pub updated_at: DateTime<Utc>,
}

impl From<VectorCollectionModel> for CollectionInfo {
    fn from(model: VectorCollectionModel) -> Self {
        Self {
            name: model.name,
            embedding_model: model.embedding_model,
            dimension: model.dimension.max(0) as usize,
            entry_count: model.entry_count,
        }
    }
}
