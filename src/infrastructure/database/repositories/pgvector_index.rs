use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use pgvector::{Vector, VectorExpressionMethods};

use crate::application::ports::vector_index::{
    CollectionInfo, SimilaritySearchResult, VectorIndex, VectorIndexError,
};
use crate::domain::entities::VectorEntry;
use crate::infrastructure::database::models::{
    NewVectorCollectionModel, NewVectorEntryModel, VectorCollectionModel, VectorEntryModel,
};
use crate::infrastructure::database::schema::{vector_collections, vector_entries};
use crate::infrastructure::database::{DatabaseError, DbPool, run_blocking};

const INSERT_BATCH_SIZE: usize = 500;

/// A named collection of embedded chunks stored in pgvector.
///
/// Scores are cosine similarity (`1 - cosine distance`), so they fall in
/// `[-1, 1]` with higher meaning closer.
pub struct PgVectorIndex {
    pool: DbPool,
    collection: String,
}

fn database_error(error: DatabaseError) -> VectorIndexError {
    VectorIndexError::DatabaseError(error.to_string())
}

impl PgVectorIndex {
    /// Handle for writers; the collection is created by the first rebuild.
    pub fn for_ingestion(pool: DbPool, collection: &str) -> Self {
        Self {
            pool,
            collection: collection.to_string(),
        }
    }

    /// Handle for readers. Fails when the collection was never built.
    pub async fn open(pool: DbPool, collection: &str) -> Result<Self, VectorIndexError> {
        let index = Self::for_ingestion(pool, collection);
        if index.collection_info().await?.is_none() {
            return Err(VectorIndexError::CollectionNotFound(collection.to_string()));
        }
        Ok(index)
    }

    pub async fn collection_info(&self) -> Result<Option<CollectionInfo>, VectorIndexError> {
        let model = self.load_collection().await?;
        Ok(model.map(CollectionInfo::from))
    }

    async fn load_collection(&self) -> Result<Option<VectorCollectionModel>, VectorIndexError> {
        let name = self.collection.clone();
        run_blocking(&self.pool, move |conn| load_collection(conn, &name))
            .await
            .map_err(database_error)
    }

    async fn require_collection(&self) -> Result<VectorCollectionModel, VectorIndexError> {
        self.load_collection()
            .await?
            .ok_or_else(|| VectorIndexError::CollectionNotFound(self.collection.clone()))
    }

    fn rows(&self, entries: &[VectorEntry]) -> Vec<NewVectorEntryModel> {
        entries
            .iter()
            .map(|entry| NewVectorEntryModel::from_entry(&self.collection, entry))
            .collect()
    }
}

fn load_collection(
    conn: &mut PgConnection,
    name: &str,
) -> Result<Option<VectorCollectionModel>, DieselError> {
    vector_collections::table
        .find(name)
        .select(VectorCollectionModel::as_select())
        .first(conn)
        .optional()
}

/// All entries must share one dimension; returns it.
fn uniform_dimension(entries: &[VectorEntry]) -> Result<usize, VectorIndexError> {
    let Some(first) = entries.first() else {
        return Ok(0);
    };
    let expected = first.dimension();

    if expected == 0 {
        return Err(VectorIndexError::ValidationError(
            "Embeddings must not be empty".to_string(),
        ));
    }

    match entries.iter().find(|e| e.dimension() != expected) {
        Some(entry) => Err(VectorIndexError::DimensionMismatch {
            expected,
            actual: entry.dimension(),
        }),
        None => Ok(expected),
    }
}

fn insert_entries(conn: &mut PgConnection, rows: &[NewVectorEntryModel]) -> Result<(), DieselError> {
    for batch in rows.chunks(INSERT_BATCH_SIZE) {
        diesel::insert_into(vector_entries::table)
            .values(batch)
            .execute(conn)?;
    }
    Ok(())
}

fn refresh_entry_count(conn: &mut PgConnection, collection: &str) -> Result<i64, DieselError> {
    let total: i64 = vector_entries::table
        .filter(vector_entries::collection.eq(collection))
        .count()
        .get_result(conn)?;

    diesel::update(vector_collections::table.find(collection))
        .set((
            vector_collections::entry_count.eq(total),
            vector_collections::updated_at.eq(Utc::now()),
        ))
        .execute(conn)?;

    Ok(total)
}

#[async_trait]
impl VectorIndex for PgVectorIndex {
    async fn add(&self, entries: &[VectorEntry]) -> Result<(), VectorIndexError> {
        let dimension = uniform_dimension(entries)?;
        if entries.is_empty() {
            return Ok(());
        }

        let info = self.require_collection().await?;
        if info.dimension as usize != dimension {
            return Err(VectorIndexError::DimensionMismatch {
                expected: info.dimension as usize,
                actual: dimension,
            });
        }

        let rows = self.rows(entries);
        let name = self.collection.clone();
        run_blocking(&self.pool, move |conn| {
            conn.transaction::<_, DieselError, _>(|conn| {
                insert_entries(conn, &rows)?;
                refresh_entry_count(conn, &name)
            })
        })
        .await
        .map_err(database_error)?;

        Ok(())
    }

    async fn rebuild(
        &self,
        entries: &[VectorEntry],
        embedding_model: &str,
    ) -> Result<(), VectorIndexError> {
        let dimension = uniform_dimension(entries)?;

        let collection_row = NewVectorCollectionModel {
            name: self.collection.clone(),
            embedding_model: embedding_model.to_string(),
            dimension: dimension as i32,
            entry_count: 0,
            updated_at: Utc::now(),
        };
        let rows = self.rows(entries);
        let name = self.collection.clone();

        let (removed, total) = run_blocking(&self.pool, move |conn| {
            conn.transaction::<_, DieselError, _>(|conn| {
                diesel::insert_into(vector_collections::table)
                    .values(&collection_row)
                    .on_conflict(vector_collections::name)
                    .do_update()
                    .set(&collection_row)
                    .execute(conn)?;

                let removed = diesel::delete(
                    vector_entries::table.filter(vector_entries::collection.eq(&name)),
                )
                .execute(conn)?;

                insert_entries(conn, &rows)?;
                Ok((removed, refresh_entry_count(conn, &name)?))
            })
        })
        .await
        .map_err(database_error)?;

        tracing::debug!(
            "Removed {} previous entries from '{}'",
            removed,
            self.collection
        );
        tracing::info!(
            "Collection '{}' rebuilt with {} entries ({} dimensions, model {})",
            self.collection,
            total,
            dimension,
            embedding_model
        );
        Ok(())
    }

    async fn search(
        &self,
        query: &Vector,
        k: usize,
    ) -> Result<Vec<SimilaritySearchResult>, VectorIndexError> {
        let info = self.require_collection().await?;

        let query_dimension = query.as_slice().len();
        if info.entry_count > 0 && info.dimension as usize != query_dimension {
            return Err(VectorIndexError::DimensionMismatch {
                expected: info.dimension as usize,
                actual: query_dimension,
            });
        }

        let query = query.clone();
        let name = self.collection.clone();
        let rows: Vec<(VectorEntryModel, f64)> = run_blocking(&self.pool, move |conn| {
            vector_entries::table
                .filter(vector_entries::collection.eq(name))
                .select((
                    VectorEntryModel::as_select(),
                    vector_entries::embedding.cosine_distance(query.clone()),
                ))
                .order(vector_entries::embedding.cosine_distance(query))
                .limit(k as i64)
                .load(conn)
        })
        .await
        .map_err(database_error)?;

        rows.into_iter()
            .map(|(model, distance)| {
                let metadata = model
                    .metadata()
                    .map_err(VectorIndexError::ValidationError)?;
                Ok(SimilaritySearchResult {
                    text: model.content,
                    metadata,
                    score: Some((1.0 - distance) as f32),
                })
            })
            .collect()
    }

    async fn count(&self) -> Result<i64, VectorIndexError> {
        let name = self.collection.clone();
        run_blocking(&self.pool, move |conn| {
            vector_entries::table
                .filter(vector_entries::collection.eq(name))
                .count()
                .get_result(conn)
        })
        .await
        .map_err(database_error)
    }

    fn collection(&self) -> &str {
        &self.collection
    }
}
