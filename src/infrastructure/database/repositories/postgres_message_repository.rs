use async_trait::async_trait;
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::entities::Message;
use crate::domain::repositories::{MessageRepository, message_repository::MessageRepositoryError};
use crate::infrastructure::database::models::MessageModel;
use crate::infrastructure::database::schema::messages::dsl::*;
use crate::infrastructure::database::{DbPool, run_blocking};

pub struct PostgresMessageRepository {
    pool: DbPool,
}

impl PostgresMessageRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageRepository for PostgresMessageRepository {
    async fn find_by_session_id(
        &self,
        target_session: Uuid,
    ) -> Result<Vec<Message>, MessageRepositoryError> {
        let models = run_blocking(&self.pool, move |conn| {
            messages
                .filter(session_id.eq(target_session))
                .order((position.asc(), created_at.asc()))
                .select(MessageModel::as_select())
                .load(conn)
        })
        .await
        .map_err(|e| MessageRepositoryError::DatabaseError(e.to_string()))?;

        models
            .into_iter()
            .map(|model| Message::try_from(model).map_err(MessageRepositoryError::ValidationError))
            .collect()
    }

    async fn delete_by_session_id(
        &self,
        target_session: Uuid,
    ) -> Result<i64, MessageRepositoryError> {
        let deleted_count = run_blocking(&self.pool, move |conn| {
            diesel::delete(messages.filter(session_id.eq(target_session))).execute(conn)
        })
        .await
        .map_err(|e| MessageRepositoryError::DatabaseError(e.to_string()))?;

        Ok(deleted_count as i64)
    }
}
