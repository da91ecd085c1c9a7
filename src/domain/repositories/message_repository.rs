use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::Message;

#[derive(Debug)]
pub enum MessageRepositoryError {
    DatabaseError(String),
    ValidationError(String),
}

impl std::fmt::Display for MessageRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageRepositoryError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            MessageRepositoryError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
        }
    }
}

impl std::error::Error for MessageRepositoryError {}

#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Ordered by position, oldest first.
    async fn find_by_session_id(&self, session_id: Uuid)
    -> Result<Vec<Message>, MessageRepositoryError>;
    async fn delete_by_session_id(&self, session_id: Uuid) -> Result<i64, MessageRepositoryError>;
}
