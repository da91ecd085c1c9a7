use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::{Message, Session};

#[derive(Debug)]
pub enum SessionRepositoryError {
    NotFound(Uuid),
    DatabaseError(String),
    ValidationError(String),
}

impl std::fmt::Display for SessionRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionRepositoryError::NotFound(id) => write!(f, "Session not found: {}", id),
            SessionRepositoryError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            SessionRepositoryError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
        }
    }
}

impl std::error::Error for SessionRepositoryError {}

/// One completed chat exchange, written atomically.
#[derive(Debug, Clone)]
pub struct ChatTurn {
    pub user_message: Message,
    pub assistant_message: Message,
    /// Applied only if the stored session still carries a default name.
    pub rename_to: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RecordedTurn {
    pub user_message: Message,
    pub assistant_message: Message,
    pub session: Session,
}

#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn save(&self, session: &Session) -> Result<(), SessionRepositoryError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Session>, SessionRepositoryError>;
    /// Most recently updated first.
    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Vec<Session>, SessionRepositoryError>;
    /// Removes the session and all of its messages.
    async fn delete(&self, id: Uuid) -> Result<bool, SessionRepositoryError>;
    /// Appends the user and assistant messages with consecutive positions,
    /// refreshes `updated_at` and applies the optional rename, all in one
    /// transaction.
    async fn record_turn(
        &self,
        session_id: Uuid,
        turn: ChatTurn,
    ) -> Result<RecordedTurn, SessionRepositoryError>;
}
