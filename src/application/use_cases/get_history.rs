use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::{Message, Session};
use crate::domain::repositories::{MessageRepository, SessionRepository};

#[derive(Debug)]
pub enum GetHistoryError {
    SessionNotFound(Uuid),
    RepositoryError(String),
}

impl std::fmt::Display for GetHistoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GetHistoryError::SessionNotFound(id) => write!(f, "Session not found: {}", id),
            GetHistoryError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for GetHistoryError {}

#[derive(Debug, Clone)]
pub struct GetHistoryRequest {
    pub session_id: Uuid,
}

#[derive(Debug, Clone)]
pub struct GetHistoryResponse {
    pub session: Session,
    pub messages: Vec<Message>,
}

pub struct GetHistoryUseCase {
    session_repository: Arc<dyn SessionRepository>,
    message_repository: Arc<dyn MessageRepository>,
}

impl GetHistoryUseCase {
    pub fn new(
        session_repository: Arc<dyn SessionRepository>,
        message_repository: Arc<dyn MessageRepository>,
    ) -> Self {
        Self {
            session_repository,
            message_repository,
        }
    }

    pub async fn execute(
        &self,
        request: GetHistoryRequest,
    ) -> Result<GetHistoryResponse, GetHistoryError> {
        let session = self
            .session_repository
            .find_by_id(request.session_id)
            .await
            .map_err(|e| GetHistoryError::RepositoryError(e.to_string()))?
            .ok_or(GetHistoryError::SessionNotFound(request.session_id))?;

        let messages = self
            .message_repository
            .find_by_session_id(session.id())
            .await
            .map_err(|e| GetHistoryError::RepositoryError(e.to_string()))?;

        Ok(GetHistoryResponse { session, messages })
    }
}
