use std::sync::Arc;
use uuid::Uuid;

use crate::domain::repositories::SessionRepository;

#[derive(Debug)]
pub enum DeleteSessionError {
    SessionNotFound(Uuid),
    RepositoryError(String),
}

impl std::fmt::Display for DeleteSessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeleteSessionError::SessionNotFound(id) => write!(f, "Session not found: {}", id),
            DeleteSessionError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for DeleteSessionError {}

#[derive(Debug, Clone)]
pub struct DeleteSessionRequest {
    pub session_id: Uuid,
}

pub struct DeleteSessionUseCase {
    session_repository: Arc<dyn SessionRepository>,
}

impl DeleteSessionUseCase {
    pub fn new(session_repository: Arc<dyn SessionRepository>) -> Self {
        Self { session_repository }
    }

    /// Messages go with the session.
    pub async fn execute(&self, request: DeleteSessionRequest) -> Result<(), DeleteSessionError> {
        let deleted = self
            .session_repository
            .delete(request.session_id)
            .await
            .map_err(|e| DeleteSessionError::RepositoryError(e.to_string()))?;

        if !deleted {
            return Err(DeleteSessionError::SessionNotFound(request.session_id));
        }

        tracing::info!("Deleted session {}", request.session_id);
        Ok(())
    }
}
