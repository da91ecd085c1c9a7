use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::Session;
use crate::domain::repositories::SessionRepository;

#[derive(Debug)]
pub enum ListSessionsError {
    RepositoryError(String),
}

impl std::fmt::Display for ListSessionsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListSessionsError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for ListSessionsError {}

#[derive(Debug, Clone)]
pub struct ListSessionsRequest {
    pub user_id: Uuid,
}

#[derive(Debug, Clone)]
pub struct ListSessionsResponse {
    pub sessions: Vec<Session>,
}

pub struct ListSessionsUseCase {
    session_repository: Arc<dyn SessionRepository>,
}

impl ListSessionsUseCase {
    pub fn new(session_repository: Arc<dyn SessionRepository>) -> Self {
        Self { session_repository }
    }

    pub async fn execute(
        &self,
        request: ListSessionsRequest,
    ) -> Result<ListSessionsResponse, ListSessionsError> {
        let sessions = self
            .session_repository
            .find_by_user_id(request.user_id)
            .await
            .map_err(|e| ListSessionsError::RepositoryError(e.to_string()))?;

        Ok(ListSessionsResponse { sessions })
    }
}
