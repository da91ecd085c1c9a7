use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::{Session, User};
use crate::domain::repositories::{SessionRepository, UserRepository};

#[derive(Debug)]
pub enum CreateSessionError {
    RepositoryError(String),
}

impl std::fmt::Display for CreateSessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CreateSessionError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for CreateSessionError {}

#[derive(Debug, Clone)]
pub struct CreateSessionRequest {
    pub user_id: Uuid,
    pub name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreateSessionResponse {
    pub session: Session,
}

pub struct CreateSessionUseCase {
    user_repository: Arc<dyn UserRepository>,
    session_repository: Arc<dyn SessionRepository>,
}

impl CreateSessionUseCase {
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        session_repository: Arc<dyn SessionRepository>,
    ) -> Self {
        Self {
            user_repository,
            session_repository,
        }
    }

    /// Creates the owning user on the fly when the id is unknown.
    pub async fn execute(
        &self,
        request: CreateSessionRequest,
    ) -> Result<CreateSessionResponse, CreateSessionError> {
        let existing = self
            .user_repository
            .find_by_id(request.user_id)
            .await
            .map_err(|e| CreateSessionError::RepositoryError(e.to_string()))?;

        if existing.is_none() {
            tracing::info!("Creating implicit user {}", request.user_id);
            self.user_repository
                .save(&User::placeholder(request.user_id))
                .await
                .map_err(|e| CreateSessionError::RepositoryError(e.to_string()))?;
        }

        let session = Session::new(request.user_id, request.name);
        self.session_repository
            .save(&session)
            .await
            .map_err(|e| CreateSessionError::RepositoryError(e.to_string()))?;

        Ok(CreateSessionResponse { session })
    }
}
