use std::sync::Arc;
use uuid::Uuid;

use crate::application::services::RagService;
use crate::domain::entities::{Message, Session};
use crate::domain::repositories::session_repository::{ChatTurn, SessionRepositoryError};
use crate::domain::repositories::{MessageRepository, SessionRepository};
use crate::domain::value_objects::{MessageRole, SourceDescriptor};

#[derive(Debug)]
pub enum ChatError {
    ValidationError(String),
    SessionNotFound(Uuid),
    GenerationError(String),
    RepositoryError(String),
}

impl std::fmt::Display for ChatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChatError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            ChatError::SessionNotFound(_) => write!(f, "Session not found for user"),
            ChatError::GenerationError(msg) => write!(f, "Generation error: {}", msg),
            ChatError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for ChatError {}

#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub user_id: Uuid,
    pub session_id: Uuid,
    pub query: String,
}

#[derive(Debug, Clone)]
pub struct ChatResponse {
    pub answer: String,
    pub sources: Vec<SourceDescriptor>,
    pub session: Session,
}

pub struct ChatUseCase {
    rag_service: Arc<RagService>,
    session_repository: Arc<dyn SessionRepository>,
    message_repository: Arc<dyn MessageRepository>,
}

impl ChatUseCase {
    pub fn new(
        rag_service: Arc<RagService>,
        session_repository: Arc<dyn SessionRepository>,
        message_repository: Arc<dyn MessageRepository>,
    ) -> Self {
        Self {
            rag_service,
            session_repository,
            message_repository,
        }
    }

    /// Answers the query against the session's history and records the
    /// exchange. Nothing is written unless an answer was produced.
    pub async fn execute(&self, request: ChatRequest) -> Result<ChatResponse, ChatError> {
        let query = request.query.trim();
        if query.is_empty() {
            return Err(ChatError::ValidationError("Query cannot be empty".to_string()));
        }

        let session = self
            .session_repository
            .find_by_id(request.session_id)
            .await
            .map_err(|e| ChatError::RepositoryError(e.to_string()))?
            .filter(|s| s.is_owned_by(request.user_id))
            .ok_or(ChatError::SessionNotFound(request.session_id))?;

        let history = self
            .message_repository
            .find_by_session_id(session.id())
            .await
            .map_err(|e| ChatError::RepositoryError(e.to_string()))?;

        let rag_answer = self
            .rag_service
            .answer(query, &history)
            .await
            .map_err(|e| ChatError::GenerationError(e.to_string()))?;

        let user_message = Message::new(session.id(), MessageRole::User, query.to_string());
        let assistant_message = Message::new(
            session.id(),
            MessageRole::Assistant,
            rag_answer.answer.clone(),
        );

        let rename_to = if session.should_auto_name(history.len() + 2) {
            let mut transcript = history;
            transcript.push(user_message.clone());
            transcript.push(assistant_message.clone());

            match self.rag_service.name_session(&transcript).await {
                Ok(name) => Some(name),
                Err(e) => {
                    tracing::warn!("Could not name session {}: {}", session.id(), e);
                    None
                }
            }
        } else {
            None
        };

        let recorded = self
            .session_repository
            .record_turn(
                session.id(),
                ChatTurn {
                    user_message,
                    assistant_message,
                    rename_to,
                },
            )
            .await
            .map_err(|e| match e {
                SessionRepositoryError::NotFound(id) => ChatError::SessionNotFound(id),
                other => ChatError::RepositoryError(other.to_string()),
            })?;

        Ok(ChatResponse {
            answer: rag_answer.answer,
            sources: rag_answer.sources,
            session: recorded.session,
        })
    }
}
