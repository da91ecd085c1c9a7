use std::sync::Arc;
use uuid::Uuid;

use crate::domain::repositories::{MessageRepository, SessionRepository};

#[derive(Debug)]
pub enum DeleteHistoryError {
    SessionNotFound(Uuid),
    RepositoryError(String),
}

impl std::fmt::Display for DeleteHistoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeleteHistoryError::SessionNotFound(id) => write!(f, "Session not found: {}", id),
            DeleteHistoryError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for DeleteHistoryError {}

#[derive(Debug, Clone)]
pub struct DeleteHistoryRequest {
    pub session_id: Uuid,
}

#[derive(Debug, Clone)]
pub struct DeleteHistoryResponse {
    pub deleted_messages: i64,
}

/// Clears a session's messages and keeps the session itself.
pub struct DeleteHistoryUseCase {
    session_repository: Arc<dyn SessionRepository>,
    message_repository: Arc<dyn MessageRepository>,
}

impl DeleteHistoryUseCase {
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
        request: DeleteHistoryRequest,
    ) -> Result<DeleteHistoryResponse, DeleteHistoryError> {
        self.session_repository
            .find_by_id(request.session_id)
            .await
            .map_err(|e| DeleteHistoryError::RepositoryError(e.to_string()))?
            .ok_or(DeleteHistoryError::SessionNotFound(request.session_id))?;

        let deleted_messages = self
            .message_repository
            .delete_by_session_id(request.session_id)
            .await
            .map_err(|e| DeleteHistoryError::RepositoryError(e.to_string()))?;

        tracing::info!(
            "Deleted {} messages from session {}",
            deleted_messages,
            request.session_id
        );

        Ok(DeleteHistoryResponse { deleted_messages })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Message, Session, User};
    use crate::domain::repositories::UserRepository;
    use crate::domain::repositories::session_repository::ChatTurn;
    use crate::domain::value_objects::MessageRole;
    use crate::testing::InMemoryChatStore;

    #[tokio::test]
    async fn test_clears_messages_but_keeps_session() {
        let store = Arc::new(InMemoryChatStore::default());
        let user = User::placeholder(Uuid::new_v4());
        UserRepository::save(store.as_ref(), &user).await.unwrap();
        let session = Session::new(user.id(), None);
        SessionRepository::save(store.as_ref(), &session).await.unwrap();
        store
            .record_turn(
                session.id(),
                ChatTurn {
                    user_message: Message::new(session.id(), MessageRole::User, "q".to_string()),
                    assistant_message: Message::new(
                        session.id(),
                        MessageRole::Assistant,
                        "a".to_string(),
                    ),
                    rename_to: None,
                },
            )
            .await
            .unwrap();

        let response = DeleteHistoryUseCase::new(store.clone(), store.clone())
            .execute(DeleteHistoryRequest {
                session_id: session.id(),
            })
            .await
            .unwrap();

        assert_eq!(response.deleted_messages, 2);
        assert_eq!(store.message_count(), 0);
        assert!(
            SessionRepository::find_by_id(store.as_ref(), session.id())
                .await
                .unwrap()
                .is_some()
        );
    }
}
