use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::use_cases::get_history::GetHistoryResponse;
use crate::domain::entities::{Message, Session};

#[derive(Debug, Deserialize)]
pub struct CreateSessionRequestDto {
    pub user_id: Uuid,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListSessionsQueryDto {
    pub user_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct SessionDto {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Session> for SessionDto {
    fn from(session: Session) -> Self {
        Self {
            id: session.id(),
            user_id: session.user_id(),
            name: session.name().to_string(),
            created_at: session.created_at(),
            updated_at: session.updated_at(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageDto {
    pub id: Uuid,
    pub role: String,
    pub content: String,
    pub position: i32,
    pub created_at: DateTime<Utc>,
}

impl From<Message> for MessageDto {
    fn from(message: Message) -> Self {
        Self {
            id: message.id(),
            role: message.role().as_str().to_string(),
            content: message.content().to_string(),
            position: message.position(),
            created_at: message.created_at(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HistoryDto {
    pub session_id: Uuid,
    pub messages: Vec<MessageDto>,
}

impl From<GetHistoryResponse> for HistoryDto {
    fn from(response: GetHistoryResponse) -> Self {
        Self {
            session_id: response.session.id(),
            messages: response.messages.into_iter().map(MessageDto::from).collect(),
        }
    }
}
