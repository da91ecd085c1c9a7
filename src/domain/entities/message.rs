use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::MessageRole;

/// A single chat message. `position` is 1-based within its session and is
/// zero until the message has been stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    id: Uuid,
    session_id: Uuid,
    role: MessageRole,
    content: String,
    position: i32,
    created_at: DateTime<Utc>,
}

impl Message {
    pub fn new(session_id: Uuid, role: MessageRole, content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            session_id,
            role,
            content,
            position: 0,
            created_at: Utc::now(),
        }
    }

    pub fn restore(
        id: Uuid,
        session_id: Uuid,
        role: MessageRole,
        content: String,
        position: i32,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            session_id,
            role,
            content,
            position,
            created_at,
        }
    }

    pub fn with_position(mut self, position: i32) -> Self {
        self.position = position;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn role(&self) -> MessageRole {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn position(&self) -> i32 {
        self.position
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_stored(&self) -> bool {
        self.position > 0
    }
}
