use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::entities::Message as DomainMessage;
use crate::domain::value_objects::MessageRole;
use crate::infrastructure::database::schema::messages;

#[derive(Debug, Clone, Queryable, Selectable, Serialize, Identifiable, Associations)]
#[diesel(belongs_to(super::SessionModel, foreign_key = session_id))]
#[diesel(table_name = messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MessageModel {
    pub id: Uuid,
    pub session_id: Uuid,
    pub role: String,
    pub content: String,
    pub position: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewMessageModel {
    pub id: Uuid,
    pub session_id: Uuid,
    pub role: String,
    pub content: String,
    pub position: i32,
    pub created_at: DateTime<Utc>,
}

impl From<&DomainMessage> for NewMessageModel {
    fn from(message: &DomainMessage) -> Self {
        Self {
            id: message.id(),
            session_id: message.session_id(),
            role: message.role().as_str().to_string(),
            content: message.content().to_string(),
            position: message.position(),
            created_at: message.created_at(),
        }
    }
}

impl TryFrom<MessageModel> for DomainMessage {
    type Error = String;

    fn try_from(model: MessageModel) -> Result<Self, Self::Error> {
        let role = MessageRole::from_string(&model.role)?;

        Ok(DomainMessage::restore(
            model.id,
            model.session_id,
            role,
            model.content,
            model.position,
            model.created_at,
        ))
    }
}
