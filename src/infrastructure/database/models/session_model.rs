use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::entities::Session as DomainSession;
use crate::infrastructure::database::schema::sessions;

#[derive(Debug, Clone, Queryable, Selectable, Serialize, Identifiable, Associations)]
#[diesel(belongs_to(super::UserModel, foreign_key = user_id))]
#[diesel(table_name = sessions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SessionModel {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = sessions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewSessionModel {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&DomainSession> for NewSessionModel {
    fn from(session: &DomainSession) -> Self {
        Self {
            id: session.id(),
            user_id: session.user_id(),
            name: session.name().to_string(),
            created_at: session.created_at(),
            updated_at: session.updated_at(),
        }
    }
}

impl From<SessionModel> for DomainSession {
    fn from(model: SessionModel) -> Self {
        DomainSession::restore(
            model.id,
            model.user_id,
            model.name,
            model.created_at,
            model.updated_at,
        )
    }
}
