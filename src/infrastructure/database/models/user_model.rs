use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::entities::User as DomainUser;
use crate::infrastructure::database::schema::users;

#[derive(Debug, Clone, Queryable, Selectable, Serialize, Identifiable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserModel {
    pub id: Uuid,
    pub email: Option<String>,
    pub username: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewUserModel {
    pub id: Uuid,
    pub email: Option<String>,
    pub username: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&DomainUser> for NewUserModel {
    fn from(user: &DomainUser) -> Self {
        Self {
            id: user.id(),
            email: user.email().map(str::to_string),
            username: user.username().map(str::to_string),
            created_at: user.created_at(),
            updated_at: user.updated_at(),
        }
    }
}

impl From<UserModel> for DomainUser {
    fn from(model: UserModel) -> Self {
        DomainUser::restore(
            model.id,
            model.email,
            model.username,
            model.created_at,
            model.updated_at,
        )
    }
}
