use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::User;

#[derive(Debug, Deserialize)]
pub struct CreateUserRequestDto {
    pub email: String,
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct UserDto {
    pub id: Uuid,
    pub email: Option<String>,
    pub username: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id(),
            email: user.email().map(str::to_string),
            username: user.username().map(str::to_string),
            created_at: user.created_at(),
        }
    }
}
