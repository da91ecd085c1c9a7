use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::User;

#[derive(Debug)]
pub enum UserRepositoryError {
    DatabaseError(String),
    ValidationError(String),
    DuplicateError(String),
}

impl std::fmt::Display for UserRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRepositoryError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            UserRepositoryError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            UserRepositoryError::DuplicateError(msg) => write!(f, "Duplicate error: {}", msg),
        }
    }
}

impl std::error::Error for UserRepositoryError {}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts the user. A row with the same id is left unchanged, so
    /// concurrent saves of one id both succeed.
    async fn save(&self, user: &User) -> Result<(), UserRepositoryError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, UserRepositoryError>;
    async fn find_by_email_and_username(
        &self,
        email: &str,
        username: &str,
    ) -> Result<Option<User>, UserRepositoryError>;
}
