use std::sync::Arc;

use crate::domain::entities::User;
use crate::domain::repositories::{UserRepository, user_repository::UserRepositoryError};

#[derive(Debug)]
pub enum CreateUserError {
    ValidationError(String),
    Conflict(String),
    RepositoryError(String),
}

impl std::fmt::Display for CreateUserError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CreateUserError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            CreateUserError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            CreateUserError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for CreateUserError {}

impl From<UserRepositoryError> for CreateUserError {
    fn from(error: UserRepositoryError) -> Self {
        match error {
            UserRepositoryError::DuplicateError(msg) => CreateUserError::Conflict(msg),
            UserRepositoryError::ValidationError(msg) => CreateUserError::ValidationError(msg),
            UserRepositoryError::DatabaseError(msg) => CreateUserError::RepositoryError(msg),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    pub email: String,
    pub username: String,
}

#[derive(Debug, Clone)]
pub struct CreateUserResponse {
    pub user: User,
    pub created: bool,
}

pub struct CreateUserUseCase {
    user_repository: Arc<dyn UserRepository>,
}

impl CreateUserUseCase {
    pub fn new(user_repository: Arc<dyn UserRepository>) -> Self {
        Self { user_repository }
    }

    /// Returns the existing user when both email and username match.
    pub async fn execute(
        &self,
        request: CreateUserRequest,
    ) -> Result<CreateUserResponse, CreateUserError> {
        let email = request.email.trim();
        let username = request.username.trim();

        if email.is_empty() || username.is_empty() {
            return Err(CreateUserError::ValidationError(
                "Email and username are required".to_string(),
            ));
        }

        if let Some(user) = self
            .user_repository
            .find_by_email_and_username(email, username)
            .await?
        {
            return Ok(CreateUserResponse {
                user,
                created: false,
            });
        }

        let user = User::new(email.to_string(), username.to_string());
        match self.user_repository.save(&user).await {
            Ok(()) => {}
            Err(UserRepositoryError::DuplicateError(msg)) => {
                // A concurrent request may have inserted the same pair.
                return match self
                    .user_repository
                    .find_by_email_and_username(email, username)
                    .await?
                {
                    Some(user) => Ok(CreateUserResponse {
                        user,
                        created: false,
                    }),
                    None => Err(CreateUserError::Conflict(msg)),
                };
            }
            Err(e) => return Err(e.into()),
        }
        tracing::info!("Created user {}", user.id());

        Ok(CreateUserResponse {
            user,
            created: true,
        })
    }
}
