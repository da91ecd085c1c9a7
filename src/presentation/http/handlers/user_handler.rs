use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use std::sync::Arc;

use crate::application::use_cases::{
    CreateUserUseCase,
    create_user::{CreateUserError, CreateUserRequest},
};
use crate::presentation::http::dto::{ApiResponse, CreateUserRequestDto, UserDto};

pub struct UserHandler {
    create_user_use_case: Arc<CreateUserUseCase>,
}

impl UserHandler {
    pub fn new(create_user_use_case: Arc<CreateUserUseCase>) -> Self {
        Self {
            create_user_use_case,
        }
    }

    pub async fn create_user(
        State(handler): State<Arc<UserHandler>>,
        Json(payload): Json<CreateUserRequestDto>,
    ) -> Result<impl IntoResponse, StatusCode> {
        let request = CreateUserRequest {
            email: payload.email,
            username: payload.username,
        };

        match handler.create_user_use_case.execute(request).await {
            Ok(response) => {
                let status = if response.created {
                    StatusCode::CREATED
                } else {
                    StatusCode::OK
                };
                Ok((
                    status,
                    Json(ApiResponse::success(UserDto::from(response.user))),
                ))
            }
            Err(e) => {
                let (status, code) = match &e {
                    CreateUserError::ValidationError(_) => {
                        (StatusCode::BAD_REQUEST, "INVALID_USER")
                    }
                    CreateUserError::Conflict(_) => (StatusCode::CONFLICT, "USER_CONFLICT"),
                    CreateUserError::RepositoryError(_) => {
                        tracing::error!("Failed to create user: {}", e);
                        (StatusCode::INTERNAL_SERVER_ERROR, "CREATE_USER_FAILED")
                    }
                };
                Ok((status, Json(ApiResponse::error(code, e.to_string(), None))))
            }
        }
    }
}
