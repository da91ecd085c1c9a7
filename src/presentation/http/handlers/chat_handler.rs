use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use std::sync::Arc;

use crate::application::use_cases::{
    ChatUseCase,
    chat::{ChatError, ChatRequest},
};
use crate::presentation::http::dto::{ApiResponse, ChatRequestDto, ChatResponseDto};

pub struct ChatHandler {
    chat_use_case: Arc<ChatUseCase>,
}

impl ChatHandler {
    pub fn new(chat_use_case: Arc<ChatUseCase>) -> Self {
        Self { chat_use_case }
    }

    pub async fn chat(
        State(handler): State<Arc<ChatHandler>>,
        Json(payload): Json<ChatRequestDto>,
    ) -> Result<impl IntoResponse, StatusCode> {
        let request = ChatRequest {
            user_id: payload.user_id,
            session_id: payload.session_id,
            query: payload.query,
        };

        match handler.chat_use_case.execute(request).await {
            Ok(response) => Ok((
                StatusCode::OK,
                Json(ApiResponse::success(ChatResponseDto::from(response))),
            )),
            Err(e) => {
                let (status, code) = match &e {
                    ChatError::ValidationError(_) => (StatusCode::BAD_REQUEST, "EMPTY_QUERY"),
                    ChatError::SessionNotFound(_) => (StatusCode::NOT_FOUND, "SESSION_NOT_FOUND"),
                    ChatError::GenerationError(_) => {
                        tracing::error!("Chat generation failed: {}", e);
                        (StatusCode::BAD_GATEWAY, "GENERATION_FAILED")
                    }
                    ChatError::RepositoryError(_) => {
                        tracing::error!("Chat persistence failed: {}", e);
                        (StatusCode::INTERNAL_SERVER_ERROR, "CHAT_FAILED")
                    }
                };
                Ok((status, Json(ApiResponse::error(code, e.to_string(), None))))
            }
        }
    }
}
