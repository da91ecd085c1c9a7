use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::use_cases::{
    CreateSessionUseCase, DeleteHistoryUseCase, DeleteSessionUseCase, GetHistoryUseCase,
    ListSessionsUseCase,
    create_session::CreateSessionRequest,
    delete_history::{DeleteHistoryError, DeleteHistoryRequest},
    delete_session::{DeleteSessionError, DeleteSessionRequest},
    get_history::{GetHistoryError, GetHistoryRequest},
    list_sessions::ListSessionsRequest,
};
use crate::presentation::http::dto::{
    ApiResponse, CreateSessionRequestDto, HistoryDto, ListSessionsQueryDto, OkResponseDto,
    SessionDto,
};

pub struct SessionHandler {
    create_session_use_case: Arc<CreateSessionUseCase>,
    list_sessions_use_case: Arc<ListSessionsUseCase>,
    get_history_use_case: Arc<GetHistoryUseCase>,
    delete_history_use_case: Arc<DeleteHistoryUseCase>,
    delete_session_use_case: Arc<DeleteSessionUseCase>,
}

fn not_found_or_internal(
    not_found: bool,
    action: &str,
    message: String,
) -> (StatusCode, Json<ApiResponse<OkResponseDto>>) {
    if not_found {
        (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("SESSION_NOT_FOUND", message, None)),
        )
    } else {
        tracing::error!("Failed to {}: {}", action, message);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error("SESSION_OPERATION_FAILED", message, None)),
        )
    }
}

impl SessionHandler {
    pub fn new(
        create_session_use_case: Arc<CreateSessionUseCase>,
        list_sessions_use_case: Arc<ListSessionsUseCase>,
        get_history_use_case: Arc<GetHistoryUseCase>,
        delete_history_use_case: Arc<DeleteHistoryUseCase>,
        delete_session_use_case: Arc<DeleteSessionUseCase>,
    ) -> Self {
        Self {
            create_session_use_case,
            list_sessions_use_case,
            get_history_use_case,
            delete_history_use_case,
            delete_session_use_case,
        }
    }

    pub async fn create_session(
        State(handler): State<Arc<SessionHandler>>,
        Json(payload): Json<CreateSessionRequestDto>,
    ) -> Result<impl IntoResponse, StatusCode> {
        let request = CreateSessionRequest {
            user_id: payload.user_id,
            name: payload.name,
        };

        match handler.create_session_use_case.execute(request).await {
            Ok(response) => Ok((
                StatusCode::CREATED,
                Json(ApiResponse::success(SessionDto::from(response.session))),
            )),
            Err(e) => {
                tracing::error!("Failed to create session: {}", e);
                Ok((
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiResponse::error("CREATE_SESSION_FAILED", e.to_string(), None)),
                ))
            }
        }
    }

    pub async fn list_sessions(
        State(handler): State<Arc<SessionHandler>>,
        Query(params): Query<ListSessionsQueryDto>,
    ) -> Result<impl IntoResponse, StatusCode> {
        let request = ListSessionsRequest {
            user_id: params.user_id,
        };

        match handler.list_sessions_use_case.execute(request).await {
            Ok(response) => {
                let sessions: Vec<SessionDto> =
                    response.sessions.into_iter().map(SessionDto::from).collect();
                Ok((StatusCode::OK, Json(ApiResponse::success(sessions))))
            }
            Err(e) => {
                tracing::error!("Failed to list sessions: {}", e);
                Ok((
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiResponse::error("LIST_SESSIONS_FAILED", e.to_string(), None)),
                ))
            }
        }
    }

    pub async fn get_history(
        State(handler): State<Arc<SessionHandler>>,
        Path(session_id): Path<Uuid>,
    ) -> Result<impl IntoResponse, StatusCode> {
        match handler
            .get_history_use_case
            .execute(GetHistoryRequest { session_id })
            .await
        {
            Ok(response) => Ok((
                StatusCode::OK,
                Json(ApiResponse::success(HistoryDto::from(response))),
            )),
            Err(GetHistoryError::SessionNotFound(id)) => Ok((
                StatusCode::NOT_FOUND,
                Json(ApiResponse::error(
                    "SESSION_NOT_FOUND",
                    format!("Session not found: {}", id),
                    None,
                )),
            )),
            Err(e) => {
                tracing::error!("Failed to load history: {}", e);
                Ok((
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiResponse::error("GET_HISTORY_FAILED", e.to_string(), None)),
                ))
            }
        }
    }

    pub async fn delete_history(
        State(handler): State<Arc<SessionHandler>>,
        Path(session_id): Path<Uuid>,
    ) -> Result<impl IntoResponse, StatusCode> {
        match handler
            .delete_history_use_case
            .execute(DeleteHistoryRequest { session_id })
            .await
        {
            Ok(response) => {
                tracing::info!(
                    "Deleted {} messages from session {}",
                    response.deleted_messages,
                    session_id
                );
                Ok((StatusCode::OK, Json(ApiResponse::success(OkResponseDto::ok()))))
            }
            Err(e) => Ok(not_found_or_internal(
                matches!(e, DeleteHistoryError::SessionNotFound(_)),
                "delete history",
                e.to_string(),
            )),
        }
    }

    pub async fn delete_session(
        State(handler): State<Arc<SessionHandler>>,
        Path(session_id): Path<Uuid>,
    ) -> Result<impl IntoResponse, StatusCode> {
        match handler
            .delete_session_use_case
            .execute(DeleteSessionRequest { session_id })
            .await
        {
            Ok(()) => Ok((StatusCode::OK, Json(ApiResponse::success(OkResponseDto::ok())))),
            Err(e) => Ok(not_found_or_internal(
                matches!(e, DeleteSessionError::SessionNotFound(_)),
                "delete session",
                e.to_string(),
            )),
        }
    }
}
