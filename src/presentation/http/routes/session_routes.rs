use axum::{
    Router,
    routing::{delete, get},
};
use std::sync::Arc;

use crate::presentation::http::handlers::SessionHandler;

pub fn session_routes(session_handler: Arc<SessionHandler>) -> Router {
    Router::new()
        .route(
            "/sessions",
            get(SessionHandler::list_sessions).post(SessionHandler::create_session),
        )
        .route("/sessions/{session_id}", delete(SessionHandler::delete_session))
        .route(
            "/sessions/{session_id}/history",
            get(SessionHandler::get_history).delete(SessionHandler::delete_history),
        )
        .with_state(session_handler)
}
