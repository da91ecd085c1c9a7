use axum::Router;
use axum::http::HeaderValue;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::classify::ServerErrorsFailureClass;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::presentation::http::{
    handlers::{ChatHandler, SessionHandler, UserHandler},
    routes::{chat_routes, health_routes, session_routes, user_routes},
};

const MAX_BODY_BYTES: usize = 1024 * 1024;

fn cors_layer(frontend_origin: &str) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if frontend_origin == "*" {
        return layer.allow_origin(Any);
    }

    match HeaderValue::from_str(frontend_origin) {
        Ok(origin) => layer.allow_origin(AllowOrigin::exact(origin)),
        Err(e) => {
            tracing::warn!(
                "Ignoring invalid FRONTEND_ORIGIN {:?}: {}; cross-origin requests will be refused",
                frontend_origin,
                e
            );
            layer
        }
    }
}

pub fn build_router(
    user_handler: Arc<UserHandler>,
    session_handler: Arc<SessionHandler>,
    chat_handler: Arc<ChatHandler>,
    frontend_origin: &str,
) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(user_routes(user_handler))
        .merge(session_routes(session_handler))
        .merge(chat_routes(chat_handler))
        .layer(cors_layer(frontend_origin))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(
            TraceLayer::new_for_http()
                .on_request(
                    |request: &axum::http::Request<axum::body::Body>, _span: &tracing::Span| {
                        tracing::info!("Received request: {} {}", request.method(), request.uri());
                    },
                )
                .on_response(
                    |response: &axum::http::Response<axum::body::Body>,
                     latency: std::time::Duration,
                     _span: &tracing::Span| {
                        tracing::info!(
                            "Response: {} (took {} ms)",
                            response.status(),
                            latency.as_millis()
                        );
                    },
                )
                .on_failure(
                    |error: ServerErrorsFailureClass,
                     latency: std::time::Duration,
                     _span: &tracing::Span| {
                        tracing::error!(
                            "Request failed: {:?} (took {} ms)",
                            error,
                            latency.as_millis()
                        );
                    },
                ),
        )
}

pub struct HttpServer {
    user_handler: Arc<UserHandler>,
    session_handler: Arc<SessionHandler>,
    chat_handler: Arc<ChatHandler>,
    bind_address: String,
    frontend_origin: String,
}

impl HttpServer {
    pub fn new(
        user_handler: Arc<UserHandler>,
        session_handler: Arc<SessionHandler>,
        chat_handler: Arc<ChatHandler>,
        bind_address: String,
        frontend_origin: String,
    ) -> Self {
        Self {
            user_handler,
            session_handler,
            chat_handler,
            bind_address,
            frontend_origin,
        }
    }

    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        let app = build_router(
            self.user_handler,
            self.session_handler,
            self.chat_handler,
            &self.frontend_origin,
        );

        let listener = TcpListener::bind(&self.bind_address).await?;
        tracing::info!("Listening on {}", listener.local_addr()?);
        axum::serve(listener, app).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::{RagService, RetrievalService};
    use crate::application::use_cases::{
        ChatUseCase, CreateSessionUseCase, CreateUserUseCase, DeleteHistoryUseCase,
        DeleteSessionUseCase, GetHistoryUseCase, ListSessionsUseCase,
    };
    use crate::domain::entities::VectorEntry;
    use crate::domain::value_objects::ChunkMetadata;
    use crate::testing::{
        InMemoryChatStore, InMemoryVectorIndex, KeywordEmbeddingProvider,
        ScriptedCompletionProvider,
    };
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use pgvector::Vector;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    struct TestApp {
        router: Router,
        completion: Arc<ScriptedCompletionProvider>,
    }

    fn test_app() -> TestApp {
        let store = Arc::new(InMemoryChatStore::default());
        let completion = Arc::new(ScriptedCompletionProvider::new("Ozone peaks mid-afternoon."));
        let index = Arc::new(InMemoryVectorIndex::with_entries(vec![VectorEntry::new(
            "Ozone peaks between 2pm and 5pm.".to_string(),
            Vector::from(vec![1.0, 0.1]),
            ChunkMetadata::text("data/ozone.pdf", 3),
            0,
        )]));
        let retrieval = Arc::new(RetrievalService::new(
            Arc::new(KeywordEmbeddingProvider::new(&["ozone"])),
            index,
        ));
        let rag = Arc::new(RagService::new(retrieval, completion.clone()));

        let user_handler = Arc::new(UserHandler::new(Arc::new(CreateUserUseCase::new(
            store.clone(),
        ))));
        let session_handler = Arc::new(SessionHandler::new(
            Arc::new(CreateSessionUseCase::new(store.clone(), store.clone())),
            Arc::new(ListSessionsUseCase::new(store.clone())),
            Arc::new(GetHistoryUseCase::new(store.clone(), store.clone())),
            Arc::new(DeleteHistoryUseCase::new(store.clone(), store.clone())),
            Arc::new(DeleteSessionUseCase::new(store.clone())),
        ));
        let chat_handler = Arc::new(ChatHandler::new(Arc::new(ChatUseCase::new(
            rag,
            store.clone(),
            store,
        ))));

        TestApp {
            router: build_router(
                user_handler,
                session_handler,
                chat_handler,
                "http://localhost:5173",
            ),
            completion,
        }
    }

    async fn call(
        app: &TestApp,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn new_session(app: &TestApp) -> (String, String) {
        let (_, user) = call(
            app,
            "POST",
            "/user",
            Some(json!({"email": "ana@example.com", "username": "ana"})),
        )
        .await;
        let user_id = user["data"]["id"].as_str().unwrap().to_string();

        let (status, session) =
            call(app, "POST", "/sessions", Some(json!({"user_id": user_id}))).await;
        assert_eq!(status, StatusCode::CREATED);
        let session_id = session["data"]["id"].as_str().unwrap().to_string();

        (user_id, session_id)
    }

    #[tokio::test]
    async fn test_health() {
        let app = test_app();

        let (status, body) = call(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["data"]["status"], json!("healthy"));

        let (status, body) = call(&app, "GET", "/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], json!("docrag"));
    }

    #[tokio::test]
    async fn test_create_user_is_idempotent() {
        let app = test_app();
        let payload = json!({"email": "ana@example.com", "username": "ana"});

        let (first_status, first) = call(&app, "POST", "/user", Some(payload.clone())).await;
        let (second_status, second) = call(&app, "POST", "/user", Some(payload)).await;

        assert_eq!(first_status, StatusCode::CREATED);
        assert_eq!(second_status, StatusCode::OK);
        assert_eq!(first["data"]["id"], second["data"]["id"]);
        assert_eq!(first["data"]["username"], json!("ana"));
    }

    #[tokio::test]
    async fn test_create_user_rejects_blank_fields() {
        let app = test_app();

        let (status, body) = call(
            &app,
            "POST",
            "/user",
            Some(json!({"email": "  ", "username": "ana"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["error"]["code"], json!("INVALID_USER"));
    }

    #[tokio::test]
    async fn test_chat_round_trip() {
        let app = test_app();
        let (user_id, session_id) = new_session(&app).await;

        let (status, body) = call(
            &app,
            "POST",
            "/chat",
            Some(json!({
                "user_id": user_id,
                "session_id": session_id,
                "query": "When does ozone peak?"
            })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["answer"], json!("Ozone peaks mid-afternoon."));
        assert_eq!(body["data"]["session_id"], json!(session_id));
        assert_eq!(body["data"]["sources"][0]["source"], json!("data/ozone.pdf"));
        assert_eq!(body["data"]["sources"][0]["page"], json!(3));

        let (status, history) =
            call(&app, "GET", &format!("/sessions/{}/history", session_id), None).await;
        assert_eq!(status, StatusCode::OK);
        let messages = history["data"]["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["role"], json!("user"));
        assert_eq!(messages[1]["role"], json!("assistant"));

        let sessions_uri = format!("/sessions?user_id={}", user_id);
        let (_, sessions) = call(&app, "GET", &sessions_uri, None).await;
        assert_eq!(sessions["data"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_chat_errors_map_to_status_codes() {
        let app = test_app();
        let (user_id, session_id) = new_session(&app).await;

        let (status, _) = call(
            &app,
            "POST",
            "/chat",
            Some(json!({"user_id": user_id, "session_id": session_id, "query": "   "})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = call(
            &app,
            "POST",
            "/chat",
            Some(json!({
                "user_id": uuid::Uuid::new_v4(),
                "session_id": session_id,
                "query": "hello"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["message"], json!("Session not found for user"));

        app.completion.fail_answers();
        let (status, body) = call(
            &app,
            "POST",
            "/chat",
            Some(json!({"user_id": user_id, "session_id": session_id, "query": "hello"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["code"], json!("GENERATION_FAILED"));
    }

    #[tokio::test]
    async fn test_delete_history_then_session() {
        let app = test_app();
        let (user_id, session_id) = new_session(&app).await;
        call(
            &app,
            "POST",
            "/chat",
            Some(json!({"user_id": user_id, "session_id": session_id, "query": "ozone?"})),
        )
        .await;

        let history_uri = format!("/sessions/{}/history", session_id);
        let (status, body) = call(&app, "DELETE", &history_uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["ok"], json!(true));

        let (_, history) = call(&app, "GET", &history_uri, None).await;
        assert!(history["data"]["messages"].as_array().unwrap().is_empty());

        let session_uri = format!("/sessions/{}", session_id);
        let (status, _) = call(&app, "DELETE", &session_uri, None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = call(&app, "GET", &history_uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = call(&app, "DELETE", &session_uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
