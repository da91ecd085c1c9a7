pub mod chat;
pub mod create_session;
pub mod create_user;
pub mod delete_history;
pub mod delete_session;
pub mod get_history;
pub mod ingest_documents;
pub mod list_sessions;

pub use chat::ChatUseCase;
pub use create_session::CreateSessionUseCase;
pub use create_user::CreateUserUseCase;
pub use delete_history::DeleteHistoryUseCase;
pub use delete_session::DeleteSessionUseCase;
pub use get_history::GetHistoryUseCase;
pub use ingest_documents::IngestDocumentsUseCase;
pub use list_sessions::ListSessionsUseCase;
