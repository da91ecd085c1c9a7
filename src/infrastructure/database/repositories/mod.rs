pub mod pgvector_index;
pub mod postgres_message_repository;
pub mod postgres_session_repository;
pub mod postgres_user_repository;

pub use pgvector_index::PgVectorIndex;
pub use postgres_message_repository::PostgresMessageRepository;
pub use postgres_session_repository::PostgresSessionRepository;
pub use postgres_user_repository::PostgresUserRepository;
