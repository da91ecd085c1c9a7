pub mod message_repository;
pub mod session_repository;
pub mod user_repository;

pub use message_repository::MessageRepository;
pub use session_repository::SessionRepository;
pub use user_repository::UserRepository;
