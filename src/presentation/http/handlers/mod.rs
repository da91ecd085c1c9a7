pub mod chat_handler;
pub mod session_handler;
pub mod user_handler;

pub use chat_handler::ChatHandler;
pub use session_handler::SessionHandler;
pub use user_handler::UserHandler;
