pub mod chat_dto;
pub mod response_dto;
pub mod session_dto;
pub mod user_dto;

pub use chat_dto::*;
pub use response_dto::*;
pub use session_dto::*;
pub use user_dto::*;
