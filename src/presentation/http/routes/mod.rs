pub mod chat_routes;
pub mod health_routes;
pub mod session_routes;
pub mod user_routes;

pub use chat_routes::*;
pub use health_routes::*;
pub use session_routes::*;
pub use user_routes::*;
