pub mod message_model;
pub mod session_model;
pub mod user_model;
pub mod vector_collection_model;
pub mod vector_entry_model;

pub use message_model::*;
pub use session_model::*;
pub use user_model::*;
pub use vector_collection_model::*;
pub use vector_entry_model::*;
