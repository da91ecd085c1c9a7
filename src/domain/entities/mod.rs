pub mod chunk;
pub mod message;
pub mod raw_document;
pub mod session;
pub mod user;
pub mod vector_entry;

pub use chunk::Chunk;
pub use message::Message;
pub use raw_document::{ExtractedTable, RawDocument, TextBlock};
pub use session::Session;
pub use user::User;
pub use vector_entry::VectorEntry;
