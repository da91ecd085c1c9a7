pub mod chunk_metadata;
pub mod message_role;
pub mod source_descriptor;

pub use chunk_metadata::{ChunkMetadata, ChunkType};
pub use message_role::MessageRole;
pub use source_descriptor::SourceDescriptor;
