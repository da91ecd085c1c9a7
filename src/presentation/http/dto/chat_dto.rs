use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::use_cases::chat::ChatResponse;
use crate::domain::value_objects::SourceDescriptor;

#[derive(Debug, Deserialize)]
pub struct ChatRequestDto {
    pub user_id: Uuid,
    pub session_id: Uuid,
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct SourceDto {
    pub source: String,
    pub page: Option<i32>,
    pub score: Option<f32>,
}

impl From<SourceDescriptor> for SourceDto {
    fn from(descriptor: SourceDescriptor) -> Self {
        Self {
            source: descriptor.source,
            page: descriptor.page,
            score: descriptor.score,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChatResponseDto {
    pub answer: String,
    pub sources: Vec<SourceDto>,
    pub session_id: Uuid,
    pub session_name: String,
}

impl From<ChatResponse> for ChatResponseDto {
    fn from(response: ChatResponse) -> Self {
        Self {
            answer: response.answer,
            sources: response.sources.into_iter().map(SourceDto::from).collect(),
            session_id: response.session.id(),
            session_name: response.session.name().to_string(),
        }
    }
}
