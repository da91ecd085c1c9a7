use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug)]
pub enum CompletionProviderError {
    NetworkError(String),
    ApiError(String),
    EmptyResponse,
}

impl std::fmt::Display for CompletionProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompletionProviderError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            CompletionProviderError::ApiError(msg) => write!(f, "API error: {}", msg),
            CompletionProviderError::EmptyResponse => write!(f, "Completion returned no content"),
        }
    }
}

impl std::error::Error for CompletionProviderError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: PromptRole,
    pub content: String,
}

impl PromptMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: PromptRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: PromptRole::User,
            content: content.into(),
        }
    }
}

/// An ordered list of role-tagged messages sent to the model in one call.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChatPrompt {
    pub messages: Vec<PromptMessage>,
}

impl ChatPrompt {
    pub fn new(messages: Vec<PromptMessage>) -> Self {
        Self { messages }
    }

    pub fn system_message(&self) -> Option<&PromptMessage> {
        self.messages.iter().find(|m| m.role == PromptRole::System)
    }

    pub fn last_user_message(&self) -> Option<&PromptMessage> {
        self.messages.iter().rev().find(|m| m.role == PromptRole::User)
    }
}

/// Single-shot, non-streaming completion at temperature 0.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, prompt: &ChatPrompt) -> Result<String, CompletionProviderError>;

    fn model_name(&self) -> &str;
}
