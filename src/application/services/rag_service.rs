use std::sync::Arc;

use crate::application::ports::CompletionProvider;
use crate::application::services::prompt_composer::PromptComposer;
use crate::application::services::retrieval_service::{DEFAULT_TOP_K, RetrievalService};
use crate::domain::entities::Message;
use crate::domain::entities::session::MAX_SESSION_NAME_LEN;
use crate::domain::value_objects::SourceDescriptor;
use crate::infrastructure::timing::timed;

#[derive(Debug)]
pub enum RagError {
    RetrievalError(String),
    CompletionError(String),
    EmptySessionName,
}

impl std::fmt::Display for RagError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RagError::RetrievalError(msg) => write!(f, "Retrieval error: {}", msg),
            RagError::CompletionError(msg) => write!(f, "Completion error: {}", msg),
            RagError::EmptySessionName => write!(f, "Model returned an empty session name"),
        }
    }
}

impl std::error::Error for RagError {}

#[derive(Debug, Clone, PartialEq)]
pub struct RagAnswer {
    pub answer: String,
    /// One per retrieved chunk, in retrieval order.
    pub sources: Vec<SourceDescriptor>,
}

pub struct RagService {
    retrieval_service: Arc<RetrievalService>,
    completion_provider: Arc<dyn CompletionProvider>,
    prompt_composer: PromptComposer,
    top_k: usize,
}

impl RagService {
    pub fn new(
        retrieval_service: Arc<RetrievalService>,
        completion_provider: Arc<dyn CompletionProvider>,
    ) -> Self {
        Self {
            retrieval_service,
            completion_provider,
            prompt_composer: PromptComposer::new(),
            top_k: DEFAULT_TOP_K,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub async fn answer(&self, question: &str, history: &[Message]) -> Result<RagAnswer, RagError> {
        let retrieved = self
            .retrieval_service
            .retrieve(question, self.top_k)
            .await
            .map_err(|e| RagError::RetrievalError(e.to_string()))?;

        let context: Vec<&str> = retrieved.iter().map(|r| r.text.as_str()).collect();
        let prompt = self.prompt_composer.compose(&context, history, question);

        let answer = timed("completion", self.completion_provider.complete(&prompt))
            .await
            .map_err(|e| RagError::CompletionError(e.to_string()))?;

        let sources = retrieved
            .iter()
            .map(|r| SourceDescriptor::from_metadata(Some(&r.metadata), r.score))
            .collect();

        Ok(RagAnswer { answer, sources })
    }

    pub async fn name_session(&self, messages: &[Message]) -> Result<String, RagError> {
        let prompt = self.prompt_composer.compose_session_name(messages);

        let raw = timed("session naming", self.completion_provider.complete(&prompt))
            .await
            .map_err(|e| RagError::CompletionError(e.to_string()))?;

        let name = clean_session_name(&raw);
        if name.is_empty() {
            return Err(RagError::EmptySessionName);
        }

        Ok(name)
    }
}

fn clean_session_name(raw: &str) -> String {
    raw.trim()
        .trim_matches('"')
        .trim_matches('\'')
        .trim()
        .chars()
        .take(MAX_SESSION_NAME_LEN)
        .collect()
}
