use async_trait::async_trait;
use pgvector::Vector;
use reqwest::{Client, Error as ReqwestError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::completion_provider::{
    ChatPrompt, CompletionProvider, CompletionProviderError, PromptMessage,
};
use crate::application::ports::embedding_provider::{
    BatchEmbeddingRequest, BatchEmbeddingResponse, EmbeddingProvider, EmbeddingProviderError,
    EmbeddingRequest, EmbeddingResponse,
};

#[derive(Serialize)]
pub struct EmbedRequest<'a> {
    pub model: &'a str,
    pub input: TextInput,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextInput {
    Single(String),
    Multiple(Vec<String>),
}

#[derive(Debug, Deserialize)]
pub struct EmbedResponse {
    pub embeddings: Vec<Vec<f32>>,
}

#[derive(Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [PromptMessage],
    pub stream: bool,
    pub options: ChatOptions,
}

#[derive(Serialize)]
pub struct ChatOptions {
    pub temperature: f32,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponseMessage {
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct OllamaClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

#[derive(Debug)]
pub enum OllamaError {
    RequestError(String),
    ApiError { status: u16, body: String },
    ParseError(String),
}

impl std::fmt::Display for OllamaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OllamaError::RequestError(msg) => write!(f, "Request error: {}", msg),
            OllamaError::ApiError { status, body } => {
                write!(f, "Ollama returned {}: {}", status, body)
            }
            OllamaError::ParseError(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl std::error::Error for OllamaError {}

/// Thin client for the Ollama HTTP API. Requests are not retried.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: Client,
    config: OllamaClientConfig,
}

impl OllamaClient {
    pub fn new(config: OllamaClientConfig) -> Result<Self, ReqwestError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    pub async fn embed(&self, model: &str, input: TextInput) -> Result<Vec<Vec<f32>>, OllamaError> {
        let request = EmbedRequest { model, input };
        let response: EmbedResponse = self.post_json("/api/embed", &request).await?;
        Ok(response.embeddings)
    }

    pub async fn chat(&self, model: &str, messages: &[PromptMessage]) -> Result<String, OllamaError> {
        let request = ChatRequest {
            model,
            messages,
            stream: false,
            options: ChatOptions { temperature: 0.0 },
        };
        let response: ChatResponse = self.post_json("/api/chat", &request).await?;
        Ok(response.message.content)
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, OllamaError>
    where
        B: Serialize + ?Sized,
        R: for<'de> Deserialize<'de>,
    {
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| OllamaError::RequestError(e.without_url().to_string()))?;

        read_json(response).await
    }
}

async fn read_json<R>(response: reqwest::Response) -> Result<R, OllamaError>
where
    R: for<'de> Deserialize<'de>,
{
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(OllamaError::ApiError {
            status: status.as_u16(),
            body,
        });
    }

    response
        .json::<R>()
        .await
        .map_err(|e| OllamaError::ParseError(e.to_string()))
}

pub struct OllamaEmbeddingProvider {
    client: Arc<OllamaClient>,
    model: String,
}

impl OllamaEmbeddingProvider {
    pub fn new(client: Arc<OllamaClient>, model: &str) -> Self {
        Self {
            client,
            model: model.to_string(),
        }
    }
}

impl From<OllamaError> for EmbeddingProviderError {
    fn from(error: OllamaError) -> Self {
        match error {
            OllamaError::RequestError(msg) => EmbeddingProviderError::NetworkError(msg),
            OllamaError::ApiError { status: 503, .. } => EmbeddingProviderError::ServiceUnavailable,
            other => EmbeddingProviderError::ApiError(other.to_string()),
        }
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaEmbeddingProvider {
    async fn generate_embedding(
        &self,
        request: EmbeddingRequest,
    ) -> Result<EmbeddingResponse, EmbeddingProviderError> {
        let embedding = self
            .client
            .embed(&self.model, TextInput::Single(request.text))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| EmbeddingProviderError::ApiError("No embeddings returned".to_string()))?;

        Ok(EmbeddingResponse {
            embedding: Vector::from(embedding),
            model_name: self.model.clone(),
        })
    }

    async fn generate_embeddings(
        &self,
        request: BatchEmbeddingRequest,
    ) -> Result<BatchEmbeddingResponse, EmbeddingProviderError> {
        if request.texts.is_empty() {
            return Err(EmbeddingProviderError::InvalidInput(
                "No texts to embed".to_string(),
            ));
        }

        let embeddings = self
            .client
            .embed(&self.model, TextInput::Multiple(request.texts))
            .await?;

        Ok(BatchEmbeddingResponse {
            embeddings: embeddings.into_iter().map(Vector::from).collect(),
            model_name: self.model.clone(),
        })
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

pub struct OllamaCompletionProvider {
    client: Arc<OllamaClient>,
    model: String,
}

impl OllamaCompletionProvider {
    pub fn new(client: Arc<OllamaClient>, model: &str) -> Self {
        Self {
            client,
            model: model.to_string(),
        }
    }
}

impl From<OllamaError> for CompletionProviderError {
    fn from(error: OllamaError) -> Self {
        match error {
            OllamaError::RequestError(msg) => CompletionProviderError::NetworkError(msg),
            other => CompletionProviderError::ApiError(other.to_string()),
        }
    }
}

#[async_trait]
impl CompletionProvider for OllamaCompletionProvider {
    async fn complete(&self, prompt: &ChatPrompt) -> Result<String, CompletionProviderError> {
        let content = self.client.chat(&self.model, &prompt.messages).await?;
        Ok(content)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
