//! In-memory doubles for the ports and repositories, shared by unit tests.

use async_trait::async_trait;
use pgvector::Vector;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use uuid::Uuid;

use crate::application::ports::completion_provider::{
    ChatPrompt, CompletionProvider, CompletionProviderError,
};
use crate::application::ports::document_extractor::{DocumentExtractionError, DocumentExtractor};
use crate::application::ports::embedding_provider::{
    BatchEmbeddingRequest, BatchEmbeddingResponse, EmbeddingProvider, EmbeddingProviderError,
    EmbeddingRequest, EmbeddingResponse,
};
use crate::application::ports::vector_index::{
    SimilaritySearchResult, VectorIndex, VectorIndexError,
};
use crate::domain::entities::{Message, RawDocument, Session, User, VectorEntry};
use crate::domain::repositories::message_repository::{MessageRepository, MessageRepositoryError};
use crate::domain::repositories::session_repository::{
    ChatTurn, RecordedTurn, SessionRepository, SessionRepositoryError,
};
use crate::domain::repositories::user_repository::{UserRepository, UserRepositoryError};

/// Embeds text as keyword occurrence counts plus a constant bias dimension.
pub struct KeywordEmbeddingProvider {
    keywords: Vec<String>,
    failing: AtomicBool,
    calls: AtomicUsize,
    batch_sizes: Mutex<Vec<usize>>,
}

impl KeywordEmbeddingProvider {
    pub fn new(keywords: &[&str]) -> Self {
        Self {
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
            failing: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
            batch_sizes: Mutex::new(Vec::new()),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn batch_sizes(&self) -> Vec<usize> {
        self.batch_sizes.lock().unwrap().clone()
    }

    pub fn embed(&self, text: &str) -> Vector {
        let lowered = text.to_lowercase();
        let mut values: Vec<f32> = self
            .keywords
            .iter()
            .map(|k| lowered.matches(k.as_str()).count() as f32)
            .collect();
        values.push(0.1);
        Vector::from(values)
    }

    fn check(&self) -> Result<(), EmbeddingProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(EmbeddingProviderError::ServiceUnavailable);
        }
        Ok(())
    }
}

#[async_trait]
impl EmbeddingProvider for KeywordEmbeddingProvider {
    async fn generate_embedding(
        &self,
        request: EmbeddingRequest,
    ) -> Result<EmbeddingResponse, EmbeddingProviderError> {
        self.check()?;
        Ok(EmbeddingResponse {
            embedding: self.embed(&request.text),
            model_name: self.model_name().to_string(),
        })
    }

    async fn generate_embeddings(
        &self,
        request: BatchEmbeddingRequest,
    ) -> Result<BatchEmbeddingResponse, EmbeddingProviderError> {
        self.check()?;
        self.batch_sizes.lock().unwrap().push(request.texts.len());
        Ok(BatchEmbeddingResponse {
            embeddings: request.texts.iter().map(|t| self.embed(t)).collect(),
            model_name: self.model_name().to_string(),
        })
    }

    fn model_name(&self) -> &str {
        "keyword-test"
    }
}

/// Answers chat prompts (those carrying a system message) with a fixed
/// answer and naming prompts with a fixed name.
pub struct ScriptedCompletionProvider {
    answer: String,
    session_name: Option<String>,
    fail_answers: AtomicBool,
    prompts: Mutex<Vec<ChatPrompt>>,
}

impl ScriptedCompletionProvider {
    pub fn new(answer: &str) -> Self {
        Self {
            answer: answer.to_string(),
            session_name: None,
            fail_answers: AtomicBool::new(false),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn with_session_name(mut self, name: &str) -> Self {
        self.session_name = Some(name.to_string());
        self
    }

    pub fn fail_answers(&self) {
        self.fail_answers.store(true, Ordering::SeqCst);
    }

    pub fn prompts(&self) -> Vec<ChatPrompt> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn naming_calls(&self) -> usize {
        self.prompts()
            .iter()
            .filter(|p| p.system_message().is_none())
            .count()
    }
}

#[async_trait]
impl CompletionProvider for ScriptedCompletionProvider {
    async fn complete(&self, prompt: &ChatPrompt) -> Result<String, CompletionProviderError> {
        self.prompts.lock().unwrap().push(prompt.clone());

        if prompt.system_message().is_some() {
            if self.fail_answers.load(Ordering::SeqCst) {
                return Err(CompletionProviderError::NetworkError(
                    "connection refused".to_string(),
                ));
            }
            return Ok(self.answer.clone());
        }

        self.session_name
            .clone()
            .ok_or_else(|| CompletionProviderError::ApiError("naming unavailable".to_string()))
    }

    fn model_name(&self) -> &str {
        "scripted-test"
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> Option<f32> {
    if a.len() != b.len() {
        return None;
    }

    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return None;
    }
    Some(dot / (norm_a * norm_b))
}

#[derive(Default)]
pub struct InMemoryVectorIndex {
    entries: Mutex<Vec<VectorEntry>>,
    embedding_model: Mutex<Option<String>>,
}

impl InMemoryVectorIndex {
    pub fn with_entries(entries: Vec<VectorEntry>) -> Self {
        Self {
            entries: Mutex::new(entries),
            embedding_model: Mutex::new(None),
        }
    }

    pub fn texts(&self) -> Vec<String> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .map(|e| e.text().to_string())
            .collect()
    }

    pub fn embedding_model(&self) -> Option<String> {
        self.embedding_model.lock().unwrap().clone()
    }
}

#[async_trait]
impl VectorIndex for InMemoryVectorIndex {
    async fn add(&self, entries: &[VectorEntry]) -> Result<(), VectorIndexError> {
        self.entries.lock().unwrap().extend_from_slice(entries);
        Ok(())
    }

    async fn rebuild(
        &self,
        entries: &[VectorEntry],
        embedding_model: &str,
    ) -> Result<(), VectorIndexError> {
        *self.entries.lock().unwrap() = entries.to_vec();
        *self.embedding_model.lock().unwrap() = Some(embedding_model.to_string());
        Ok(())
    }

    async fn search(
        &self,
        query: &Vector,
        k: usize,
    ) -> Result<Vec<SimilaritySearchResult>, VectorIndexError> {
        let entries = self.entries.lock().unwrap();
        let mut scored: Vec<(f32, &VectorEntry)> = entries
            .iter()
            .map(|e| {
                let score = cosine_similarity(e.embedding().as_slice(), query.as_slice());
                (score.unwrap_or(f32::MIN), e)
            })
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));

        Ok(scored
            .into_iter()
            .take(k)
            .map(|(score, e)| SimilaritySearchResult {
                text: e.text().to_string(),
                metadata: e.metadata().clone(),
                score: Some(score),
            })
            .collect())
    }

    async fn count(&self) -> Result<i64, VectorIndexError> {
        Ok(self.entries.lock().unwrap().len() as i64)
    }

    fn collection(&self) -> &str {
        "memory"
    }
}

/// Maps file names to canned extraction results.
#[derive(Default)]
pub struct StaticDocumentExtractor {
    documents: HashMap<String, RawDocument>,
    failures: Vec<String>,
}

impl StaticDocumentExtractor {
    pub fn with_document(mut self, file_name: &str, document: RawDocument) -> Self {
        self.documents.insert(file_name.to_string(), document);
        self
    }

    pub fn with_failure(mut self, file_name: &str) -> Self {
        self.failures.push(file_name.to_string());
        self
    }
}

#[async_trait]
impl DocumentExtractor for StaticDocumentExtractor {
    async fn extract(&self, file_path: &Path) -> Result<RawDocument, DocumentExtractionError> {
        let name = file_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();

        if self.failures.iter().any(|f| f == name) {
            return Err(DocumentExtractionError::CorruptedFile(name.to_string()));
        }

        self.documents
            .get(name)
            .cloned()
            .ok_or_else(|| DocumentExtractionError::IoError(format!("{} not found", name)))
    }

    fn supported_extensions(&self) -> Vec<String> {
        vec!["pdf".to_string()]
    }
}

/// Users, sessions and messages kept in process memory, with the same
/// ordering and cascade rules as the database.
#[derive(Default)]
pub struct InMemoryChatStore {
    users: Mutex<HashMap<Uuid, User>>,
    sessions: Mutex<HashMap<Uuid, Session>>,
    messages: Mutex<Vec<Message>>,
}

impl InMemoryChatStore {
    pub fn user_count(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    pub fn message_count(&self) -> usize {
        self.messages.lock().unwrap().len()
    }
}

#[async_trait]
impl UserRepository for InMemoryChatStore {
    async fn save(&self, user: &User) -> Result<(), UserRepositoryError> {
        let mut users = self.users.lock().unwrap();
        let conflict = users.values().any(|existing| {
            existing.id() != user.id()
                && ((user.email().is_some() && existing.email() == user.email())
                    || (user.username().is_some() && existing.username() == user.username()))
        });
        if conflict {
            return Err(UserRepositoryError::DuplicateError(
                "email or username already taken".to_string(),
            ));
        }
        users.entry(user.id()).or_insert_with(|| user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, UserRepositoryError> {
        Ok(self.users.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_email_and_username(
        &self,
        email: &str,
        username: &str,
    ) -> Result<Option<User>, UserRepositoryError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.matches(email, username))
            .cloned())
    }
}

#[async_trait]
impl SessionRepository for InMemoryChatStore {
    async fn save(&self, session: &Session) -> Result<(), SessionRepositoryError> {
        if !self.users.lock().unwrap().contains_key(&session.user_id()) {
            return Err(SessionRepositoryError::DatabaseError(
                "foreign key violation on user_id".to_string(),
            ));
        }
        self.sessions
            .lock()
            .unwrap()
            .insert(session.id(), session.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Session>, SessionRepositoryError> {
        Ok(self.sessions.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Vec<Session>, SessionRepositoryError> {
        let mut sessions: Vec<Session> = self
            .sessions
            .lock()
            .unwrap()
            .values()
            .filter(|s| s.user_id() == user_id)
            .cloned()
            .collect();
        sessions.sort_by(|a, b| b.updated_at().cmp(&a.updated_at()));
        Ok(sessions)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, SessionRepositoryError> {
        let removed = self.sessions.lock().unwrap().remove(&id).is_some();
        if removed {
            self.messages
                .lock()
                .unwrap()
                .retain(|m| m.session_id() != id);
        }
        Ok(removed)
    }

    async fn record_turn(
        &self,
        session_id: Uuid,
        turn: ChatTurn,
    ) -> Result<RecordedTurn, SessionRepositoryError> {
        let mut sessions = self.sessions.lock().unwrap();
        let session = sessions
            .get_mut(&session_id)
            .ok_or(SessionRepositoryError::NotFound(session_id))?;

        let mut messages = self.messages.lock().unwrap();
        let last_position = messages
            .iter()
            .filter(|m| m.session_id() == session_id)
            .map(|m| m.position())
            .max()
            .unwrap_or(0);

        let user_message = turn.user_message.with_position(last_position + 1);
        let assistant_message = turn.assistant_message.with_position(last_position + 2);
        messages.push(user_message.clone());
        messages.push(assistant_message.clone());

        match turn.rename_to {
            Some(name) if session.has_default_name() => session.rename(&name),
            _ => session.touch(),
        }

        Ok(RecordedTurn {
            user_message,
            assistant_message,
            session: session.clone(),
        })
    }
}

#[async_trait]
impl MessageRepository for InMemoryChatStore {
    async fn find_by_session_id(
        &self,
        session_id: Uuid,
    ) -> Result<Vec<Message>, MessageRepositoryError> {
        let mut messages: Vec<Message> = self
            .messages
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.session_id() == session_id)
            .cloned()
            .collect();
        messages.sort_by_key(|m| m.position());
        Ok(messages)
    }

    async fn delete_by_session_id(&self, session_id: Uuid) -> Result<i64, MessageRepositoryError> {
        let mut messages = self.messages.lock().unwrap();
        let before = messages.len();
        messages.retain(|m| m.session_id() != session_id);
        Ok((before - messages.len()) as i64)
    }
}
