use std::sync::Arc;

use crate::{
    application::{
        ports::{CompletionProvider, DocumentChunker, DocumentExtractor, EmbeddingProvider, VectorIndex},
        services::{IngestionService, RagService, RetrievalService},
        use_cases::{
            ChatUseCase, CreateSessionUseCase, CreateUserUseCase, DeleteHistoryUseCase,
            DeleteSessionUseCase, GetHistoryUseCase, IngestDocumentsUseCase, ListSessionsUseCase,
        },
    },
    domain::repositories::{MessageRepository, SessionRepository, UserRepository},
    infrastructure::{
        config::AppConfig,
        database::{
            DbPool, create_connection_pool,
            repositories::{
                PgVectorIndex, PostgresMessageRepository, PostgresSessionRepository,
                PostgresUserRepository,
            },
            run_migrations,
        },
        external_services::{
            OllamaClient, OllamaCompletionProvider, OllamaEmbeddingProvider,
            document_extractors::PdfExtractor, ollama_client::OllamaClientConfig,
            semantic_chunking::RTSplitter,
        },
    },
    presentation::http::handlers::{ChatHandler, SessionHandler, UserHandler},
};

/// Process-wide wiring for the API server. Everything here is built once and
/// shared behind `Arc`.
pub struct AppContainer {
    pub config: AppConfig,

    // Repositories
    pub user_repository: Arc<dyn UserRepository>,
    pub session_repository: Arc<dyn SessionRepository>,
    pub message_repository: Arc<dyn MessageRepository>,

    // External Services
    pub embedding_provider: Arc<dyn EmbeddingProvider>,
    pub completion_provider: Arc<dyn CompletionProvider>,
    pub vector_index: Arc<dyn VectorIndex>,

    // Application Services
    pub retrieval_service: Arc<RetrievalService>,
    pub rag_service: Arc<RagService>,

    // HTTP Handlers
    pub user_handler: Arc<UserHandler>,
    pub session_handler: Arc<SessionHandler>,
    pub chat_handler: Arc<ChatHandler>,
}

fn connect(config: &AppConfig) -> Result<DbPool, Box<dyn std::error::Error>> {
    let db_pool = create_connection_pool(&config.database_url)
        .map_err(|e| format!("Failed to create database pool: {}", e))?;
    run_migrations(&db_pool).map_err(|e| format!("Failed to run database migrations: {}", e))?;
    Ok(db_pool)
}

fn ollama_client(config: &AppConfig) -> Result<Arc<OllamaClient>, Box<dyn std::error::Error>> {
    let client = OllamaClient::new(OllamaClientConfig {
        base_url: config.ollama_base_url.clone(),
        timeout: config.request_timeout,
    })
    .map_err(|e| format!("Failed to build Ollama client: {}", e))?;
    Ok(Arc::new(client))
}

impl AppContainer {
    /// Connects to the database and opens the configured collection. A
    /// missing collection is fatal: run the ingest binary first.
    pub async fn new(config: AppConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let db_pool = connect(&config)?;

        // Create repositories
        let user_repository: Arc<dyn UserRepository> =
            Arc::new(PostgresUserRepository::new(db_pool.clone()));
        let session_repository: Arc<dyn SessionRepository> =
            Arc::new(PostgresSessionRepository::new(db_pool.clone()));
        let message_repository: Arc<dyn MessageRepository> =
            Arc::new(PostgresMessageRepository::new(db_pool.clone()));

        // Open the vector collection
        let index = PgVectorIndex::open(db_pool, &config.vector_collection)
            .await
            .map_err(|e| {
                format!(
                    "Failed to open vector collection '{}': {}",
                    config.vector_collection, e
                )
            })?;
        if let Some(info) = index
            .collection_info()
            .await
            .map_err(|e| format!("Failed to read vector collection: {}", e))?
        {
            if info.embedding_model != config.embedding_model {
                tracing::warn!(
                    "Collection '{}' was built with {} but EMBEDDING_MODEL is {}",
                    info.name,
                    info.embedding_model,
                    config.embedding_model
                );
            }
            tracing::info!(
                "Opened collection '{}' ({} entries, {} dimensions)",
                info.name,
                info.entry_count,
                info.dimension
            );
        }
        let vector_index: Arc<dyn VectorIndex> = Arc::new(index);

        // Create external services
        let client = ollama_client(&config)?;
        let embedding_provider: Arc<dyn EmbeddingProvider> = Arc::new(
            OllamaEmbeddingProvider::new(client.clone(), &config.embedding_model),
        );
        let completion_provider: Arc<dyn CompletionProvider> = Arc::new(
            OllamaCompletionProvider::new(client, &config.completion_model),
        );

        // Create application services
        let retrieval_service = Arc::new(RetrievalService::new(
            embedding_provider.clone(),
            vector_index.clone(),
        ));
        let rag_service = Arc::new(RagService::new(
            retrieval_service.clone(),
            completion_provider.clone(),
        ));

        // Create use cases
        let create_user_use_case = Arc::new(CreateUserUseCase::new(user_repository.clone()));
        let create_session_use_case = Arc::new(CreateSessionUseCase::new(
            user_repository.clone(),
            session_repository.clone(),
        ));
        let list_sessions_use_case =
            Arc::new(ListSessionsUseCase::new(session_repository.clone()));
        let get_history_use_case = Arc::new(GetHistoryUseCase::new(
            session_repository.clone(),
            message_repository.clone(),
        ));
        let delete_history_use_case = Arc::new(DeleteHistoryUseCase::new(
            session_repository.clone(),
            message_repository.clone(),
        ));
        let delete_session_use_case =
            Arc::new(DeleteSessionUseCase::new(session_repository.clone()));
        let chat_use_case = Arc::new(ChatUseCase::new(
            rag_service.clone(),
            session_repository.clone(),
            message_repository.clone(),
        ));

        // Create handlers
        let user_handler = Arc::new(UserHandler::new(create_user_use_case));
        let session_handler = Arc::new(SessionHandler::new(
            create_session_use_case,
            list_sessions_use_case,
            get_history_use_case,
            delete_history_use_case,
            delete_session_use_case,
        ));
        let chat_handler = Arc::new(ChatHandler::new(chat_use_case));

        Ok(Self {
            config,
            user_handler,
            session_handler,
            chat_handler,
            user_repository,
            session_repository,
            message_repository,
            embedding_provider,
            completion_provider,
            vector_index,
            retrieval_service,
            rag_service,
        })
    }
}

/// Wires the ingestion pipeline against `collection`, which is created on
/// first use.
pub fn build_ingestion(
    config: &AppConfig,
    collection: &str,
) -> Result<IngestDocumentsUseCase, Box<dyn std::error::Error>> {
    let db_pool = connect(config)?;

    let document_extractor: Arc<dyn DocumentExtractor> = Arc::new(PdfExtractor::new());
    let document_chunker: Arc<dyn DocumentChunker> = Arc::new(RTSplitter::default());
    let embedding_provider: Arc<dyn EmbeddingProvider> = Arc::new(OllamaEmbeddingProvider::new(
        ollama_client(config)?,
        &config.embedding_model,
    ));
    let vector_index: Arc<dyn VectorIndex> =
        Arc::new(PgVectorIndex::for_ingestion(db_pool, collection));

    let ingestion_service = Arc::new(IngestionService::new(
        document_extractor,
        document_chunker,
        embedding_provider,
        vector_index,
    ));

    Ok(IngestDocumentsUseCase::new(ingestion_service))
}
