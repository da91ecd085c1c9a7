use docrag::infrastructure::{AppConfig, AppContainer};
use docrag::presentation::http::HttpServer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env()?;
    tracing::info!(
        "Starting docrag with {} (chat) and {} (embeddings) at {}",
        config.completion_model,
        config.embedding_model,
        config.ollama_base_url
    );

    let container = AppContainer::new(config).await?;

    let server = HttpServer::new(
        container.user_handler.clone(),
        container.session_handler.clone(),
        container.chat_handler.clone(),
        container.config.bind_address(),
        container.config.frontend_origin.clone(),
    );

    server.run().await
}
