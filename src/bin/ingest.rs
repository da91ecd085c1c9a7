use clap::Parser;
use std::path::PathBuf;

use docrag::application::use_cases::ingest_documents::IngestDocumentsRequest;
use docrag::infrastructure::AppConfig;
use docrag::infrastructure::container::build_ingestion;

#[derive(Parser, Debug)]
#[command(name = "docrag-ingest")]
#[command(about = "Index every PDF in a folder into the vector collection")]
struct Args {
    /// Folder of PDFs (defaults to DATA_FOLDER)
    #[arg(long)]
    folder: Option<PathBuf>,

    /// Collection to rebuild (defaults to VECTOR_COLLECTION)
    #[arg(long)]
    collection: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env()?;
    let folder = args.folder.unwrap_or_else(|| config.data_folder.clone());
    let collection = args
        .collection
        .unwrap_or_else(|| config.vector_collection.clone());

    let use_case = build_ingestion(&config, &collection)?;
    let response = use_case.execute(IngestDocumentsRequest { folder }).await?;
    let report = response.report;

    tracing::info!(
        "Ingested {}/{} files into '{}': {} text chunks, {} table chunks, {} skipped ({} ms)",
        report.files_ingested,
        report.files_seen,
        collection,
        report.text_chunks,
        report.table_chunks,
        report.files_skipped,
        response.elapsed_ms
    );

    Ok(())
}
