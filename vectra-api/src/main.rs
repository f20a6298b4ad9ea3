use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;

mod app_state;
mod config;
mod domain;
mod repositories;
mod router;
mod routes;

pub use app_state::AppState;

use domain::search::{
    embedder::OpenAiEmbedder,
    store::{PgVectorStore, PineconeStore},
    Embedder, SearchOrchestrator, VectorStore,
};
use repositories::CollectionRepositoryImpl;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("vectra_api=info,tower_http=debug")),
        )
        .init();

    let settings = config::read_config().context("Failed to read configuration")?;

    let pool = PgPoolOptions::new()
        .acquire_timeout(Duration::from_secs(5))
        .connect_lazy_with(settings.database.with_db());

    let embedder: Arc<dyn Embedder> = Arc::new(OpenAiEmbedder::from_settings(&settings.embeddings));
    tracing::info!(
        model = %settings.embeddings.model,
        dimensions = settings.embeddings.dimensions,
        "embeddings client configured"
    );

    let mut stores: Vec<Arc<dyn VectorStore>> = Vec::new();
    if settings.backends.pgvector.enabled {
        stores.push(Arc::new(PgVectorStore::new(
            pool.clone(),
            settings.backends.pgvector.table_name.clone(),
            embedder.clone(),
        )));
        tracing::info!("pgvector backend enabled");
    }
    if settings.backends.pinecone.enabled && !settings.backends.pinecone.api_key.is_empty() {
        stores.push(Arc::new(PineconeStore::new(
            settings.backends.pinecone.api_base.clone(),
            settings.backends.pinecone.api_key.clone(),
            &settings.backends.pinecone.index,
            embedder.clone(),
        )));
        tracing::info!("pinecone backend enabled");
    }
    if stores.is_empty() {
        tracing::warn!("no vector store backends enabled, search will return no results");
    }

    let orchestrator = SearchOrchestrator::new(
        stores,
        Duration::from_secs(settings.search.backend_timeout_secs),
    );
    let collection_repo = CollectionRepositoryImpl::new(pool);
    let app_state = AppState::new(orchestrator, collection_repo);

    let app = router::create(app_state, &settings);

    let address = format!(
        "{}:{}",
        settings.application.host, settings.application.port
    );
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind to {}", address))?;
    tracing::info!("listening on {}", address);

    axum::serve(listener, app).await?;

    Ok(())
}
