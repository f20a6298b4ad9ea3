use axum::{extract::State, routing::get, Json, Router};
use axum_extra::extract::Query;
use serde::Deserialize;
use tracing::instrument;

use crate::{
    domain::search::{DocumentMatch, SearchFilter},
    routes::ApiError,
    AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(search))
}

fn default_k() -> i64 {
    5
}

#[derive(Debug, Clone, Deserialize)]
struct SearchParams {
    query: String,
    #[serde(default = "default_k")]
    k: i64,
    /// Filter by vector store backend ID (pgvector-1, pinecone-1, etc.)
    #[serde(default)]
    backend_id: Vec<String>,
    /// Filter by collection ID (apollo-11, etc.)
    #[serde(default)]
    collection_id: Vec<String>,
    /// Filter by document tags (nasa, technical, etc.)
    #[serde(default)]
    tag: Vec<String>,
}

fn none_if_empty(values: Vec<String>) -> Option<Vec<String>> {
    if values.is_empty() {
        None
    } else {
        Some(values)
    }
}

#[instrument(
    name = "GET /search",
    skip(app_state, params),
    fields(query = %params.query, k = params.k)
)]
async fn search(
    State(app_state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<DocumentMatch>>, ApiError> {
    let filter = SearchFilter::new(
        none_if_empty(params.collection_id),
        none_if_empty(params.tag),
        none_if_empty(params.backend_id),
    );

    let results = app_state
        .orchestrator
        .search(&params.query, params.k, &filter)
        .await?;

    tracing::info!("search returned {} results", results.len());
    Ok(Json(results))
}
