use axum::{extract::State, routing::get, Json, Router};
use tracing::instrument;

use crate::{
    domain::search::CollectionDescriptor,
    repositories::CollectionRepository,
    AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_collections))
}

#[instrument(name = "GET /collections", skip(app_state))]
async fn list_collections(State(app_state): State<AppState>) -> Json<Vec<CollectionDescriptor>> {
    // A broken database degrades to an empty list; the status endpoint is
    // where connectivity problems are reported.
    let collections = match app_state.collection_repo.get_collections().await {
        Ok(collections) => collections,
        Err(err) => {
            tracing::error!("Error retrieving collections: {}", err);
            vec![]
        }
    };

    tracing::info!("retrieved {} collections from database", collections.len());
    Json(collections)
}
