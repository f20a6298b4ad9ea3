use axum::{extract::State, routing::get, Json, Router};
use tracing::instrument;

use crate::{
    domain::search::{BackendDescriptor, StatusReport},
    AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_vector_stores))
        .route("/status", get(vector_stores_status))
}

#[instrument(name = "GET /vector-stores", skip(app_state))]
async fn list_vector_stores(State(app_state): State<AppState>) -> Json<Vec<BackendDescriptor>> {
    Json(app_state.orchestrator.backends())
}

#[instrument(name = "GET /vector-stores/status", skip(app_state))]
async fn vector_stores_status(State(app_state): State<AppState>) -> Json<StatusReport> {
    Json(app_state.orchestrator.statuses().await)
}
