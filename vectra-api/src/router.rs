use axum::{
    http::{HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::{DefaultMakeSpan, TraceLayer},
};

use crate::{app_state::AppState, config::Settings, routes};

pub fn create(app_state: AppState, config: &Settings) -> Router<()> {
    let app = Router::new()
        .route(
            "/",
            get(|| async {
                "Welcome to the Vector Database API. See /vector-stores for configured backends."
            }),
        )
        .merge(routes::health::router())
        .nest("/vector-stores", routes::vector_stores::router())
        .nest("/collections", routes::collections::router())
        .nest("/search", routes::search::router());

    let cors = cors_layer(&config.application.cors_origins);

    app.with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    if origins.iter().any(|o| o == "*" || o == "all") {
        cors.allow_origin(Any)
    } else {
        let allowed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| origin.trim().parse().ok())
            .collect();
        cors.allow_origin(AllowOrigin::list(allowed))
    }
}
