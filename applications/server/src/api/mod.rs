/// API route modules
pub mod health;
pub mod rpc;

use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

/// Router with every HTTP route under `/api`
pub fn router(app_state: AppState) -> Router {
    let routes = Router::new()
        .route("/health", get(health::health))
        .route("/rpc", post(rpc::rpc));

    Router::new()
        .nest("/api", routes)
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
