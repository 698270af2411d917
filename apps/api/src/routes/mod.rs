pub mod health;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::info;

use crate::interview::handlers;
use crate::state::AppState;

/// POST /api/v1/cache/clear
/// Manually empties the profiler cache.
async fn clear_cache_handler(State(state): State<AppState>) -> Json<Value> {
    state.cache.clear();
    info!("profiler cache cleared");
    Json(json!({ "status": "cache cleared" }))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Session API
        .route("/api/v1/sessions", post(handlers::handle_start_session))
        .route(
            "/api/v1/sessions/:id",
            get(handlers::handle_get_session).delete(handlers::handle_delete_session),
        )
        .route(
            "/api/v1/sessions/:id/question",
            get(handlers::handle_get_question),
        )
        .route(
            "/api/v1/sessions/:id/answers",
            post(handlers::handle_submit_answer),
        )
        // Maintenance
        .route("/api/v1/cache/clear", post(clear_cache_handler))
        .with_state(state)
}
