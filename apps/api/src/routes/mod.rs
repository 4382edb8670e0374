pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::exploration::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/explore", get(handlers::handle_get_view))
        .route("/api/v1/explore/search", post(handlers::handle_search))
        .route("/api/v1/explore/click", post(handlers::handle_node_click))
        .route(
            "/api/v1/explore/history",
            post(handlers::handle_history_click),
        )
        .route("/api/v1/explore/clear", post(handlers::handle_clear))
        .with_state(state)
}
