//! REST API routes configuration

use crate::api::handlers::{self, ApiState};
use axum::{
    body::Body,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

/// JSON 404 for unknown routes
async fn fallback_handler(uri: axum::http::Uri) -> impl IntoResponse {
    let body = serde_json::json!({ "error": format!("No route for {}", uri.path()) });

    Response::builder()
        .status(StatusCode::NOT_FOUND)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap_or_else(|_| StatusCode::NOT_FOUND.into_response())
}

/// Create the API router with all routes
pub fn create_router(state: ApiState) -> Router {
    // Configure CORS for browser access
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Chain
        .route("/chain", get(handlers::get_chain))
        .route("/chain/validate", get(handlers::validate_local_chain))
        // Mining
        .route("/mine", post(handlers::mine_block))
        // Transactions
        .route("/transactions/create", post(handlers::create_transaction))
        .route("/transactions/pending", get(handlers::get_pending))
        // Peers and consensus
        .route("/nodes", get(handlers::list_nodes))
        .route("/nodes/register", post(handlers::register_nodes))
        .route("/nodes/consensus", get(handlers::resolve_conflicts))
        .fallback(fallback_handler)
        // Add state and middleware
        .with_state(state)
        .layer(cors)
}
