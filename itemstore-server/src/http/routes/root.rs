//! Root endpoint - identifies the running host

use std::sync::Arc;

use axum::{extract::State, routing::get, Router};

use crate::http::server::AppState;

/// GET /
async fn root(State(state): State<Arc<AppState>>) -> String {
    format!(
        "API is running on {}!",
        state.connector.policy().host_description()
    )
}

/// Root routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(root))
}
