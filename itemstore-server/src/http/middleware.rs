//! Request middleware

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use super::error::ApiError;
use super::server::AppState;

/// Resolve a database pool for the request and expose it as an `Extension<PgPool>`.
///
/// Fails with 500 before the handler runs when no connection string is configured.
/// The pool is released once the response has been produced.
pub async fn resolve_database(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let pool = state.connector.acquire().await?;
    req.extensions_mut().insert(pool.clone());

    let response = next.run(req).await;
    state.connector.release(pool).await;

    Ok(response)
}
