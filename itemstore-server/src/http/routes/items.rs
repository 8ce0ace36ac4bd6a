//! Item endpoints
//!
//! All routes run behind [`resolve_database`], which hands each handler a
//! pool via `Extension<PgPool>`.

use std::sync::Arc;

use axum::{
    extract::Path,
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::get,
    Extension, Json, Router,
};
use serde::Serialize;
use sqlx::PgPool;

use crate::db::repos::{Item, ItemPatch, ItemRepo, NewItem};
use crate::http::error::ApiError;
use crate::http::extractors::JsonBody;
use crate::http::middleware::resolve_database;
use crate::http::server::AppState;

/// Delete acknowledgement
#[derive(Serialize)]
pub struct DeleteResponse {
    pub ok: bool,
}

/// GET /items - list every item
async fn list_items(Extension(pool): Extension<PgPool>) -> Result<Json<Vec<Item>>, ApiError> {
    let items = ItemRepo::new(&pool).list().await?;
    Ok(Json(items))
}

/// GET /items/{id} - get a single item
async fn get_item(
    Extension(pool): Extension<PgPool>,
    Path(id): Path<String>,
) -> Result<Json<Item>, ApiError> {
    let item = ItemRepo::new(&pool).get(&id).await?;
    Ok(Json(item))
}

/// POST /items - create an item
async fn create_item(
    Extension(pool): Extension<PgPool>,
    JsonBody(body): JsonBody,
) -> Result<(StatusCode, Json<Item>), ApiError> {
    let item = ItemRepo::new(&pool).create(NewItem::from_body(&body)).await?;
    tracing::info!(item_id = %item.id, "Item created");

    Ok((StatusCode::CREATED, Json(item)))
}

/// PUT /items/{id} - partial update
async fn update_item(
    Extension(pool): Extension<PgPool>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody,
) -> Result<Json<Item>, ApiError> {
    let patch = ItemPatch::from_body(&body);
    if patch.is_empty() {
        tracing::debug!(item_id = %id, "update without name or value");
    }

    let item = ItemRepo::new(&pool).update(&id, patch).await?;
    Ok(Json(item))
}

/// DELETE /items/{id} - delete an item (succeeds for unknown ids too)
async fn delete_item(
    Extension(pool): Extension<PgPool>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    ItemRepo::new(&pool).delete(&id).await?;
    Ok(Json(DeleteResponse { ok: true }))
}

/// Item routes
pub fn router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/items", get(list_items).post(create_item))
        .route(
            "/items/{id}",
            get(get_item).put(update_item).delete(delete_item),
        )
        .route_layer(from_fn_with_state(state, resolve_database))
}
