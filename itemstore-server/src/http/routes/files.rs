//! File endpoints - upload and download through the configured file store

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{
        multipart::{MultipartError, MultipartRejection},
        DefaultBodyLimit, Multipart, Path, State,
    },
    http::{header, HeaderValue, StatusCode},
    response::Response,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use uuid::Uuid;

use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::storage::{NewFile, DEFAULT_CONTENT_TYPE};

/// Multipart field carrying the payload.
const FILE_FIELD: &str = "file";

/// Upload response
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub file_id: String,
}

/// Body limit hits become 413; any other multipart failure means no usable file.
fn multipart_error(e: MultipartError, stage: &str) -> ApiError {
    tracing::debug!("multipart {} failed: {}", stage, e);
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge
    } else {
        ApiError::bad_request("File missing")
    }
}

/// Read the first `file` field that carries a filename.
async fn read_file_field(multipart: &mut Multipart, id: &str) -> Result<NewFile, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, "parse"))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        // A plain form value, not a file part
        let Some(name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let content_type = field
            .content_type()
            .filter(|ct| !ct.is_empty())
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| multipart_error(e, "read"))?;

        return Ok(NewFile {
            id: id.to_string(),
            name,
            content_type,
            data,
        });
    }

    Err(ApiError::bad_request("File missing"))
}

/// POST /files/upload (also /upload) - store a multipart `file` field
async fn upload_file(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<UploadResponse>), ApiError> {
    let mut multipart = multipart.map_err(|e| {
        tracing::debug!("not a multipart request: {}", e);
        ApiError::bad_request("File missing")
    })?;
    let file_id = Uuid::new_v4().to_string();
    let file = read_file_field(&mut multipart, &file_id).await?;

    tracing::info!(
        file_id = %file_id,
        filename = %file.name,
        content_type = %file.content_type,
        bytes = file.data.len(),
        backend = state.files.kind(),
        "Storing upload"
    );
    state.files.put(file).await?;

    Ok((StatusCode::CREATED, Json(UploadResponse { file_id })))
}

/// GET /files/{id} - raw bytes with content headers
async fn get_file(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let file = state
        .files
        .get(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound {
            resource: "file",
            id: id.clone(),
        })?;

    let header_value = |value: &str| {
        HeaderValue::from_bytes(value.as_bytes()).map_err(|e| ApiError::Internal {
            message: format!("invalid header value for file '{}': {}", id, e),
        })
    };

    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, header_value(file.content_type())?)
        .header(
            header::CONTENT_DISPOSITION,
            header_value(&file.content_disposition())?,
        );
    if let Some(etag) = file.etag.as_deref() {
        builder = builder.header(header::ETAG, header_value(etag)?);
    }

    builder
        .body(Body::from(file.data))
        .map_err(|e| ApiError::Internal {
            message: e.to_string(),
        })
}

/// File routes
pub fn router(max_upload_bytes: usize) -> Router<Arc<AppState>> {
    let upload = Router::new()
        .route("/files/upload", post(upload_file))
        .route("/upload", post(upload_file))
        .layer(DefaultBodyLimit::max(max_upload_bytes));

    Router::new()
        .route("/files/{id}", get(get_file))
        .merge(upload)
}
