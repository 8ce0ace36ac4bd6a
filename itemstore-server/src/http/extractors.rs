//! Custom Axum extractors

use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use serde_json::{Map, Value as JsonValue};

use super::error::ApiError;

/// JSON request body of any shape. An empty body reads as `{}`; malformed
/// JSON and a bare `null` are rejected with 400.
#[derive(Debug)]
pub struct JsonBody(pub JsonValue);

impl JsonBody {
    fn parse(bytes: &[u8]) -> Result<Self, ApiError> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self(JsonValue::Object(Map::new())));
        }

        match serde_json::from_slice(bytes) {
            Ok(JsonValue::Null) | Err(_) => Err(ApiError::bad_request("Invalid JSON body")),
            Ok(value) => Ok(Self(value)),
        }
    }
}

impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::bad_request(e.body_text()))?;
        Self::parse(&bytes)
    }
}
