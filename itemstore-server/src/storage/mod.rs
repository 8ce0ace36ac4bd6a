//! File storage backends
//!
//! A single [`FileStore`] is chosen at startup and shared through
//! application state:
//! - [`DatabaseFileStore`]: `files` table (BYTEA column)
//! - [`ObjectFileStore`]: S3-compatible bucket, metadata on the object
//! - [`MemoryFileStore`]: volatile map, lost on restart

pub mod database;
pub mod memory;
pub mod object;

pub use database::DatabaseFileStore;
pub use memory::MemoryFileStore;
pub use object::{ObjectFileStore, ObjectStoreConfig};

use async_trait::async_trait;
use bytes::Bytes;

use crate::db::DbError;

/// Content type used when the upload did not declare one.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Filename used in `Content-Disposition` when none was stored.
pub const DEFAULT_FILENAME: &str = "file";

/// Storage error type
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Database(#[from] DbError),

    #[error("object store error: {0}")]
    ObjectStore(String),
}

/// An uploaded payload on its way into a store.
#[derive(Debug, Clone)]
pub struct NewFile {
    pub id: String,
    pub name: String,
    pub content_type: String,
    pub data: Bytes,
}

/// A payload read back from a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub name: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
    /// Entity tag, when the backend provides one.
    pub etag: Option<String>,
}

impl StoredFile {
    pub fn content_type(&self) -> &str {
        self.content_type
            .as_deref()
            .filter(|ct| !ct.is_empty())
            .unwrap_or(DEFAULT_CONTENT_TYPE)
    }

    /// `inline; filename="..."` with quotes escaped and control characters dropped.
    pub fn content_disposition(&self) -> String {
        let name = self
            .name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(DEFAULT_FILENAME);

        let mut escaped = String::with_capacity(name.len());
        for c in name.chars().filter(|c| !c.is_control()) {
            if c == '"' || c == '\\' {
                escaped.push('\\');
            }
            escaped.push(c);
        }
        format!("inline; filename=\"{}\"", escaped)
    }
}

/// File storage backend
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Persist a payload under `file.id`.
    async fn put(&self, file: NewFile) -> Result<(), StoreError>;

    /// Fetch a payload; `None` when the id is unknown.
    async fn get(&self, id: &str) -> Result<Option<StoredFile>, StoreError>;

    /// Backend name for logs and health output.
    fn kind(&self) -> &'static str;
}
