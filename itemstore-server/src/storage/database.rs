//! Relational file store - rows in the `files` table

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use super::{FileStore, NewFile, StoreError, StoredFile};
use crate::db::{Connector, FileRepo, FileRow};

/// Stores payloads in a BYTEA column, using pools from the shared connector.
pub struct DatabaseFileStore {
    connector: Arc<Connector>,
}

impl DatabaseFileStore {
    pub fn new(connector: Arc<Connector>) -> Self {
        Self { connector }
    }
}

/// A NULL `data` column reads back as an empty payload.
fn stored_file(row: FileRow) -> StoredFile {
    StoredFile {
        name: row.name,
        content_type: row.content_type,
        data: row.data.map(Bytes::from).unwrap_or_default(),
        etag: None,
    }
}

#[async_trait]
impl FileStore for DatabaseFileStore {
    async fn put(&self, file: NewFile) -> Result<(), StoreError> {
        let pool = self.connector.acquire().await?;
        let row = FileRow {
            id: file.id,
            name: Some(file.name),
            content_type: Some(file.content_type),
            data: Some(file.data.to_vec()),
        };
        let result = FileRepo::new(&pool).insert(&row).await;
        self.connector.release(pool).await;
        Ok(result?)
    }

    async fn get(&self, id: &str) -> Result<Option<StoredFile>, StoreError> {
        let pool = self.connector.acquire().await?;
        let result = FileRepo::new(&pool).get(id).await;
        self.connector.release(pool).await;

        Ok(result?.map(stored_file))
    }

    fn kind(&self) -> &'static str {
        "database"
    }
}
