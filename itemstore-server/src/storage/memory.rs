//! Volatile in-process file store

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{FileStore, NewFile, StoreError, StoredFile};

/// Keeps uploads in memory; everything is lost when the process exits.
#[derive(Default)]
pub struct MemoryFileStore {
    files: RwLock<HashMap<String, StoredFile>>,
}

impl MemoryFileStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FileStore for MemoryFileStore {
    async fn put(&self, file: NewFile) -> Result<(), StoreError> {
        let stored = StoredFile {
            name: Some(file.name),
            content_type: Some(file.content_type),
            data: file.data,
            etag: None,
        };
        self.files.write().await.insert(file.id, stored);
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<StoredFile>, StoreError> {
        Ok(self.files.read().await.get(id).cloned())
    }

    fn kind(&self) -> &'static str {
        "memory"
    }
}
