//! File repository - binary payloads in the `files` table

use sqlx::{FromRow, PgPool};

use crate::db::DbError;

/// File row without the `created_at` bookkeeping column. Every column but
/// the key is nullable.
#[derive(Debug, Clone, FromRow)]
pub struct FileRow {
    pub id: String,
    pub name: Option<String>,
    #[sqlx(rename = "type")]
    pub content_type: Option<String>,
    pub data: Option<Vec<u8>>,
}

/// File repository
pub struct FileRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> FileRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a file row. The primary key rejects duplicate ids.
    pub async fn insert(&self, row: &FileRow) -> Result<(), DbError> {
        sqlx::query("INSERT INTO files (id, name, type, data) VALUES ($1, $2, $3, $4)")
            .bind(&row.id)
            .bind(&row.name)
            .bind(&row.content_type)
            .bind(&row.data)
            .execute(self.pool)
            .await?;
        Ok(())
    }

    pub async fn get(&self, id: &str) -> Result<Option<FileRow>, DbError> {
        let row: Option<FileRow> =
            sqlx::query_as("SELECT id, name, type, data FROM files WHERE id = $1")
                .bind(id)
                .fetch_optional(self.pool)
                .await?;
        Ok(row)
    }
}
