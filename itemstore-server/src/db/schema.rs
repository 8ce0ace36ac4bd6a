//! Schema initializer
//!
//! Idempotent: both statements are `CREATE TABLE IF NOT EXISTS`, so calling
//! this on every fresh pool is safe. Existing tables with different columns
//! are left untouched.

use sqlx::PgPool;

const CREATE_ITEMS: &str = r#"
    CREATE TABLE IF NOT EXISTS items (
        id TEXT PRIMARY KEY,
        name TEXT,
        value TEXT
    )
"#;

const CREATE_FILES: &str = r#"
    CREATE TABLE IF NOT EXISTS files (
        id TEXT PRIMARY KEY,
        name TEXT,
        type TEXT,
        data BYTEA,
        created_at TIMESTAMP DEFAULT NOW()
    )
"#;

/// Ensure the `items` and `files` tables exist.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(CREATE_ITEMS).execute(pool).await?;
    sqlx::query(CREATE_FILES).execute(pool).await?;
    tracing::debug!("schema ensured");
    Ok(())
}
