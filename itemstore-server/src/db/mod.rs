//! Database layer - connector, schema and repositories
//!
//! # Design Principles
//!
//! - Pools are handed out by [`Connector`], never stored in globals
//! - Schema is ensured once per pool (`CREATE TABLE IF NOT EXISTS`)
//! - Rely on DB constraints (primary keys) - no check-then-insert

pub mod pool;
pub mod repos;
pub mod schema;

pub use pool::{
    create_pool, create_pool_with_options, ConnectionPolicy, Connector, DEFAULT_MAX_CONNECTIONS,
};
pub use repos::*;
pub use schema::ensure_schema;

/// Message returned to clients when no connection string is configured.
pub const MISSING_DATABASE_URL: &str = "Missing DATABASE_URL environment variable";

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    #[error("{}", MISSING_DATABASE_URL)]
    MissingUrl,
}
