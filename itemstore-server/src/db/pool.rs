//! Database connection pool management
//!
//! [`Connector`] turns the configured connection string into a live `PgPool`
//! according to a [`ConnectionPolicy`]:
//!
//! - `Shared`: the pool is built on first use and reused for the lifetime of
//!   the process. Suited to long-lived hosts.
//! - `PerRequest`: a single-connection pool is built for every acquisition and
//!   closed on release. Suited to hosts that forbid sharing I/O objects across
//!   invocations.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tokio::sync::OnceCell;

use super::schema::ensure_schema;
use super::DbError;

/// Default maximum connections for the shared pool.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Create a PostgreSQL connection pool.
///
/// # Errors
///
/// Returns an error if the connection fails.
pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    create_pool_with_options(database_url, DEFAULT_MAX_CONNECTIONS).await
}

/// Create a PostgreSQL connection pool with custom options.
///
/// # Arguments
///
/// * `database_url` - PostgreSQL connection string
/// * `max_connections` - Maximum number of connections in the pool
pub async fn create_pool_with_options(
    database_url: &str,
    max_connections: u32,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Pool lifetime policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionPolicy {
    /// One pool per process, cached after the first successful connect.
    #[default]
    Shared,
    /// A fresh pool per acquisition, closed when released.
    PerRequest,
}

impl ConnectionPolicy {
    /// Human readable description of the host this policy is meant for.
    pub fn host_description(&self) -> &'static str {
        match self {
            Self::Shared => "long-lived host",
            Self::PerRequest => "per-request host",
        }
    }
}

/// Resolves the connection string into pools.
///
/// Constructed once at startup and shared through application state.
pub struct Connector {
    database_url: Option<String>,
    policy: ConnectionPolicy,
    max_connections: u32,
    shared: OnceCell<PgPool>,
}

impl Connector {
    pub fn new(database_url: Option<String>, policy: ConnectionPolicy) -> Self {
        Self {
            database_url: database_url.filter(|url| !url.trim().is_empty()),
            policy,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            shared: OnceCell::new(),
        }
    }

    /// Override the shared pool size (ignored by `PerRequest`, which always uses one).
    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections.max(1);
        self
    }

    pub fn policy(&self) -> ConnectionPolicy {
        self.policy
    }

    pub fn is_configured(&self) -> bool {
        self.database_url.is_some()
    }

    /// Hand out a pool with the schema in place.
    ///
    /// # Errors
    ///
    /// [`DbError::MissingUrl`] when no connection string was configured,
    /// [`DbError::Sqlx`] when connecting or creating tables fails. A failed
    /// shared connect is not cached; the next call tries again.
    pub async fn acquire(&self) -> Result<PgPool, DbError> {
        let url = self.database_url.as_deref().ok_or(DbError::MissingUrl)?;

        match self.policy {
            ConnectionPolicy::Shared => {
                let pool = self
                    .shared
                    .get_or_try_init(|| async {
                        let pool = create_pool_with_options(url, self.max_connections).await?;
                        ensure_schema(&pool).await?;
                        tracing::info!(
                            max_connections = self.max_connections,
                            "shared database pool ready"
                        );
                        Ok::<_, DbError>(pool)
                    })
                    .await?;
                Ok(pool.clone())
            }
            ConnectionPolicy::PerRequest => {
                let pool = create_pool_with_options(url, 1).await?;
                if let Err(e) = ensure_schema(&pool).await {
                    pool.close().await;
                    return Err(e.into());
                }
                tracing::debug!("per-request database pool opened");
                Ok(pool)
            }
        }
    }

    /// Give a pool back. Closes it under `PerRequest`; no-op under `Shared`.
    pub async fn release(&self, pool: PgPool) {
        if self.policy == ConnectionPolicy::PerRequest {
            pool.close().await;
            tracing::debug!("per-request database pool closed");
        }
    }
}
