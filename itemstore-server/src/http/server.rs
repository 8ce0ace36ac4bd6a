//! Axum server setup
//!
//! Server skeleton with:
//! - Localhost-only CORS by default
//! - Tracing middleware
//! - Graceful shutdown on SIGTERM/Ctrl+C

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::HeaderValue;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::routes;
use crate::db::{ConnectionPolicy, Connector, DEFAULT_MAX_CONNECTIONS};
use crate::storage::{
    DatabaseFileStore, FileStore, MemoryFileStore, ObjectFileStore, ObjectStoreConfig,
};

/// Default request body limit on upload routes (25 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Which file backend to run with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileStoreKind {
    /// Object store when a bucket is configured, database otherwise.
    #[default]
    Auto,
    Database,
    Object,
    Memory,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (default: 0.0.0.0:3000)
    pub bind_addr: SocketAddr,

    /// Allow permissive CORS (default: false = localhost only)
    pub cors_permissive: bool,

    /// Relational connection string; item routes fail with 500 without it.
    pub database_url: Option<String>,

    pub connection_policy: ConnectionPolicy,

    /// Shared pool size
    pub max_connections: u32,

    pub file_store: FileStoreKind,

    /// Object-storage bucket; its presence makes `Auto` pick the object store.
    pub bucket: Option<String>,

    pub s3_endpoint: Option<String>,

    pub s3_region: Option<String>,

    /// Body limit on upload routes
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            cors_permissive: false,
            database_url: None,
            connection_policy: ConnectionPolicy::Shared,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            file_store: FileStoreKind::Auto,
            bucket: None,
            s3_endpoint: None,
            s3_region: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl ServerConfig {
    /// Resolve `Auto` against the configured bucket.
    pub fn effective_file_store(&self) -> FileStoreKind {
        match self.file_store {
            FileStoreKind::Auto if self.bucket.is_some() => FileStoreKind::Object,
            FileStoreKind::Auto => FileStoreKind::Database,
            other => other,
        }
    }
}

/// Shared application state
pub struct AppState {
    pub connector: Arc<Connector>,
    pub files: Arc<dyn FileStore>,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(connector: Arc<Connector>, files: Arc<dyn FileStore>) -> Self {
        Self {
            connector,
            files,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    pub fn with_max_upload_bytes(mut self, max_upload_bytes: usize) -> Self {
        self.max_upload_bytes = max_upload_bytes;
        self
    }

    /// Build connector and file store from configuration.
    ///
    /// # Errors
    ///
    /// [`ServerError::Config`] when the object store is requested without a bucket.
    pub async fn from_config(config: &ServerConfig) -> Result<Self, ServerError> {
        let connector = Arc::new(
            Connector::new(config.database_url.clone(), config.connection_policy)
                .with_max_connections(config.max_connections),
        );

        let files: Arc<dyn FileStore> = match config.effective_file_store() {
            FileStoreKind::Object => {
                let bucket = config.bucket.clone().ok_or_else(|| {
                    ServerError::Config("object file store requires a bucket".into())
                })?;
                Arc::new(
                    ObjectFileStore::connect(ObjectStoreConfig {
                        bucket,
                        endpoint: config.s3_endpoint.clone(),
                        region: config.s3_region.clone(),
                    })
                    .await,
                )
            }
            FileStoreKind::Memory => {
                tracing::warn!("Using in-memory file store - uploads are lost on restart");
                Arc::new(MemoryFileStore::new())
            }
            FileStoreKind::Database | FileStoreKind::Auto => {
                Arc::new(DatabaseFileStore::new(connector.clone()))
            }
        };

        if !connector.is_configured() {
            tracing::warn!("DATABASE_URL not set - item routes will answer 500");
        }

        Ok(Self::new(connector, files).with_max_upload_bytes(config.max_upload_bytes))
    }
}

/// Build the application router with all routes
pub fn build_router(state: Arc<AppState>, cors_permissive: bool) -> Router {
    let cors = if cors_permissive {
        tracing::warn!("CORS: Permissive mode enabled - all origins allowed");
        CorsLayer::permissive()
    } else {
        // Localhost only
        CorsLayer::new()
            .allow_origin([
                HeaderValue::from_static("http://localhost:3000"),
                HeaderValue::from_static("http://localhost:4000"),
                HeaderValue::from_static("http://127.0.0.1:3000"),
                HeaderValue::from_static("http://127.0.0.1:4000"),
            ])
            .allow_methods(Any)
            .allow_headers(Any)
    };

    Router::new()
        .merge(routes::root::router())
        .merge(routes::health::router())
        .merge(routes::items::router(state.clone()))
        .merge(routes::files::router(state.max_upload_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the HTTP server.
///
/// # Example
///
/// ```ignore
/// let config = ServerConfig {
///     database_url: std::env::var("DATABASE_URL").ok(),
///     ..Default::default()
/// };
/// run_server(config).await?;
/// ```
pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let state = AppState::from_config(&config).await?;
    tracing::info!(
        file_store = state.files.kind(),
        policy = ?config.connection_policy,
        "storage configured"
    );

    let app = build_router(Arc::new(state), config.cors_permissive);

    // Bind listener
    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    // Run with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr.port(), 3000);
        assert!(!config.cors_permissive);
        assert_eq!(config.connection_policy, ConnectionPolicy::Shared);
    }

    #[test]
    fn auto_picks_object_store_when_bucket_present() {
        let mut config = ServerConfig::default();
        assert_eq!(config.effective_file_store(), FileStoreKind::Database);

        config.bucket = Some("uploads".into());
        assert_eq!(config.effective_file_store(), FileStoreKind::Object);

        config.file_store = FileStoreKind::Memory;
        assert_eq!(config.effective_file_store(), FileStoreKind::Memory);
    }

    #[tokio::test]
    async fn object_store_without_bucket_is_config_error() {
        let config = ServerConfig {
            file_store: FileStoreKind::Object,
            ..Default::default()
        };
        let result = AppState::from_config(&config).await;
        assert!(matches!(result, Err(ServerError::Config(_))));
    }

    #[tokio::test]
    async fn database_store_selected_without_bucket() {
        let state = AppState::from_config(&ServerConfig::default()).await.unwrap();
        assert_eq!(state.files.kind(), "database");
        assert!(!state.connector.is_configured());
    }
}
