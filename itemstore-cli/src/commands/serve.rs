//! HTTP server command

use std::net::{IpAddr, SocketAddr};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use itemstore_server::http::server::DEFAULT_MAX_UPLOAD_BYTES;
use itemstore_server::{run_server, ConnectionPolicy, FileStoreKind, ServerConfig};

/// Pool lifetime policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PolicyArg {
    /// One pool for the process lifetime
    Shared,
    /// Fresh pool per request, closed afterwards
    PerRequest,
}

impl From<PolicyArg> for ConnectionPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Shared => ConnectionPolicy::Shared,
            PolicyArg::PerRequest => ConnectionPolicy::PerRequest,
        }
    }
}

/// File backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FileStoreArg {
    /// Object store when --bucket is set, database otherwise
    Auto,
    Database,
    Object,
    /// Volatile, lost on restart
    Memory,
}

impl From<FileStoreArg> for FileStoreKind {
    fn from(arg: FileStoreArg) -> Self {
        match arg {
            FileStoreArg::Auto => FileStoreKind::Auto,
            FileStoreArg::Database => FileStoreKind::Database,
            FileStoreArg::Object => FileStoreKind::Object,
            FileStoreArg::Memory => FileStoreKind::Memory,
        }
    }
}

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, env = "ITEMSTORE_HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(long, short = 'p', env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Postgres connection string (item routes answer 500 without it)
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    /// Pool lifetime policy
    #[arg(long, env = "CONNECTION_POLICY", value_enum, default_value_t = PolicyArg::Shared)]
    pub connection_policy: PolicyArg,

    /// Shared pool size
    #[arg(long, env = "DATABASE_MAX_CONNECTIONS", default_value_t = 5)]
    pub max_connections: u32,

    /// File backend
    #[arg(long, env = "FILE_STORE", value_enum, default_value_t = FileStoreArg::Auto)]
    pub file_store: FileStoreArg,

    /// Object-storage bucket for uploads
    #[arg(long, env = "BUCKET")]
    pub bucket: Option<String>,

    /// Custom S3-compatible endpoint (R2, MinIO)
    #[arg(long, env = "S3_ENDPOINT")]
    pub s3_endpoint: Option<String>,

    /// Object-storage region override
    #[arg(long, env = "S3_REGION")]
    pub s3_region: Option<String>,

    /// Request body limit on upload routes, in bytes
    #[arg(long, env = "MAX_UPLOAD_BYTES", default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    pub max_upload_bytes: usize,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long, env = "CORS_PERMISSIVE")]
    pub cors_permissive: bool,
}

impl ServeArgs {
    pub fn into_config(self) -> ServerConfig {
        ServerConfig {
            bind_addr: SocketAddr::new(self.host, self.port),
            cors_permissive: self.cors_permissive,
            database_url: self.database_url,
            connection_policy: self.connection_policy.into(),
            max_connections: self.max_connections,
            file_store: self.file_store.into(),
            bucket: self.bucket.filter(|b| !b.is_empty()),
            s3_endpoint: self.s3_endpoint,
            s3_region: self.s3_region,
            max_upload_bytes: self.max_upload_bytes,
        }
    }
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let config = args.into_config();
    tracing::info!("Starting itemstore server on {}", config.bind_addr);

    // Run server (blocks until shutdown)
    run_server(config).await.context("Server error")?;

    Ok(())
}
