//! itemstore-server: REST CRUD for key-value items and binary files
//!
//! Items live in Postgres; files go to whichever [`storage::FileStore`]
//! was selected at startup (database, object storage, or memory).

pub mod db;
pub mod http;
pub mod storage;

pub use db::{ConnectionPolicy, Connector, DbError};
pub use http::{build_router, run_server, ApiError, AppState, FileStoreKind, ServerConfig, ServerError};
pub use storage::{FileStore, StoreError};
