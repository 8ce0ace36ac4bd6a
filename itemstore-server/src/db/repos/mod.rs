//! Repository implementations for database access
//!
//! Each repository borrows a pool handed out by the connector and
//! relies on primary keys for uniqueness (no check-then-insert).

pub mod files;
pub mod items;

pub use files::{FileRepo, FileRow};
pub use items::{Item, ItemPatch, ItemRepo, NewItem, DEFAULT_ITEM_NAME};
