//! Route handlers organized by resource

pub mod files;
pub mod health;
pub mod items;
pub mod root;
