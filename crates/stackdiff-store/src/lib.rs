//! stackdiff store - document store on SQLite
//!
//! Provides:
//! - SQLite connection management and embedded, checksummed migrations
//! - `diffs` collection with JSON list columns
//! - `users` collection with a unique email index
//! - [`SqliteDiffStore`], the thread-safe handle the engine and server share

pub mod db;
pub mod errors;
pub mod migrations;
pub mod repo;
pub mod store;

pub use errors::Result;
pub use repo::{DiffFilter, User};
pub use store::SqliteDiffStore;
