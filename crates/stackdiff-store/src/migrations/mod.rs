//! Schema migrations
//!
//! Each embedded migration runs once, in its own transaction, and is
//! recorded in `schema_version` with the SHA-256 of its SQL.

mod checksums;
mod embedded;
mod runner;

pub use embedded::{Migration, MIGRATIONS};
pub use runner::apply_migrations;
