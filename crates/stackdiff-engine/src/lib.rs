//! stackdiff engine - orchestration layer
//!
//! Coordinates the pure diff kernel, the source-control client and the
//! store: the comparison batch, the query and review surface, and rate-limit
//! suspension.

pub mod commands;
pub mod settings;

pub use settings::BatchSettings;
