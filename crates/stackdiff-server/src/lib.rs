//! stackdiff HTTP surface
//!
//! JSON routes over the engine: compute a comparison run, read stored
//! diffs, toggle reviews, and browse repositories of the configured
//! organization.

pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use config::{ConfigError, CorsOrigins, ServerConfig};
pub use error::ApiError;
pub use router::app;
pub use state::AppState;
