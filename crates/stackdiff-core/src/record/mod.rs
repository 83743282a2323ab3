//! Persisted diff records and the rules the batch applies to them.

pub mod model;
pub mod policy;

pub use model::{DiffRecord, NewDiff, SENTINEL_PATH};
pub use policy::{latest_for_file, latest_run, should_persist};
