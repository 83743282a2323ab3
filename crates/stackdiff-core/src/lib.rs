//! stackdiff core - pure domain kernel
//!
//! This crate holds everything that does not touch the network or the disk:
//! - `Tree`/`Value` model for parsed configuration files and the YAML adapter
//! - The structural diff engine that classifies every key path of two trees
//! - Diff record model plus the policies the batch orchestration applies
//!   (sentinel records, persistence predicate, latest-run selection)
//! - Error facility and logging facility shared by the other crates

pub mod diff;
pub mod errors;
pub mod logging_facility;
pub mod record;
pub mod tree;

#[doc(hidden)]
pub use stackdiff_core_types as core_types;

// Re-export commonly used types
pub use diff::{compare_yaml_strings, compute_structural_diff, StructuralDiff};
pub use errors::{ExError, ExErrorKind, Result, StackDiffError};
pub use record::{DiffRecord, NewDiff};
pub use tree::{parse_yaml_tree, Tree, Value};
