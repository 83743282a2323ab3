//! Structural diff engine.
//!
//! Compares two [`Tree`](crate::tree::Tree)s and classifies every key path
//! into one of four buckets.
//!
//! ## Entry point
//!
//! ```
//! use stackdiff_core::diff::{compare_yaml_strings, render_human_summary};
//!
//! let diff = compare_yaml_strings("a: 1\nb: 2\n", "a: 1\nb: 3\n")?;
//! assert_eq!(diff.same_key_diff_value, vec!["/b".to_string()]);
//! let summary = render_human_summary(&diff);
//! # assert!(summary.contains("/b"));
//! # Ok::<(), stackdiff_core::StackDiffError>(())
//! ```
//!
//! ## Guarantees
//!
//! - **Truncation**: a key present on one side only is reported once; its
//!   descendants never appear in any list.
//! - **Symmetry**: swapping the inputs swaps `left_not_right` and
//!   `right_not_left` and leaves the other two lists unchanged.
//! - **No coercion**: `"1"`, `1` and `1.0` are three different values.
//! - **Determinism**: keys are visited in sorted order within each mapping.

pub mod engine;
pub mod human_summary;
pub mod model;

pub use engine::{compare_yaml_strings, compute_structural_diff};
pub use human_summary::render_human_summary;
pub use model::StructuralDiff;
