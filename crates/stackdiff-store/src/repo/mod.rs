//! Row-level access to the `diffs` and `users` tables

pub mod diff_repo;
pub mod user_repo;

pub use diff_repo::{DiffFilter, DiffRepo};
pub use user_repo::{User, UserRepo};
