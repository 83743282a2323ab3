//! Route handlers.

pub mod diffs;
pub mod health;
pub mod repos;

use crate::error::ApiError;

pub type ApiResult<T> = Result<T, ApiError>;
