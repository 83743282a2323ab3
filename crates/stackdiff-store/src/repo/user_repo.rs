//! SQLite repository for users

#![allow(clippy::result_large_err)]

use crate::errors::{duplicate_email, from_rusqlite, Result};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, ErrorCode};
use serde::{Deserialize, Serialize};

/// Registered user. Emails are unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

pub struct UserRepo;

impl UserRepo {
    /// Insert a user
    ///
    /// # Errors
    ///
    /// `InvalidInput` when the email is already registered.
    pub fn insert(conn: &Connection, user: &User) -> Result<()> {
        conn.execute(
            "INSERT INTO users (id, email, created_at) VALUES (?1, ?2, ?3)",
            rusqlite::params![user.id, user.email, user.created_at.timestamp_millis()],
        )
        .map_err(|e| {
            if e.sqlite_error_code() == Some(ErrorCode::ConstraintViolation) {
                duplicate_email(&user.email)
            } else {
                from_rusqlite(e)
            }
        })?;

        Ok(())
    }
}
