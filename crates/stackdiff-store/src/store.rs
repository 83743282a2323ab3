//! Thread-safe store handle
//!
//! One `rusqlite::Connection` behind a `Mutex`. Every public method locks,
//! runs one repository call and releases the lock, so the handle can be
//! shared as `Arc<SqliteDiffStore>` between request handlers.

#![allow(clippy::result_large_err)]

use crate::db;
use crate::errors::{lock_poisoned, Result};
use crate::migrations::apply_migrations;
use crate::repo::{DiffFilter, DiffRepo, User, UserRepo};
use chrono::{DateTime, Utc};
use rusqlite::Connection;
use stackdiff_core::record::{DiffRecord, NewDiff};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

pub struct SqliteDiffStore {
    conn: Mutex<Connection>,
}

impl SqliteDiffStore {
    /// Open (or create) a file database and bring its schema up to date
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = db::open(path)?;
        db::configure(&conn, true)?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = db::open_in_memory()?;
        db::configure(&conn, false)?;
        Self::from_connection(conn)
    }

    /// Open from a `DATABASE_URL` value: `:memory:` or a file path
    /// (an optional `sqlite://` prefix is accepted).
    pub fn open_url(url: &str) -> Result<Self> {
        let path = url.strip_prefix("sqlite://").unwrap_or(url);
        if path == ":memory:" {
            Self::open_in_memory()
        } else {
            Self::open(path)
        }
    }

    fn from_connection(mut conn: Connection) -> Result<Self> {
        apply_migrations(&mut conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self, op: &str) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| lock_poisoned(op))
    }

    /// Store a new record with a fresh UUIDv7 id and `reviewed = false`
    ///
    /// `created_at` is truncated to millisecond precision, the precision the
    /// table keeps, so the returned record equals what a later read returns.
    pub fn insert_diff(&self, new: &NewDiff, created_at: DateTime<Utc>) -> Result<DiffRecord> {
        let created_at = truncate_to_millis(created_at);
        let record = new
            .clone()
            .into_record(uuid::Uuid::now_v7().to_string(), created_at);

        let conn = self.lock("insert_diff")?;
        DiffRepo::insert(&conn, &record)?;
        tracing::debug!(diff_id = %record.id, file = %record.file, "inserted diff record");

        Ok(record)
    }

    pub fn get_diff(&self, id: &str) -> Result<Option<DiffRecord>> {
        let conn = self.lock("get_diff")?;
        DiffRepo::get(&conn, id)
    }

    pub fn find_diffs(&self, filter: &DiffFilter) -> Result<Vec<DiffRecord>> {
        let conn = self.lock("find_diffs")?;
        DiffRepo::find(&conn, filter)
    }

    /// Returns the number of matched records
    pub fn set_reviewed(&self, id: &str, reviewed: bool, now: DateTime<Utc>) -> Result<usize> {
        let conn = self.lock("set_reviewed")?;
        DiffRepo::set_reviewed(&conn, id, reviewed, truncate_to_millis(now))
    }

    /// Atomic flip of the review flag; `None` when the id is unknown
    pub fn toggle_reviewed(&self, id: &str, now: DateTime<Utc>) -> Result<Option<bool>> {
        let conn = self.lock("toggle_reviewed")?;
        DiffRepo::toggle_reviewed(&conn, id, truncate_to_millis(now))
    }

    pub fn insert_user(&self, email: &str) -> Result<User> {
        let user = User {
            id: uuid::Uuid::now_v7().to_string(),
            email: email.to_string(),
            created_at: truncate_to_millis(Utc::now()),
        };
        let conn = self.lock("insert_user")?;
        UserRepo::insert(&conn, &user)?;
        Ok(user)
    }
}

fn truncate_to_millis(at: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(at.timestamp_millis()).unwrap_or(at)
}
