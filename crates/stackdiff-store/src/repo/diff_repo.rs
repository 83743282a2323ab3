//! SQLite repository for diff records

#![allow(clippy::result_large_err)]

use crate::errors::{from_rusqlite, from_serde_json, Result};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row};
use stackdiff_core::errors::{ExError, ExErrorKind};
use stackdiff_core::record::DiffRecord;

const SELECT_COLUMNS: &str = "SELECT id, stack_a, stack_b, file, left_not_right, right_not_left, \
     same_key_diff_value, reviewed, created_at, updated_at FROM diffs";

/// Exact-match filter over the `diffs` table. Unset fields match anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffFilter {
    pub stack_a: Option<String>,
    pub stack_b: Option<String>,
    pub file: Option<String>,
}

impl DiffFilter {
    /// Every record of one stack pair
    pub fn stacks(stack_a: impl Into<String>, stack_b: impl Into<String>) -> Self {
        Self {
            stack_a: Some(stack_a.into()),
            stack_b: Some(stack_b.into()),
            file: None,
        }
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }
}

/// SQLite repository for diff records
pub struct DiffRepo;

impl DiffRepo {
    /// Insert a fully built record
    pub fn insert(conn: &Connection, record: &DiffRecord) -> Result<()> {
        conn.execute(
            "INSERT INTO diffs (id, stack_a, stack_b, file, left_not_right, right_not_left,
                                same_key_diff_value, reviewed, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            rusqlite::params![
                record.id,
                record.stack_a,
                record.stack_b,
                record.file,
                encode_paths("left_not_right", &record.left_not_right)?,
                encode_paths("right_not_left", &record.right_not_left)?,
                encode_paths("same_key_diff_value", &record.same_key_diff_value)?,
                record.reviewed,
                record.created_at.timestamp_millis(),
                record.updated_at.timestamp_millis(),
            ],
        )
        .map_err(from_rusqlite)?;

        Ok(())
    }

    pub fn get(conn: &Connection, id: &str) -> Result<Option<DiffRecord>> {
        let raw = conn
            .query_row(&format!("{} WHERE id = ?1", SELECT_COLUMNS), [id], RawRow::read)
            .optional()
            .map_err(from_rusqlite)?;

        raw.map(RawRow::into_record).transpose()
    }

    /// Records matching `filter`, oldest run first, insertion order within a run
    pub fn find(conn: &Connection, filter: &DiffFilter) -> Result<Vec<DiffRecord>> {
        let mut clauses = Vec::new();
        let mut params: Vec<&str> = Vec::new();
        for (column, value) in [
            ("stack_a", &filter.stack_a),
            ("stack_b", &filter.stack_b),
            ("file", &filter.file),
        ] {
            if let Some(value) = value {
                params.push(value.as_str());
                clauses.push(format!("{} = ?{}", column, params.len()));
            }
        }

        let mut sql = SELECT_COLUMNS.to_string();
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY created_at, seq");

        let mut stmt = conn.prepare(&sql).map_err(from_rusqlite)?;
        let rows = stmt
            .query_map(rusqlite::params_from_iter(params), RawRow::read)
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;

        rows.into_iter().map(RawRow::into_record).collect()
    }

    /// Set the review flag, returning the number of matched records (0 or 1)
    pub fn set_reviewed(
        conn: &Connection,
        id: &str,
        reviewed: bool,
        now: DateTime<Utc>,
    ) -> Result<usize> {
        conn.execute(
            "UPDATE diffs SET reviewed = ?1, updated_at = ?2 WHERE id = ?3",
            rusqlite::params![reviewed, now.timestamp_millis(), id],
        )
        .map_err(from_rusqlite)
    }

    /// Flip the review flag in one statement. Returns the new flag, or
    /// `None` when no record has the id.
    pub fn toggle_reviewed(
        conn: &Connection,
        id: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<bool>> {
        conn.query_row(
            "UPDATE diffs SET reviewed = 1 - reviewed, updated_at = ?1 WHERE id = ?2 \
             RETURNING reviewed",
            rusqlite::params![now.timestamp_millis(), id],
            |row| row.get::<_, bool>(0),
        )
        .optional()
        .map_err(from_rusqlite)
    }
}

fn encode_paths(column: &str, paths: &[String]) -> Result<String> {
    serde_json::to_string(paths).map_err(|e| from_serde_json(column, e))
}

fn decode_paths(column: &str, text: &str) -> Result<Vec<String>> {
    serde_json::from_str(text).map_err(|e| from_serde_json(column, e))
}

fn from_millis(column: &str, millis: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis).ok_or_else(|| {
        ExError::new(ExErrorKind::Serialization)
            .with_op("decode_row")
            .with_message(format!("column {}: timestamp {} out of range", column, millis))
    })
}

/// Row as stored, before the JSON columns are decoded
struct RawRow {
    id: String,
    stack_a: String,
    stack_b: String,
    file: String,
    left_not_right: String,
    right_not_left: String,
    same_key_diff_value: String,
    reviewed: bool,
    created_at: i64,
    updated_at: i64,
}

impl RawRow {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            stack_a: row.get(1)?,
            stack_b: row.get(2)?,
            file: row.get(3)?,
            left_not_right: row.get(4)?,
            right_not_left: row.get(5)?,
            same_key_diff_value: row.get(6)?,
            reviewed: row.get(7)?,
            created_at: row.get(8)?,
            updated_at: row.get(9)?,
        })
    }

    fn into_record(self) -> Result<DiffRecord> {
        Ok(DiffRecord {
            left_not_right: decode_paths("left_not_right", &self.left_not_right)?,
            right_not_left: decode_paths("right_not_left", &self.right_not_left)?,
            same_key_diff_value: decode_paths("same_key_diff_value", &self.same_key_diff_value)?,
            created_at: from_millis("created_at", self.created_at)?,
            updated_at: from_millis("updated_at", self.updated_at)?,
            id: self.id,
            stack_a: self.stack_a,
            stack_b: self.stack_b,
            file: self.file,
            reviewed: self.reviewed,
        })
    }
}
