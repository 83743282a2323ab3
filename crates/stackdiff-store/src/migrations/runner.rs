#![allow(clippy::result_large_err)]

use crate::errors::{checksum_mismatch, from_rusqlite, migration_error, Result};
use crate::migrations::checksums::compute_checksum;
use crate::migrations::embedded::{Migration, MIGRATIONS};
use rusqlite::{Connection, OptionalExtension};

const SCHEMA_VERSION_DDL: &str = "CREATE TABLE IF NOT EXISTS schema_version (
    id INTEGER PRIMARY KEY,
    migration_id TEXT NOT NULL UNIQUE,
    applied_at INTEGER NOT NULL,
    checksum TEXT NOT NULL
)";

/// Bring the schema up to date
///
/// Returns the ids applied by this call; empty when the schema was current.
///
/// # Errors
///
/// `Persistence` when a migration fails, or when the SQL of an applied
/// migration no longer matches its recorded checksum.
pub fn apply_migrations(conn: &mut Connection) -> Result<Vec<&'static str>> {
    conn.execute_batch(SCHEMA_VERSION_DDL)
        .map_err(from_rusqlite)?;

    let mut applied = Vec::new();
    for migration in MIGRATIONS {
        let checksum = compute_checksum(migration.sql);
        match recorded_checksum(conn, migration.id)? {
            Some(recorded) if recorded == checksum => {}
            Some(recorded) => return Err(checksum_mismatch(migration.id, &recorded, &checksum)),
            None => {
                run_migration(conn, migration, &checksum)?;
                applied.push(migration.id);
            }
        }
    }

    if !applied.is_empty() {
        tracing::info!(applied = ?applied, "schema migrated");
    }
    Ok(applied)
}

fn recorded_checksum(conn: &Connection, migration_id: &str) -> Result<Option<String>> {
    conn.query_row(
        "SELECT checksum FROM schema_version WHERE migration_id = ?1",
        [migration_id],
        |row| row.get(0),
    )
    .optional()
    .map_err(from_rusqlite)
}

fn run_migration(conn: &mut Connection, migration: &Migration, checksum: &str) -> Result<()> {
    let tx = conn.transaction().map_err(from_rusqlite)?;

    tx.execute_batch(migration.sql)
        .map_err(|e| migration_error(migration.id, &e.to_string()))?;
    tx.execute(
        "INSERT INTO schema_version (migration_id, applied_at, checksum) VALUES (?1, ?2, ?3)",
        rusqlite::params![migration.id, chrono::Utc::now().timestamp(), checksum],
    )
    .map_err(from_rusqlite)?;

    tx.commit().map_err(from_rusqlite)
}
