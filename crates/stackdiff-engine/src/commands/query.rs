//! Query and review surface over stored diff records.
//!
//! Every function is one logged operation: a `start` event, then exactly one
//! of `end` / `end_error`.

#![allow(clippy::result_large_err)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stackdiff_core::errors::{ExError, ExErrorKind, StackDiffError};
use stackdiff_core::record::{latest_for_file, latest_run, DiffRecord, NewDiff};
use stackdiff_core::{log_op_end, log_op_error, log_op_start};
use stackdiff_store::{DiffFilter, SqliteDiffStore};
use std::time::Instant;

/// Most recent record for one file, with its timestamp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestDiff {
    pub diff: DiffRecord,
    pub latest_diff: DateTime<Utc>,
}

fn instrumented<T>(
    op: &'static str,
    f: impl FnOnce() -> Result<T, ExError>,
) -> Result<T, ExError> {
    let start = Instant::now();
    log_op_start!(op);

    let result = f().map_err(|e| match e.op() {
        Some(_) => e,
        None => e.with_op(op),
    });

    let duration_ms = start.elapsed().as_millis() as u64;
    match &result {
        Ok(_) => {
            log_op_end!(op, duration_ms = duration_ms);
        }
        Err(e) => {
            log_op_error!(op, e.clone(), duration_ms = duration_ms);
        }
    }
    result
}

fn validate_id(id: &str) -> Result<(), ExError> {
    uuid::Uuid::parse_str(id).map(|_| ()).map_err(|_| {
        StackDiffError::InvalidDiffId {
            diff_id: id.to_string(),
        }
        .into()
    })
}

fn no_comparison(stack_a: &str, stack_b: &str) -> ExError {
    StackDiffError::NoComparisonFound {
        stack_a: stack_a.to_string(),
        stack_b: stack_b.to_string(),
    }
    .into()
}

/// # Errors
///
/// `InvalidInput` for a malformed id, `NotFound` when no record has it.
pub fn get_diff(store: &SqliteDiffStore, id: &str) -> Result<DiffRecord, ExError> {
    instrumented("get_diff", || {
        validate_id(id)?;
        store.get_diff(id)?.ok_or_else(|| {
            StackDiffError::DiffNotFound {
                diff_id: id.to_string(),
            }
            .into()
        })
    })
}

/// Every stored record
///
/// # Errors
///
/// `NotFound` when the store holds no record at all.
pub fn list_all_diffs(store: &SqliteDiffStore) -> Result<Vec<DiffRecord>, ExError> {
    instrumented("list_all_diffs", || {
        let records = store.find_diffs(&DiffFilter::default())?;
        if records.is_empty() {
            return Err(ExError::new(ExErrorKind::NotFound).with_message("No diffs stored"));
        }
        Ok(records)
    })
}

/// Every record of one stack pair, across all runs
///
/// # Errors
///
/// Store errors only; an unknown pair yields an empty list.
pub fn list_all_diffs_for_stacks(
    store: &SqliteDiffStore,
    stack_a: &str,
    stack_b: &str,
) -> Result<Vec<DiffRecord>, ExError> {
    instrumented("list_all_diffs_for_stacks", || {
        store.find_diffs(&DiffFilter::stacks(stack_a, stack_b))
    })
}

/// Records of the most recent run for a stack pair
///
/// # Errors
///
/// `NotFound` when the pair was never compared.
pub fn latest_run_for_stacks(
    store: &SqliteDiffStore,
    stack_a: &str,
    stack_b: &str,
) -> Result<Vec<DiffRecord>, ExError> {
    instrumented("latest_run_for_stacks", || {
        let records = latest_run(store.find_diffs(&DiffFilter::stacks(stack_a, stack_b))?);
        if records.is_empty() {
            return Err(no_comparison(stack_a, stack_b));
        }
        Ok(records)
    })
}

/// # Errors
///
/// `NotFound` when no record exists for the file.
pub fn latest_diff_for_file(
    store: &SqliteDiffStore,
    stack_a: &str,
    stack_b: &str,
    file: &str,
) -> Result<LatestDiff, ExError> {
    instrumented("latest_diff_for_file", || {
        let filter = DiffFilter::stacks(stack_a, stack_b).with_file(file);
        let diff = latest_for_file(store.find_diffs(&filter)?)
            .ok_or_else(|| no_comparison(stack_a, stack_b).with_entity_id(file))?;
        Ok(LatestDiff {
            latest_diff: diff.created_at,
            diff,
        })
    })
}

/// Flip the review flag. Returns the number of matched records.
///
/// # Errors
///
/// `InvalidInput` for a malformed id, `NotFound` when no record has it.
pub fn toggle_review(store: &SqliteDiffStore, id: &str) -> Result<usize, ExError> {
    instrumented("toggle_review", || {
        validate_id(id)?;
        let reviewed = store.toggle_reviewed(id, Utc::now())?.ok_or_else(|| {
            ExError::from(StackDiffError::DiffNotFound {
                diff_id: id.to_string(),
            })
        })?;
        tracing::info!(diff_id = id, reviewed, "toggled review");
        Ok(1)
    })
}

/// Store a record directly, stamped with the current time
///
/// # Errors
///
/// `InvalidInput` when a stack or the file is empty.
pub fn insert_diff(store: &SqliteDiffStore, new: &NewDiff) -> Result<DiffRecord, ExError> {
    instrumented("insert_diff", || {
        for (field, value) in [
            ("stackA", &new.stack_a),
            ("stackB", &new.stack_b),
            ("file", &new.file),
        ] {
            if value.trim().is_empty() {
                return Err(ExError::new(ExErrorKind::InvalidInput)
                    .with_message(format!("{} must not be empty", field)));
            }
        }
        store.insert_diff(new, Utc::now())
    })
}
