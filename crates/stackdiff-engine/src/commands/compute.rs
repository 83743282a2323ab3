//! The comparison batch.
//!
//! Discovers subfolders in the reference stack (A), diffs each subfolder's
//! configuration file against the same path on stack B, and persists one
//! record per file that differs. Every record of one run shares the run's
//! `created_at`.

#![allow(clippy::result_large_err)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stackdiff_core::diff::compute_structural_diff;
use stackdiff_core::errors::ExError;
use stackdiff_core::record::{should_persist, DiffRecord, NewDiff};
use stackdiff_core::tree::parse_yaml_tree;
use stackdiff_core::{log_op_end, log_op_error, log_op_start};
use stackdiff_github::{ContentEntry, SourceControl};
use stackdiff_store::SqliteDiffStore;
use std::time::Instant;

use crate::commands::rate_limit::wait_for_rate_limit;
use crate::settings::BatchSettings;

/// A file the batch could not diff
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileFailure {
    pub file: String,
    /// Stable error code (`ERR_INVALID_YAML`, ...)
    pub kind: String,
    pub message: String,
}

/// Result of one comparison run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchOutcome {
    pub stack_a: String,
    pub stack_b: String,
    pub files_with_diff: Vec<DiffRecord>,
    pub failures: Vec<FileFailure>,
}

/// What happened to one subfolder
enum FileOutcome {
    Recorded(DiffRecord),
    Identical,
    Failed(FileFailure),
}

/// Compare every discovered configuration file of `stack_a` with `stack_b`
///
/// # Errors
///
/// - `NotFound`: a stack, a discovery folder, or a file on stack A is missing
/// - any other source-control or store error
///
/// Malformed YAML does not fail the run; it is reported in
/// [`BatchOutcome::failures`].
pub async fn compute_all_diffs(
    source: &dyn SourceControl,
    store: &SqliteDiffStore,
    settings: &BatchSettings,
    stack_a: &str,
    stack_b: &str,
) -> Result<BatchOutcome, ExError> {
    let start = Instant::now();
    log_op_start!("compute_all_diffs", stack_a = stack_a, stack_b = stack_b);

    let result = run_batch(source, store, settings, stack_a, stack_b).await;

    let duration_ms = start.elapsed().as_millis() as u64;
    match &result {
        Ok(outcome) => {
            log_op_end!(
                "compute_all_diffs",
                duration_ms = duration_ms,
                stack_a = stack_a,
                stack_b = stack_b,
                files_with_diff = outcome.files_with_diff.len(),
                failures = outcome.failures.len()
            );
        }
        Err(e) => {
            log_op_error!("compute_all_diffs", e.clone(), duration_ms = duration_ms);
        }
    }
    result
}

async fn run_batch(
    source: &dyn SourceControl,
    store: &SqliteDiffStore,
    settings: &BatchSettings,
    stack_a: &str,
    stack_b: &str,
) -> Result<BatchOutcome, ExError> {
    let created_at = Utc::now();

    wait_for_rate_limit(source).await?;
    source.get_repository(stack_a).await?;
    source.get_repository(stack_b).await?;

    let subfolders = discover_subfolders(source, settings, stack_a).await?;
    tracing::info!(
        stack_a,
        stack_b,
        subfolders = subfolders.len(),
        "discovered configuration folders"
    );

    let mut outcome = BatchOutcome {
        stack_a: stack_a.to_string(),
        stack_b: stack_b.to_string(),
        files_with_diff: Vec::new(),
        failures: Vec::new(),
    };

    for subfolder in subfolders {
        wait_for_rate_limit(source).await?;
        match compare_subfolder(source, store, settings, stack_a, stack_b, &subfolder, created_at)
            .await?
        {
            FileOutcome::Recorded(record) => outcome.files_with_diff.push(record),
            FileOutcome::Identical => {
                tracing::debug!(file = %subfolder.path, "configurations identical");
            }
            FileOutcome::Failed(failure) => outcome.failures.push(failure),
        }
    }

    Ok(outcome)
}

/// Directory entries of both discovery folders, listed in the reference stack
async fn discover_subfolders(
    source: &dyn SourceControl,
    settings: &BatchSettings,
    stack_a: &str,
) -> Result<Vec<ContentEntry>, ExError> {
    let mut subfolders = Vec::new();
    for folder in settings.discovery_folders() {
        let entries = source.list_contents(stack_a, &folder).await?;
        subfolders.extend(entries.into_iter().filter(ContentEntry::is_dir));
    }
    Ok(subfolders)
}

async fn compare_subfolder(
    source: &dyn SourceControl,
    store: &SqliteDiffStore,
    settings: &BatchSettings,
    stack_a: &str,
    stack_b: &str,
    subfolder: &ContentEntry,
    created_at: DateTime<Utc>,
) -> Result<FileOutcome, ExError> {
    let file = subfolder.path.as_str();
    let config_path = settings.config_path(file);

    let text_a = source.get_file_text(stack_a, &config_path).await?;
    let text_b = match source.get_file_text(stack_b, &config_path).await {
        Ok(text) => text,
        Err(e) if e.is_not_found() => {
            tracing::warn!(stack_b, file, "file missing on compared stack, recording sentinel");
            let record = store.insert_diff(&NewDiff::sentinel(stack_a, stack_b, file), created_at)?;
            return Ok(FileOutcome::Recorded(record));
        }
        Err(e) => return Err(e),
    };

    let tree_a = match parse_yaml_tree(&text_a) {
        Ok(tree) => tree,
        Err(e) => return Ok(FileOutcome::Failed(yaml_failure(file, stack_a, e.into()))),
    };
    let tree_b = match parse_yaml_tree(&text_b) {
        Ok(tree) => tree,
        Err(e) => return Ok(FileOutcome::Failed(yaml_failure(file, stack_b, e.into()))),
    };

    let diff = compute_structural_diff(&tree_a, &tree_b);
    tracing::info!(
        file,
        left_not_right_len = diff.left_not_right.len(),
        right_not_left_len = diff.right_not_left.len(),
        same_key_same_value_len = diff.same_key_same_value.len(),
        same_key_diff_value_len = diff.same_key_diff_value.len(),
        "compared configuration"
    );

    if !should_persist(&diff) {
        return Ok(FileOutcome::Identical);
    }

    let record = store.insert_diff(&NewDiff::from_diff(stack_a, stack_b, file, &diff), created_at)?;
    Ok(FileOutcome::Recorded(record))
}

fn yaml_failure(file: &str, stack: &str, err: ExError) -> FileFailure {
    tracing::warn!(file, stack, error = %err, "skipping malformed configuration");
    FileFailure {
        file: file.to_string(),
        kind: err.code().to_string(),
        message: format!("{}: {}", stack, err.message()),
    }
}
