//! Raw configuration text of one file on both stacks.

use crate::commands::rate_limit::wait_for_rate_limit;
use serde::{Deserialize, Serialize};
use stackdiff_core::errors::ExError;
use stackdiff_core::{log_op_end, log_op_error, log_op_start};
use stackdiff_github::SourceControl;
use std::time::Instant;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigPair {
    pub stack_a: String,
    pub stack_b: String,
    pub file: String,
    pub config_a: String,
    pub config_b: String,
}

/// Fetch `file` from both stacks, waiting out an exhausted rate limit first
///
/// # Errors
///
/// `NotFound` when either stack lacks the file; any other source-control error.
pub async fn fetch_configs(
    source: &dyn SourceControl,
    stack_a: &str,
    stack_b: &str,
    file: &str,
) -> Result<ConfigPair, ExError> {
    let start = Instant::now();
    log_op_start!("fetch_configs", stack_a = stack_a, stack_b = stack_b, file = file);

    let result = async {
        wait_for_rate_limit(source).await?;
        let config_a = source.get_file_text(stack_a, file).await?;
        let config_b = source.get_file_text(stack_b, file).await?;
        Ok::<_, ExError>(ConfigPair {
            stack_a: stack_a.to_string(),
            stack_b: stack_b.to_string(),
            file: file.to_string(),
            config_a,
            config_b,
        })
    }
    .await;

    let duration_ms = start.elapsed().as_millis() as u64;
    match &result {
        Ok(_) => {
            log_op_end!("fetch_configs", duration_ms = duration_ms);
        }
        Err(e) => {
            log_op_error!("fetch_configs", e.clone(), duration_ms = duration_ms);
        }
    }
    result
}
