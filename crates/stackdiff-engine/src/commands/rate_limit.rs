//! Suspension on an exhausted API quota.

use chrono::Utc;
use stackdiff_core::errors::ExError;
use stackdiff_github::SourceControl;
use std::time::Duration;

/// Sleep until the quota resets when none is left
///
/// Returns how long the task waited (zero when calls remain or the reset
/// time has already passed). The sleep is a `tokio` timer, so the worker
/// thread stays free.
///
/// # Errors
///
/// Any error from reading the rate limit.
pub async fn wait_for_rate_limit(source: &dyn SourceControl) -> Result<Duration, ExError> {
    let limit = source.rate_limit().await?;
    if !limit.is_exhausted() {
        tracing::debug!(remaining = limit.remaining, limit = limit.limit, "rate limit ok");
        return Ok(Duration::ZERO);
    }

    let seconds = limit.reset - Utc::now().timestamp();
    if seconds <= 0 {
        return Ok(Duration::ZERO);
    }

    let wait = Duration::from_secs(seconds as u64);
    tracing::warn!(
        wait_secs = wait.as_secs(),
        reset = limit.reset,
        "rate limit exhausted, waiting for reset"
    );
    tokio::time::sleep(wait).await;
    Ok(wait)
}
