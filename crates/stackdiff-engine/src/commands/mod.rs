//! Command orchestration layer.

pub mod compute;
pub mod configs;
pub mod query;
pub mod rate_limit;

pub use compute::{compute_all_diffs, BatchOutcome, FileFailure};
pub use configs::{fetch_configs, ConfigPair};
pub use query::{
    get_diff, insert_diff, latest_diff_for_file, latest_run_for_stacks, list_all_diffs,
    list_all_diffs_for_stacks, toggle_review, LatestDiff,
};
pub use rate_limit::wait_for_rate_limit;
