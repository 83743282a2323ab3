//! Values returned by the source-control API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The account the access token belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub login: String,
    pub id: u64,
    #[serde(rename = "type", default)]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub login: String,
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
}

/// Repository summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    #[serde(default)]
    pub private: bool,
    #[serde(default)]
    pub default_branch: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
}

/// Kind of a directory listing entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Dir,
    File,
    Symlink,
    Submodule,
}

/// One entry of a directory listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentEntry {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: ContentKind,
}

impl ContentEntry {
    pub fn is_dir(&self) -> bool {
        self.kind == ContentKind::Dir
    }
}

/// Core API quota
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimit {
    pub limit: u64,
    pub remaining: u64,
    /// Unix seconds at which the quota resets
    pub reset: i64,
}

impl RateLimit {
    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }

    pub fn reset_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.reset, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_entry_reads_github_type_field() {
        let entry: ContentEntry = serde_json::from_value(serde_json::json!({
            "name": "svc",
            "path": "configs/a/svc",
            "type": "dir",
            "sha": "abc",
            "size": 0
        }))
        .unwrap();
        assert!(entry.is_dir());
        assert_eq!(entry.path, "configs/a/svc");
    }

    #[test]
    fn test_rate_limit_reset_time() {
        let limit = RateLimit {
            limit: 5000,
            remaining: 0,
            reset: 1_700_000_000,
        };
        assert!(limit.is_exhausted());
        assert_eq!(limit.reset_at().map(|t| t.timestamp()), Some(1_700_000_000));
    }
}
