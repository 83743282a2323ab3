//! In-memory `SourceControl` for engine tests.

#![allow(dead_code)]

use async_trait::async_trait;
use stackdiff_core::errors::{ExError, ExErrorKind, StackDiffError};
use stackdiff_github::{
    AuthenticatedUser, ContentEntry, ContentKind, Organization, RateLimit, Repository,
    SourceControl,
};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

#[derive(Default)]
pub struct FakeSource {
    repos: BTreeSet<String>,
    listings: BTreeMap<(String, String), Vec<ContentEntry>>,
    files: BTreeMap<(String, String), String>,
    broken_files: BTreeSet<(String, String)>,
    rate_limits: Mutex<Vec<RateLimit>>,
    pub rate_limit_calls: Mutex<usize>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_repo(mut self, repo: &str) -> Self {
        self.repos.insert(repo.to_string());
        self
    }

    /// Register subdirectories under `folder` in `repo`
    pub fn with_dirs(mut self, repo: &str, folder: &str, names: &[&str]) -> Self {
        let entries = names
            .iter()
            .map(|name| ContentEntry {
                name: name.to_string(),
                path: format!("{}/{}", folder, name),
                kind: ContentKind::Dir,
            })
            .collect();
        self.listings
            .insert((repo.to_string(), folder.to_string()), entries);
        self
    }

    pub fn with_entry(mut self, repo: &str, folder: &str, entry: ContentEntry) -> Self {
        self.listings
            .entry((repo.to_string(), folder.to_string()))
            .or_default()
            .push(entry);
        self
    }

    pub fn with_file(mut self, repo: &str, path: &str, text: &str) -> Self {
        self.files
            .insert((repo.to_string(), path.to_string()), text.to_string());
        self
    }

    /// A file whose fetch fails with an upstream error
    pub fn with_broken_file(mut self, repo: &str, path: &str) -> Self {
        self.broken_files
            .insert((repo.to_string(), path.to_string()));
        self
    }

    /// Rate limits returned in order; the last one repeats
    pub fn with_rate_limits(self, limits: Vec<RateLimit>) -> Self {
        *self.rate_limits.lock().unwrap() = limits;
        self
    }

    fn check_repo(&self, repo: &str) -> Result<(), ExError> {
        if self.repos.contains(repo) {
            Ok(())
        } else {
            Err(StackDiffError::RepositoryNotFound {
                repo: repo.to_string(),
            }
            .into())
        }
    }
}

pub fn plenty() -> RateLimit {
    RateLimit {
        limit: 5000,
        remaining: 4999,
        reset: 0,
    }
}

#[async_trait]
impl SourceControl for FakeSource {
    async fn authenticate(&self) -> Result<AuthenticatedUser, ExError> {
        Ok(AuthenticatedUser {
            login: "fake".to_string(),
            id: 1,
            kind: "Bot".to_string(),
        })
    }

    async fn organization(&self) -> Result<Organization, ExError> {
        Ok(Organization {
            login: "acme".to_string(),
            id: 1,
            name: None,
        })
    }

    async fn get_repository(&self, repo: &str) -> Result<Repository, ExError> {
        self.check_repo(repo)?;
        Ok(Repository {
            id: 1,
            name: repo.to_string(),
            full_name: format!("acme/{}", repo),
            private: true,
            default_branch: Some("main".to_string()),
            html_url: None,
        })
    }

    async fn list_contents(&self, repo: &str, path: &str) -> Result<Vec<ContentEntry>, ExError> {
        self.check_repo(repo)?;
        self.listings
            .get(&(repo.to_string(), path.to_string()))
            .cloned()
            .ok_or_else(|| {
                StackDiffError::PathNotFound {
                    repo: repo.to_string(),
                    path: path.to_string(),
                }
                .into()
            })
    }

    async fn get_file_text(&self, repo: &str, path: &str) -> Result<String, ExError> {
        self.check_repo(repo)?;
        let key = (repo.to_string(), path.to_string());
        if self.broken_files.contains(&key) {
            return Err(ExError::new(ExErrorKind::ExternalService).with_message("upstream 502"));
        }
        self.files.get(&key).cloned().ok_or_else(|| {
            StackDiffError::PathNotFound {
                repo: repo.to_string(),
                path: path.to_string(),
            }
            .into()
        })
    }

    async fn rate_limit(&self) -> Result<RateLimit, ExError> {
        *self.rate_limit_calls.lock().unwrap() += 1;
        let mut limits = self.rate_limits.lock().unwrap();
        match limits.len() {
            0 => Ok(plenty()),
            1 => Ok(limits[0]),
            _ => Ok(limits.remove(0)),
        }
    }
}
