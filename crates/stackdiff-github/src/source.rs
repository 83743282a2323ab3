//! Source-control seam

use async_trait::async_trait;
use stackdiff_core::errors::ExError;

use crate::models::{AuthenticatedUser, ContentEntry, Organization, RateLimit, Repository};

/// Read access to the repositories of one organization
///
/// Errors follow one mapping across implementations: a missing repository
/// or path is `NotFound`, a rejected token is `Unauthorised`, content that
/// cannot be decoded is `Decode`, and any other remote failure is
/// `ExternalService`.
#[async_trait]
pub trait SourceControl: Send + Sync {
    /// The account behind the configured credentials
    async fn authenticate(&self) -> Result<AuthenticatedUser, ExError>;

    /// The configured organization
    async fn organization(&self) -> Result<Organization, ExError>;

    async fn get_repository(&self, repo: &str) -> Result<Repository, ExError>;

    /// Entries of a directory. A file path yields a single `File` entry.
    async fn list_contents(&self, repo: &str, path: &str) -> Result<Vec<ContentEntry>, ExError>;

    /// Decoded text of a file. A directory path is `InvalidInput`.
    async fn get_file_text(&self, repo: &str, path: &str) -> Result<String, ExError>;

    async fn rate_limit(&self) -> Result<RateLimit, ExError>;

    /// Succeeds when the credentials are accepted
    async fn health_check(&self) -> Result<(), ExError> {
        self.authenticate().await.map(|_| ())
    }
}
