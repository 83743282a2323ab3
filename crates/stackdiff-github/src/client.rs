//! GitHub REST client
//!
//! One owned client per process, constructed at start-up and shared behind
//! `Arc<dyn SourceControl>`. The underlying `reqwest::Client` can be swapped
//! with [`GithubClient::reconnect`] without rebuilding the handle.

use async_trait::async_trait;
use base64::Engine as _;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use stackdiff_core::errors::{ExError, ExErrorKind, StackDiffError};
use stackdiff_core_types::Sensitive;
use std::sync::RwLock;
use std::time::Duration;

use crate::models::{AuthenticatedUser, ContentEntry, Organization, RateLimit, Repository};
use crate::source::SourceControl;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// API base URL for a GitHub host name
///
/// `github.com` uses the public API host, anything else is treated as a
/// GitHub Enterprise server.
pub fn api_base_url_for_host(hostname: &str) -> String {
    if hostname == "github.com" || hostname == "api.github.com" {
        "https://api.github.com".to_string()
    } else {
        format!("https://{}/api/v3", hostname)
    }
}

/// Connection settings for [`GithubClient`]
#[derive(Debug, Clone)]
pub struct GithubSettings {
    pub api_base_url: String,
    pub organization: String,
    pub token: Sensitive<String>,
}

pub struct GithubClient {
    http: RwLock<reqwest::Client>,
    base_url: String,
    base: reqwest::Url,
    organization: String,
    token: Sensitive<String>,
}

impl std::fmt::Debug for GithubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubClient")
            .field("base_url", &self.base_url)
            .field("organization", &self.organization)
            .field("token", &self.token)
            .finish()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ContentsResponse {
    Listing(Vec<ContentEntry>),
    Single(FileContent),
}

#[derive(Deserialize)]
struct FileContent {
    name: String,
    path: String,
    #[serde(rename = "type")]
    kind: crate::models::ContentKind,
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct RateLimitResponse {
    resources: RateLimitResources,
}

#[derive(Deserialize)]
struct RateLimitResources {
    core: RateLimit,
}

impl GithubClient {
    /// Build a client. No request is sent; call
    /// [`SourceControl::authenticate`] to verify the token.
    ///
    /// # Errors
    ///
    /// `Config` when the HTTP client cannot be built or the base URL is not
    /// an absolute http(s) URL.
    pub fn new(settings: GithubSettings) -> Result<Self, ExError> {
        let base_url = settings.api_base_url.trim_end_matches('/').to_string();
        let base = reqwest::Url::parse(&base_url)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| {
                ExError::new(ExErrorKind::Config)
                    .with_op("github_client")
                    .with_entity_id(base_url.clone())
                    .with_message("invalid API base URL")
            })?;
        let http = build_http_client()?;
        Ok(Self {
            http: RwLock::new(http),
            base_url,
            base,
            organization: settings.organization,
            token: settings.token,
        })
    }

    pub fn organization_name(&self) -> &str {
        &self.organization
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Replace the underlying HTTP client with a fresh one
    ///
    /// # Errors
    ///
    /// `Config` when the HTTP client cannot be built, `Concurrency` when the
    /// client lock is poisoned.
    pub fn reconnect(&self) -> Result<(), ExError> {
        let fresh = build_http_client()?;
        let mut guard = self.http.write().map_err(|_| lock_poisoned("reconnect"))?;
        *guard = fresh;
        tracing::info!(base_url = %self.base_url, "github client reconnected");
        Ok(())
    }

    fn http(&self, op: &str) -> Result<reqwest::Client, ExError> {
        self.http
            .read()
            .map(|client| client.clone())
            .map_err(|_| lock_poisoned(op))
    }

    /// Append `segments` to the base URL, percent-encoding each one
    fn api_url<'a>(
        &self,
        op: &str,
        segments: impl IntoIterator<Item = &'a str>,
    ) -> Result<reqwest::Url, ExError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| {
                ExError::new(ExErrorKind::Config)
                    .with_op(op.to_string())
                    .with_message("API base URL cannot take a path")
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn repo_url(&self, op: &str, repo: &str) -> Result<reqwest::Url, ExError> {
        self.api_url(op, ["repos", self.organization.as_str(), repo])
    }

    /// Path separators in `path` stay separators; everything else in a
    /// segment is encoded.
    fn contents_url(&self, op: &str, repo: &str, path: &str) -> Result<reqwest::Url, ExError> {
        let segments = ["repos", self.organization.as_str(), repo, "contents"]
            .into_iter()
            .chain(path.split('/').filter(|segment| !segment.is_empty()));
        self.api_url(op, segments)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        op: &str,
        url: reqwest::Url,
    ) -> Result<T, ExError> {
        tracing::debug!(op, url = %url, "github request");

        let response = self
            .http(op)?
            .get(url)
            .bearer_auth(self.token.expose())
            .send()
            .await
            .map_err(|e| {
                ExError::new(ExErrorKind::ExternalService)
                    .with_op(op.to_string())
                    .with_message(format!("request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(op, status = %status, body = %body, "github request rejected");
            return Err(status_error(op, status, &body));
        }

        response.json::<T>().await.map_err(|e| {
            ExError::new(ExErrorKind::Decode)
                .with_op(op.to_string())
                .with_message(format!("unexpected response body: {}", e))
        })
    }
}

#[async_trait]
impl SourceControl for GithubClient {
    async fn authenticate(&self) -> Result<AuthenticatedUser, ExError> {
        let user: AuthenticatedUser = self
            .get_json("authenticate", self.api_url("authenticate", ["user"])?)
            .await?;
        tracing::info!(login = %user.login, id = user.id, kind = %user.kind, "authenticated");
        Ok(user)
    }

    async fn organization(&self) -> Result<Organization, ExError> {
        let url = self.api_url("organization", ["orgs", self.organization.as_str()])?;
        self.get_json("organization", url).await.map_err(|e| {
            if e.is_not_found() {
                ExError::new(ExErrorKind::NotFound)
                    .with_op("organization")
                    .with_entity_id(self.organization.clone())
                    .with_message("Could not find organization")
            } else {
                e
            }
        })
    }

    async fn get_repository(&self, repo: &str) -> Result<Repository, ExError> {
        let repository: Repository = self
            .get_json("get_repository", self.repo_url("get_repository", repo)?)
            .await
            .map_err(|e| {
                not_found_as(e, || StackDiffError::RepositoryNotFound {
                    repo: repo.to_string(),
                })
            })?;
        tracing::info!(repo, id = repository.id, "retrieved repository");
        Ok(repository)
    }

    async fn list_contents(&self, repo: &str, path: &str) -> Result<Vec<ContentEntry>, ExError> {
        let response: ContentsResponse = self
            .get_json("list_contents", self.contents_url("list_contents", repo, path)?)
            .await
            .map_err(|e| not_found_as(e, || path_not_found(repo, path)))?;

        Ok(match response {
            ContentsResponse::Listing(entries) => entries,
            ContentsResponse::Single(file) => vec![ContentEntry {
                name: file.name,
                path: file.path,
                kind: file.kind,
            }],
        })
    }

    async fn get_file_text(&self, repo: &str, path: &str) -> Result<String, ExError> {
        let response: ContentsResponse = self
            .get_json("get_file_text", self.contents_url("get_file_text", repo, path)?)
            .await
            .map_err(|e| not_found_as(e, || path_not_found(repo, path)))?;

        let file = match response {
            ContentsResponse::Single(file) if file.kind == crate::models::ContentKind::File => file,
            _ => {
                return Err(ExError::from(StackDiffError::NotAFile {
                    repo: repo.to_string(),
                    path: path.to_string(),
                })
                .with_op("get_file_text"))
            }
        };

        let encoded = file.content.ok_or_else(|| decode_error(path, "no content returned"))?;
        decode_content(path, &encoded)
    }

    async fn rate_limit(&self) -> Result<RateLimit, ExError> {
        let response: RateLimitResponse = self
            .get_json("rate_limit", self.api_url("rate_limit", ["rate_limit"])?)
            .await?;
        Ok(response.resources.core)
    }
}

/// Decode a base64 content field. GitHub wraps the payload at 60 columns,
/// so whitespace is removed before decoding.
fn decode_content(path: &str, encoded: &str) -> Result<String, ExError> {
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(compact)
        .map_err(|e| decode_error(path, &format!("invalid base64: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| decode_error(path, &format!("invalid UTF-8: {}", e)))
}

fn build_http_client() -> Result<reqwest::Client, ExError> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static("stackdiff"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));

    reqwest::Client::builder()
        .default_headers(headers)
        .timeout(DEFAULT_TIMEOUT)
        .build()
        .map_err(|e| {
            ExError::new(ExErrorKind::Config)
                .with_op("build_http_client")
                .with_message(e.to_string())
        })
}

fn status_error(op: &str, status: StatusCode, body: &str) -> ExError {
    let kind = match status {
        StatusCode::NOT_FOUND => ExErrorKind::NotFound,
        StatusCode::UNAUTHORIZED => ExErrorKind::Unauthorised,
        _ => ExErrorKind::ExternalService,
    };
    ExError::new(kind)
        .with_op(op.to_string())
        .with_message(format!("github returned {}: {}", status, body))
}

fn not_found_as(err: ExError, domain: impl FnOnce() -> StackDiffError) -> ExError {
    if err.is_not_found() {
        let op = err.op().map(str::to_string);
        let mapped = ExError::from(domain());
        match op {
            Some(op) => mapped.with_op(op),
            None => mapped,
        }
    } else {
        err
    }
}

fn path_not_found(repo: &str, path: &str) -> StackDiffError {
    StackDiffError::PathNotFound {
        repo: repo.to_string(),
        path: path.to_string(),
    }
}

fn decode_error(path: &str, reason: &str) -> ExError {
    ExError::from(StackDiffError::Decode {
        path: path.to_string(),
        reason: reason.to_string(),
    })
    .with_op("get_file_text")
}

fn lock_poisoned(op: &str) -> ExError {
    ExError::new(ExErrorKind::Concurrency)
        .with_op(op.to_string())
        .with_message("http client lock poisoned")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_and_enterprise_hosts() {
        assert_eq!(api_base_url_for_host("github.com"), "https://api.github.com");
        assert_eq!(
            api_base_url_for_host("git.corp.example"),
            "https://git.corp.example/api/v3"
        );
    }

    #[test]
    fn test_decode_content_strips_line_breaks() {
        let text = decode_content("f", "YTogMQpi\nOiAyCg==\n").unwrap();
        assert_eq!(text, "a: 1\nb: 2\n");
    }

    #[test]
    fn test_decode_content_rejects_bad_input() {
        let err = decode_content("f", "!!!").unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Decode);

        // "/w==" decodes to 0xff, which is not UTF-8
        let err = decode_content("f", "/w==").unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Decode);
        assert!(err.message().contains("UTF-8"));
    }

    #[test]
    fn test_debug_redacts_token() {
        let client = GithubClient::new(GithubSettings {
            api_base_url: "https://api.github.com/".to_string(),
            organization: "acme".to_string(),
            token: Sensitive::new("ghp_secret".to_string()),
        })
        .unwrap();
        let debug = format!("{:?}", client);
        assert!(!debug.contains("ghp_secret"));
        assert_eq!(client.base_url(), "https://api.github.com");
    }

    fn client(base: &str) -> GithubClient {
        GithubClient::new(GithubSettings {
            api_base_url: base.to_string(),
            organization: "acme".to_string(),
            token: Sensitive::new("t".to_string()),
        })
        .unwrap()
    }

    #[test]
    fn test_contents_url_encodes_each_segment() {
        let url = client("https://git.corp.example/api/v3/")
            .contents_url("list_contents", "stack-prod", "/apps/my svc/a#b?.yml")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://git.corp.example/api/v3/repos/acme/stack-prod/contents/apps/my%20svc/a%23b%3F.yml"
        );
    }

    #[test]
    fn test_repo_name_cannot_add_path_segments() {
        let url = client("https://api.github.com")
            .repo_url("get_repository", "evil/../x")
            .unwrap();
        assert_eq!(url.as_str(), "https://api.github.com/repos/acme/evil%2F..%2Fx");
    }

    #[test]
    fn test_invalid_base_url_is_config_error() {
        let err = GithubClient::new(GithubSettings {
            api_base_url: "not a url".to_string(),
            organization: "acme".to_string(),
            token: Sensitive::new("t".to_string()),
        })
        .unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Config);
    }
}
