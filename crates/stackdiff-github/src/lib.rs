//! stackdiff github - source-control collaborator
//!
//! [`SourceControl`] is the seam the engine depends on; [`GithubClient`] is
//! its REST implementation for GitHub and GitHub Enterprise.

pub mod client;
pub mod models;
pub mod source;

pub use client::{api_base_url_for_host, GithubClient, GithubSettings};
pub use models::{AuthenticatedUser, ContentEntry, ContentKind, Organization, RateLimit, Repository};
pub use source::SourceControl;
