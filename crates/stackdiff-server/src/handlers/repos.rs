//! Repository browsing for the configured organization.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use stackdiff_github::{ContentEntry, Repository};

use super::ApiResult;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ContentsResponse {
    pub items: Vec<ContentEntry>,
}

/// `GET /repos/:repo`
pub async fn get_repository(
    State(state): State<AppState>,
    Path(repo): Path<String>,
) -> ApiResult<Json<Repository>> {
    let repository = state.source.get_repository(&repo).await?;
    Ok(Json(repository))
}

/// `GET /repos/:repo/contents/*path`
pub async fn list_contents(
    State(state): State<AppState>,
    Path((repo, path)): Path<(String, String)>,
) -> ApiResult<Json<ContentsResponse>> {
    let items = state
        .source
        .list_contents(&repo, path.trim_start_matches('/'))
        .await?;
    Ok(Json(ContentsResponse { items }))
}
