//! Diff routes: comparison runs, stored records, reviews.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stackdiff_core::record::{DiffRecord, NewDiff};
use stackdiff_engine::commands::{
    compute_all_diffs, fetch_configs, get_diff, insert_diff, latest_diff_for_file,
    latest_run_for_stacks, list_all_diffs, toggle_review, BatchOutcome, ConfigPair,
};

use super::ApiResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StacksPayload {
    pub stack_a: String,
    pub stack_b: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StackFilePayload {
    pub stack_a: String,
    pub stack_b: String,
    pub file: String,
}

#[derive(Debug, Deserialize)]
pub struct ReviewPayload {
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct DiffResponse {
    pub diff: DiffRecord,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffListResponse {
    pub files_with_diff: Vec<DiffRecord>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StackDiffListResponse {
    pub stack_a: String,
    pub stack_b: String,
    pub files_with_diff: Vec<DiffRecord>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestDiffResponse {
    pub stack_a: String,
    pub stack_b: String,
    pub diff: DiffRecord,
    pub latest_diff: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    /// Number of records matched
    pub status: usize,
}

/// `GET /getOneDiffById/:id`
pub async fn get_one_diff_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<DiffResponse>> {
    let diff = get_diff(&state.store, &id)?;
    Ok(Json(DiffResponse { diff }))
}

/// `GET /getAllDiff`
pub async fn get_all_diff(State(state): State<AppState>) -> ApiResult<Json<DiffListResponse>> {
    let files_with_diff = list_all_diffs(&state.store)?;
    Ok(Json(DiffListResponse { files_with_diff }))
}

/// `POST /getAllDiffsFromStacks`: records of the latest run for the pair
pub async fn get_all_diffs_from_stacks(
    State(state): State<AppState>,
    payload: Result<Json<StacksPayload>, JsonRejection>,
) -> ApiResult<Json<StackDiffListResponse>> {
    let Json(StacksPayload { stack_a, stack_b }) = payload?;
    let files_with_diff = latest_run_for_stacks(&state.store, &stack_a, &stack_b)?;
    Ok(Json(StackDiffListResponse {
        stack_a,
        stack_b,
        files_with_diff,
    }))
}

/// `POST /getLatestDiffsFromStacks`
pub async fn get_latest_diffs_from_stacks(
    State(state): State<AppState>,
    payload: Result<Json<StackFilePayload>, JsonRejection>,
) -> ApiResult<Json<LatestDiffResponse>> {
    let Json(StackFilePayload {
        stack_a,
        stack_b,
        file,
    }) = payload?;
    let latest = latest_diff_for_file(&state.store, &stack_a, &stack_b, &file)?;
    Ok(Json(LatestDiffResponse {
        stack_a,
        stack_b,
        diff: latest.diff,
        latest_diff: latest.latest_diff,
    }))
}

/// `POST /getConfigsFromStacks`: raw text of `file` on both stacks
pub async fn get_configs_from_stacks(
    State(state): State<AppState>,
    payload: Result<Json<StackFilePayload>, JsonRejection>,
) -> ApiResult<Json<ConfigPair>> {
    let Json(StackFilePayload {
        stack_a,
        stack_b,
        file,
    }) = payload?;
    let pair = fetch_configs(state.source.as_ref(), &stack_a, &stack_b, &file).await?;
    Ok(Json(pair))
}

/// `POST /computeAllDiffs`
pub async fn compute_all(
    State(state): State<AppState>,
    payload: Result<Json<StacksPayload>, JsonRejection>,
) -> ApiResult<Json<BatchOutcome>> {
    let Json(StacksPayload { stack_a, stack_b }) = payload?;
    let outcome = compute_all_diffs(
        state.source.as_ref(),
        &state.store,
        &state.settings,
        &stack_a,
        &stack_b,
    )
    .await?;
    Ok(Json(outcome))
}

/// `POST /insertOneDiff`
pub async fn insert_one_diff(
    State(state): State<AppState>,
    payload: Result<Json<NewDiff>, JsonRejection>,
) -> ApiResult<Json<DiffRecord>> {
    let Json(new) = payload?;
    let record = insert_diff(&state.store, &new)?;
    Ok(Json(record))
}

/// `POST /toggleReview`
pub async fn toggle_review_status(
    State(state): State<AppState>,
    payload: Result<Json<ReviewPayload>, JsonRejection>,
) -> ApiResult<Json<ReviewResponse>> {
    let Json(ReviewPayload { id }) = payload?;
    let status = toggle_review(&state.store, &id)?;
    Ok(Json(ReviewResponse { status }))
}
