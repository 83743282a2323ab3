//! Router assembly.

use axum::extract::Request;
use axum::http::Method;
use axum::routing::{get, post};
use axum::Router;
use stackdiff_core_types::RequestContext;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::CorsOrigins;
use crate::handlers::{diffs, health, repos};
use crate::state::AppState;

pub const REQUEST_ID_HEADER: &str = "x-request-id";
pub const TRACE_ID_HEADER: &str = "x-trace-id";

/// Build the application router with CORS and request tracing.
pub fn app(state: AppState, origins: &CorsOrigins) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/getOneDiffById/:id", get(diffs::get_one_diff_by_id))
        .route("/getAllDiff", get(diffs::get_all_diff))
        .route("/getAllDiffsFromStacks", post(diffs::get_all_diffs_from_stacks))
        .route(
            "/getLatestDiffsFromStacks",
            post(diffs::get_latest_diffs_from_stacks),
        )
        .route("/getConfigsFromStacks", post(diffs::get_configs_from_stacks))
        .route("/computeAllDiffs", post(diffs::compute_all))
        .route("/insertOneDiff", post(diffs::insert_one_diff))
        .route("/toggleReview", post(diffs::toggle_review_status))
        .route("/repos/:repo", get(repos::get_repository))
        .route("/repos/:repo/contents/*path", get(repos::list_contents))
        .layer(cors_layer(origins))
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
        .with_state(state)
}

fn cors_layer(origins: &CorsOrigins) -> CorsLayer {
    let allow_origin = match origins {
        CorsOrigins::Any => AllowOrigin::any(),
        CorsOrigins::List(list) => AllowOrigin::list(list.iter().cloned()),
    };
    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
}

fn request_context(request: &Request) -> RequestContext {
    let header = |name: &str| request.headers().get(name).and_then(|v| v.to_str().ok());
    RequestContext::from_caller(header(REQUEST_ID_HEADER), header(TRACE_ID_HEADER))
}

fn request_span(request: &Request) -> tracing::Span {
    let ctx = request_context(request);
    tracing::info_span!(
        "http_request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %ctx.request_id.as_str(),
        trace_id = ctx.trace_id_str(),
    )
}
