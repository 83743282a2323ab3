//! HTTP error mapping.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use stackdiff_core::errors::{ExError, ExErrorKind};

/// Error returned by every handler
#[derive(Debug)]
pub struct ApiError(pub ExError);

/// JSON error body
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0.kind() {
            ExErrorKind::NotFound | ExErrorKind::InvalidInput | ExErrorKind::InvalidYaml => {
                StatusCode::BAD_REQUEST
            }
            ExErrorKind::Unauthorised => StatusCode::UNAUTHORIZED,
            ExErrorKind::ExternalService | ExErrorKind::Decode => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ExError> for ApiError {
    fn from(err: ExError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(
            ExError::new(ExErrorKind::InvalidInput)
                .with_op("decode_body")
                .with_message(rejection.body_text()),
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error_code = self.0.code(), error = %self.0, "request failed");
        } else {
            tracing::warn!(error_code = self.0.code(), error = %self.0, "request rejected");
        }

        let message = if self.0.message().is_empty() {
            self.0.to_string()
        } else {
            self.0.message().to_string()
        };
        let body = ErrorBody {
            error: self.0.code(),
            message,
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ExErrorKind::NotFound, StatusCode::BAD_REQUEST),
            (ExErrorKind::InvalidInput, StatusCode::BAD_REQUEST),
            (ExErrorKind::InvalidYaml, StatusCode::BAD_REQUEST),
            (ExErrorKind::Unauthorised, StatusCode::UNAUTHORIZED),
            (ExErrorKind::ExternalService, StatusCode::BAD_GATEWAY),
            (ExErrorKind::Decode, StatusCode::BAD_GATEWAY),
            (ExErrorKind::Persistence, StatusCode::INTERNAL_SERVER_ERROR),
            (ExErrorKind::Concurrency, StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (kind, expected) in cases {
            assert_eq!(ApiError(ExError::new(kind)).status(), expected, "{:?}", kind);
        }
    }

    #[test]
    fn test_response_status() {
        let response = ApiError(
            ExError::new(ExErrorKind::NotFound).with_message("Could not find repo"),
        )
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
