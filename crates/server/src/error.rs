//! Error responses for the HTTP server.
//!
//! Every pipeline failure, validation or transport, goes to the same generic
//! responder: HTTP 500 with the error message as a plain-text body.

use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use mdrelay_core::Error;

/// Error returned from route handlers.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub Error);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;

        if err.is_validation() {
            tracing::info!(code = err.code(), error = ?err, "request rejected");
        } else {
            tracing::warn!(code = err.code(), error = %err, "request failed");
        }

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            err.to_string(),
        )
            .into_response()
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
