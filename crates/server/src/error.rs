//! HTTP rendering of registry errors.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use dap_registry::Error;

/// A registry error rendered as `{status, message}`.
#[derive(Debug)]
pub struct AppError(pub Error);

impl From<Error> for AppError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = self.0.to_response();
        let status = StatusCode::from_u16(body.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(body)).into_response()
    }
}
