//! Error responses.
//!
//! # Responsibilities
//! - Map dispatch errors to HTTP status codes
//! - Log server-side failures; client errors stay at debug

use axum::response::{IntoResponse, Response};

use crate::error::RouterError;

impl IntoResponse for RouterError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Dispatch failed");
        } else {
            tracing::debug!(error = %self, status = %status, "Dispatch rejected");
        }
        (status, self.to_string()).into_response()
    }
}
