use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::Error;

/// [`Error`] rendered as an HTTP response with a JSON `{"error": ...}` body.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0 {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::AlreadyPaused(_) | Error::InvalidState(_) => StatusCode::CONFLICT,
            Error::Cancelled(_) | Error::Aborted(_) | Error::HandoffClosed(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
        }
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_client_error() {
            tracing::debug!(%status, error = %self.0, "Debug API request rejected");
        }
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}
