//! Public API types

use axum::response::{IntoResponse, Response};
use http::StatusCode;

use crate::chat::SendError;

// Errors

pub struct ApiError(anyhow::Error);

impl ApiError {
    fn status(&self) -> StatusCode {
        match self.0.downcast_ref::<SendError>() {
            Some(SendError::EmptyMessage) | Some(SendError::InvalidConfig) => {
                StatusCode::BAD_REQUEST
            }
            Some(SendError::Busy) => StatusCode::CONFLICT,
            Some(SendError::UnknownMessage(_)) => StatusCode::NOT_FOUND,
            Some(SendError::Encode(_)) | None => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Convert `ApiError` into an Axum compatible response.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{}", self.0);
            return (status, format!("Something went wrong: {}", self.0)).into_response();
        }

        // A refused send is the caller's problem, not ours
        tracing::debug!("Rejected request: {}", self.0);
        (status, self.0.to_string()).into_response()
    }
}

/// Enables using `?` on functions that return `Result<_,
/// anyhow::Error>` to turn them into `Result<_, ApiError>`
impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

// Re-export public types from each route

pub mod chat {
    pub use crate::api::routes::chat::public::*;
}

pub mod config {
    pub use crate::api::routes::config::public::*;
}

pub mod logs {
    pub use crate::api::routes::logs::public::*;
}
