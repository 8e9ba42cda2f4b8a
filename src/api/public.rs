//! Public API types

use axum::Json;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde_json::json;

use crate::core::ChatError;

// Errors

pub struct ApiError(anyhow::Error);

/// Convert `ApiError` into an Axum compatible response.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Always log the error
        tracing::error!("{}", self.0);

        // Chat errors get a status that tells the caller who is at fault
        let (status, kind) = match self.0.downcast_ref::<ChatError>() {
            Some(err @ ChatError::MissingCredential) => {
                (StatusCode::SERVICE_UNAVAILABLE, err.kind())
            }
            Some(err) => (StatusCode::BAD_GATEWAY, err.kind()),
            None => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
        };

        (
            status,
            Json(json!({
                "error": format!("Something went wrong: {}", self.0),
                "kind": kind,
            })),
        )
            .into_response()
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
