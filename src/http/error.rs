//! Mapping from handler failures to HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::core::moderation::{ModerationCategory, ModerationVerdict};

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<ModerationCategory>,
}

#[derive(Debug)]
pub enum ApiError {
    /// No valid session (401)
    Unauthorized,
    /// Moderation rejected the entry (400)
    Rejected(ModerationVerdict),
    /// Anything else (500). Only the public message reaches the client.
    Internal(&'static str),
}

impl ApiError {
    /// Log `source` and return a 500 with a generic `message`.
    pub fn internal(message: &'static str, source: impl std::fmt::Display) -> Self {
        tracing::error!("{}: {}", message, source);
        ApiError::Internal(message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    error: "Unauthorized".to_string(),
                    category: None,
                },
            ),
            ApiError::Rejected(verdict) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: verdict
                        .reason
                        .unwrap_or_else(|| "Entry was not accepted".to_string()),
                    category: verdict.category,
                },
            ),
            ApiError::Internal(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody {
                    error: message.to_string(),
                    category: None,
                },
            ),
        };

        (status, Json(body)).into_response()
    }
}
