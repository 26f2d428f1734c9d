//! Error type for the non-RPC HTTP handlers.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::google::GoogleError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Google(#[from] GoogleError),

    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Google(GoogleError::NotAuthenticated | GoogleError::NoRefreshToken) => {
                StatusCode::UNAUTHORIZED
            }
            Self::Google(GoogleError::Status { status, .. }) if status.as_u16() == 401 => {
                StatusCode::UNAUTHORIZED
            }
            Self::Google(GoogleError::NotConfigured(_) | GoogleError::InvalidUrl { .. }) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Google(_) => StatusCode::BAD_GATEWAY,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, status = %status, "request rejected");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
