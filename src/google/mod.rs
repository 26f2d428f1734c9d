//! Google OAuth 2.0 and Gmail REST clients.

pub mod gmail;
pub mod oauth;
pub mod types;

pub use gmail::GmailClient;
pub use oauth::OAuthClient;
pub use types::{MessageSummary, OAuthTokens};

use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;

/// Failures talking to Google.
#[derive(Debug, thiserror::Error)]
pub enum GoogleError {
    #[error("not authenticated with Google")]
    NotAuthenticated,

    #[error("Google OAuth client is not configured (missing {0})")]
    NotConfigured(&'static str),

    #[error("access token expired and no refresh token is available")]
    NoRefreshToken,

    #[error("invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} returned {status}: {body}")]
    Status {
        endpoint: &'static str,
        status: StatusCode,
        body: String,
    },

    #[error("failed to decode {endpoint} response: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

/// Check the status and decode a JSON body, tagging errors with `endpoint`.
pub(crate) async fn read_json<T: DeserializeOwned>(
    endpoint: &'static str,
    response: Response,
) -> Result<T, GoogleError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        tracing::warn!(endpoint, status = %status, "Google API error");
        return Err(GoogleError::Status {
            endpoint,
            status,
            body,
        });
    }
    response
        .json()
        .await
        .map_err(|source| GoogleError::Decode { endpoint, source })
}
