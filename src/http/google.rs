//! Google OAuth redirects and the Gmail read endpoints.

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use super::{ApiError, AppState};
use crate::google::{GmailClient, GoogleError, OAuthTokens};
use crate::session::SessionStore;

/// Where the browser lands after a successful sign-in.
const AFTER_LOGIN: &str = "/kisco/gmail";

const DEFAULT_MAX_RESULTS: u32 = 50;
/// Gmail's own ceiling for `maxResults`.
const MAX_RESULTS_LIMIT: u32 = 500;

pub async fn oauth_start(State(state): State<AppState>) -> Result<Redirect, ApiError> {
    let url = state.oauth.authorization_url()?;
    tracing::info!("redirecting to Google consent screen");
    Ok(Redirect::temporary(url.as_str()))
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    code: Option<String>,
    error: Option<String>,
}

pub async fn oauth_callback(
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
) -> Response {
    if let Some(error) = &query.error {
        tracing::warn!(error = %error, "Google returned an OAuth error");
    }
    let Some(code) = query.code.filter(|c| !c.is_empty()) else {
        return Redirect::temporary("/?error=missing_code").into_response();
    };

    let tokens = match state.oauth.exchange_code(&code).await {
        Ok(tokens) => tokens,
        Err(e) => {
            tracing::error!(error = %e, "authorization code exchange failed");
            return Redirect::temporary("/?error=oauth_failed").into_response();
        }
    };

    let mut headers = HeaderMap::new();
    match state.session.save_tokens(&tokens) {
        Ok(cookie) => SessionStore::attach(&mut headers, cookie),
        Err(e) => {
            tracing::error!(error = %e, "failed to encode session cookie");
            return Redirect::temporary("/?error=oauth_failed").into_response();
        }
    }
    (headers, Redirect::temporary(AFTER_LOGIN)).into_response()
}

pub async fn oauth_logout(State(state): State<AppState>) -> Response {
    let mut headers = HeaderMap::new();
    SessionStore::attach(&mut headers, state.session.clear_tokens());
    (headers, Json(json!({ "ok": true }))).into_response()
}

/// Load tokens from the cookie, refreshing them if they have expired.
///
/// The returned headers carry a rewritten cookie when a refresh happened.
async fn authorize(
    state: &AppState,
    request_headers: &HeaderMap,
) -> Result<(OAuthTokens, HeaderMap), ApiError> {
    let tokens = state
        .session
        .load_tokens(request_headers)
        .ok_or(GoogleError::NotAuthenticated)?;

    let (tokens, refreshed) = state.oauth.ensure_fresh(tokens).await?;

    let mut headers = HeaderMap::new();
    if refreshed {
        SessionStore::attach(&mut headers, state.session.save_tokens(&tokens)?);
    }
    Ok((tokens, headers))
}

fn gmail_client(state: &AppState, tokens: &OAuthTokens) -> GmailClient {
    GmailClient::new(
        state.http.clone(),
        state.config.google.gmail_api_base.clone(),
        tokens.access_token.clone(),
    )
}

pub async fn labels(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let (tokens, out_headers) = authorize(&state, &headers).await?;
    let labels = gmail_client(&state, &tokens).list_labels().await?;
    Ok((out_headers, Json(labels)).into_response())
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagesRequest {
    label_id: Option<String>,
    q: Option<String>,
    max_results: Option<u32>,
}

/// An empty body means every field takes its default.
fn parse_messages_request(body: &[u8]) -> Result<MessagesRequest, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(MessagesRequest::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| ApiError::BadRequest(format!("invalid request body: {e}")))
}

pub async fn messages(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let request = parse_messages_request(&body)?;
    let max_results = request.max_results.unwrap_or(DEFAULT_MAX_RESULTS);
    if max_results == 0 || max_results > MAX_RESULTS_LIMIT {
        return Err(ApiError::BadRequest(format!(
            "maxResults must be between 1 and {MAX_RESULTS_LIMIT}"
        )));
    }

    let (tokens, out_headers) = authorize(&state, &headers).await?;

    let label_id = request.label_id.as_deref().filter(|l| !l.is_empty());
    let q = request.q.as_deref().filter(|q| !q.is_empty());
    tracing::info!(label = ?label_id, q = ?q, max_results, "listing Gmail messages");

    let out = gmail_client(&state, &tokens)
        .list_message_summaries(label_id, q, max_results)
        .await?;
    Ok((out_headers, Json(out)).into_response())
}
