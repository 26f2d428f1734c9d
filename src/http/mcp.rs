//! JSON and SSE transports for the hand-rolled JSON-RPC endpoints.

use std::borrow::Cow;
use std::convert::Infallible;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::sse::{Event, Sse};
use axum::response::{IntoResponse, Response};
use axum::Json;
use futures::stream::{self, BoxStream, Stream, StreamExt};
use serde_json::{json, Value};

use super::AppState;
use crate::rpc::types::{PARSE_ERROR, SERVER_ERROR};
use crate::rpc::{dispatch_body, JsonRpcResponse, Reply, RpcError, Toolset};

const LOG_SNIPPET_BYTES: usize = 1024;
const ERROR_SNIPPET: usize = 200;

fn snippet(raw: &str, max_chars: usize) -> String {
    raw.chars().take(max_chars).collect()
}

fn body_head(body: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(&body[..body.len().min(LOG_SNIPPET_BYTES)])
}

/// Debug-log the leading bytes of a request body.
fn log_body(endpoint: &str, body: &[u8]) {
    tracing::debug!(endpoint, bytes = body.len(), raw = %body_head(body), "json-rpc body");
}

/// Answer a JSON-RPC body with a plain JSON response.
///
/// Batches (JSON arrays) are answered with an array. A body made only of
/// notifications gets `204 No Content`.
pub async fn rpc_json<T: Toolset>(toolset: &T, endpoint: &str, body: Bytes) -> Response {
    log_body(endpoint, &body);
    let raw = String::from_utf8_lossy(&body);

    let parsed: Value = if raw.trim().is_empty() {
        json!({})
    } else {
        match serde_json::from_str(&raw) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(endpoint, error = %e, "unparsable json-rpc body");
                let resp = JsonRpcResponse::failure(
                    Value::Null,
                    RpcError::new(PARSE_ERROR, "Parse error")
                        .with_data(json!({ "rawSnippet": snippet(&raw, ERROR_SNIPPET) })),
                );
                return (StatusCode::BAD_REQUEST, Json(resp)).into_response();
            }
        }
    };

    let is_batch = parsed.is_array();
    let mut responses = Vec::new();
    for reply in dispatch_body(toolset, parsed).await {
        if let Some(resp) = reply.collect().await {
            responses.push(resp);
        }
    }

    if responses.is_empty() {
        return StatusCode::NO_CONTENT.into_response();
    }
    let errors = responses.iter().filter(|r| r.is_error()).count();
    tracing::debug!(endpoint, responses = responses.len(), errors, "json-rpc reply");
    if is_batch {
        Json(responses).into_response()
    } else {
        Json(responses.swap_remove(0)).into_response()
    }
}

/// Answer a JSON-RPC body as a server-sent event stream, one `data:` event
/// per response. The stream ends after the last response.
pub fn rpc_sse<T: Toolset>(
    toolset: T,
    endpoint: &'static str,
    body: Bytes,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    log_body(endpoint, &body);
    let responses: BoxStream<'static, JsonRpcResponse> = match serde_json::from_slice::<Value>(&body)
    {
        Ok(parsed) => stream::once(async move { dispatch_body(&toolset, parsed).await })
            .flat_map(|replies| stream::iter(replies).flat_map(Reply::into_stream))
            .boxed(),
        Err(e) => {
            tracing::warn!(endpoint, error = %e, "unparsable json-rpc body");
            let resp = JsonRpcResponse::failure(Value::Null, RpcError::new(SERVER_ERROR, e.to_string()));
            stream::once(async move { resp }).boxed()
        }
    };

    Sse::new(responses.map(|resp| Ok(sse_event(&resp))))
}

fn sse_event(resp: &JsonRpcResponse) -> Event {
    match serde_json::to_string(resp) {
        Ok(data) => Event::default().data(data),
        Err(e) => {
            tracing::error!(error = %e, "failed to encode json-rpc response");
            Event::default().data(r#"{"jsonrpc":"2.0","id":null,"error":{"code":-32603,"message":"Internal error"}}"#)
        }
    }
}

pub async fn simple(State(state): State<AppState>, body: Bytes) -> Response {
    rpc_json(&state.toolsets.simple, "/api/mcp/simple", body).await
}

pub async fn http(State(state): State<AppState>, body: Bytes) -> Response {
    rpc_json(&state.toolsets.residents, "/api/mcp/http", body).await
}

pub async fn stream(
    State(state): State<AppState>,
    body: Bytes,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    rpc_sse(state.toolsets.streaming.clone(), "/api/mcp/stream", body)
}

pub async fn stream_residents(
    State(state): State<AppState>,
    body: Bytes,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    rpc_sse(
        state.toolsets.streaming_residents.clone(),
        "/api/mcp/stream-residents",
        body,
    )
}

pub async fn simple_info() -> Json<Value> {
    Json(json!({ "ok": true, "endpoint": "/api/mcp/simple" }))
}

pub async fn http_info() -> Json<Value> {
    Json(json!({ "ok": true, "endpoint": "/api/mcp/http" }))
}

pub async fn stream_info() -> Json<Value> {
    Json(json!({ "ok": true, "endpoint": "/api/mcp/stream", "streaming": true }))
}

pub async fn stream_residents_info() -> Json<Value> {
    Json(json!({
        "ok": true,
        "endpoint": "/api/mcp/stream-residents",
        "streaming": true,
        "features": ["residents", "observations", "streaming"],
    }))
}

/// Plain `OPTIONS`; CORS preflights are answered by the CORS layer.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}
