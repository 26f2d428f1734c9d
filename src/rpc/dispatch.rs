//! Method routing for a single JSON-RPC request object.

use futures::stream::{self, BoxStream, StreamExt};
use serde_json::{json, Value};

use super::toolset::{CallError, ToolOutput, Toolset};
use super::types::*;

/// What to send back for one request.
pub enum Reply {
    /// Notification: nothing is sent.
    None,
    Response(JsonRpcResponse),
    /// A streaming tool call; every item becomes a response carrying `id`.
    Stream {
        id: Value,
        results: BoxStream<'static, ToolsCallResult>,
    },
}

impl Reply {
    /// Collapse into at most one response. Streamed results are merged into a
    /// single result whose content holds every block in order.
    pub async fn collect(self) -> Option<JsonRpcResponse> {
        match self {
            Reply::None => None,
            Reply::Response(r) => Some(r),
            Reply::Stream { id, results } => {
                let all: Vec<ToolsCallResult> = results.collect().await;
                Some(result_response(id, ToolsCallResult::merge(all)))
            }
        }
    }

    /// Expand into the sequence of responses an SSE transport emits.
    pub fn into_stream(self) -> BoxStream<'static, JsonRpcResponse> {
        match self {
            Reply::None => stream::empty().boxed(),
            Reply::Response(r) => stream::once(async move { r }).boxed(),
            Reply::Stream { id, results } => results
                .map(move |result| result_response(id.clone(), result))
                .boxed(),
        }
    }
}

fn result_response(id: Value, result: ToolsCallResult) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => JsonRpcResponse::failure(
            id,
            RpcError::new(INTERNAL_ERROR, "Internal error").with_data(json!(e.to_string())),
        ),
    }
}

/// Route one request object to `toolset`.
pub async fn dispatch<T: Toolset>(toolset: &T, request: Value) -> Reply {
    let Value::Object(mut obj) = request else {
        return Reply::Response(JsonRpcResponse::failure(
            Value::Null,
            RpcError::new(INVALID_REQUEST, "Invalid Request"),
        ));
    };

    // a notification is a request without an `id` member
    let is_notification = !obj.contains_key("id");
    let id = obj.remove("id").unwrap_or(Value::Null);
    let params = obj.remove("params").unwrap_or(Value::Null);
    let method = match obj.get("method").and_then(Value::as_str) {
        Some(m) if !m.is_empty() => m.to_string(),
        _ => {
            return Reply::Response(JsonRpcResponse::failure(
                id,
                RpcError::new(INVALID_REQUEST, "Invalid Request"),
            ))
        }
    };

    tracing::debug!(server = toolset.server_name(), method = %method, "json-rpc request");

    match method.as_str() {
        "initialize" => Reply::Response(JsonRpcResponse::success(
            id,
            json!({
                "protocolVersion": PROTOCOL_VERSION,
                "serverInfo": {
                    "name": toolset.server_name(),
                    "version": env!("CARGO_PKG_VERSION"),
                },
                "capabilities": { "tools": {} },
            }),
        )),

        "ping" => Reply::Response(JsonRpcResponse::success(id, json!({}))),

        m if is_notification && m.starts_with("notifications/") => {
            tracing::debug!(method = %m, "notification received");
            Reply::None
        }

        "tools/list" => Reply::Response(JsonRpcResponse::success(
            id,
            json!({ "tools": toolset.tools() }),
        )),

        "tools/call" => call_tool(toolset, id, params).await,

        other => Reply::Response(JsonRpcResponse::failure(
            id,
            RpcError::new(METHOD_NOT_FOUND, format!("Method not found: {other}")),
        )),
    }
}

async fn call_tool<T: Toolset>(toolset: &T, id: Value, params: Value) -> Reply {
    let Some(name) = params.get("name").and_then(Value::as_str) else {
        return Reply::Response(JsonRpcResponse::failure(
            id,
            RpcError::new(INVALID_PARAMS, "Invalid params: missing name"),
        ));
    };
    let args = params.get("arguments").cloned().unwrap_or(Value::Null);

    tracing::info!(server = toolset.server_name(), tool = %name, "tools/call");

    match toolset.call(name, args).await {
        Ok(ToolOutput::Single(result)) => Reply::Response(result_response(id, result)),
        Ok(ToolOutput::Stream(results)) => Reply::Stream { id, results },
        Err(CallError::UnknownTool(name)) => Reply::Response(JsonRpcResponse::failure(
            id,
            RpcError::new(METHOD_NOT_FOUND, format!("Unknown tool: {name}")),
        )),
        Err(CallError::InvalidParams(issues)) => Reply::Response(JsonRpcResponse::failure(
            id,
            RpcError::new(INVALID_PARAMS, "Invalid params").with_data(json!(issues)),
        )),
        Err(CallError::Failed(e)) => {
            tracing::error!(tool = %name, error = %e, "tool call failed");
            Reply::Response(JsonRpcResponse::failure(
                id,
                RpcError::new(SERVER_ERROR, "Server error").with_data(json!(format!("{e:#}"))),
            ))
        }
    }
}

/// Dispatch a parsed body that may be a single request or a batch.
///
/// Returns the replies in request order. An empty batch yields one
/// `Invalid Request` error.
pub async fn dispatch_body<T: Toolset>(toolset: &T, body: Value) -> Vec<Reply> {
    match body {
        Value::Array(items) if items.is_empty() => vec![Reply::Response(JsonRpcResponse::failure(
            Value::Null,
            RpcError::new(INVALID_REQUEST, "Invalid Request"),
        ))],
        Value::Array(items) => {
            futures::future::join_all(items.into_iter().map(|item| dispatch(toolset, item))).await
        }
        single => vec![dispatch(toolset, single).await],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::toolset::EchoToolset;
    use std::time::Duration;

    async fn single(toolset: &EchoToolset, request: Value) -> JsonRpcResponse {
        dispatch(toolset, request).await.collect().await.unwrap()
    }

    #[tokio::test]
    async fn initialize_reports_server_info() {
        let resp = single(
            &EchoToolset::simple(),
            json!({"jsonrpc": "2.0", "id": 1, "method": "initialize"}),
        )
        .await;
        let result = resp.result.unwrap();
        assert_eq!(result["protocolVersion"], "2025-03-26");
        assert_eq!(result["serverInfo"]["name"], "simple-mcp");
        assert_eq!(result["capabilities"]["tools"], json!({}));
        assert_eq!(resp.id, json!(1));
    }

    #[tokio::test]
    async fn tools_list_depends_on_streaming_flag() {
        let names = |resp: JsonRpcResponse| -> Vec<String> {
            resp.result.unwrap()["tools"]
                .as_array()
                .unwrap()
                .iter()
                .map(|t| t["name"].as_str().unwrap().to_string())
                .collect()
        };
        let req = json!({"jsonrpc": "2.0", "id": "a", "method": "tools/list"});

        let simple = single(&EchoToolset::simple(), req.clone()).await;
        assert_eq!(names(simple), vec!["echo"]);

        let streaming = single(&EchoToolset::streaming(Duration::ZERO), req).await;
        assert_eq!(names(streaming), vec!["echo", "streaming_echo"]);
    }

    #[tokio::test]
    async fn tool_schema_is_generated() {
        let resp = single(
            &EchoToolset::simple(),
            json!({"jsonrpc": "2.0", "id": 1, "method": "tools/list"}),
        )
        .await;
        let schema = &resp.result.unwrap()["tools"][0]["inputSchema"];
        assert_eq!(schema["type"], "object");
        assert!(schema["properties"]["message"].is_object());
        assert!(schema.get("$schema").is_none());
    }

    #[tokio::test]
    async fn echo_call() {
        let resp = single(
            &EchoToolset::simple(),
            json!({"jsonrpc": "2.0", "id": 2, "method": "tools/call",
                   "params": {"name": "echo", "arguments": {"message": "hello"}}}),
        )
        .await;
        assert_eq!(resp.result.unwrap()["content"][0]["text"], "Echo: hello");
    }

    #[tokio::test]
    async fn missing_tool_name_is_invalid_params() {
        let resp = single(
            &EchoToolset::simple(),
            json!({"jsonrpc": "2.0", "id": 3, "method": "tools/call", "params": {}}),
        )
        .await;
        let err = resp.error.unwrap();
        assert_eq!(err.code, INVALID_PARAMS);
        assert_eq!(err.message, "Invalid params: missing name");
    }

    #[tokio::test]
    async fn unknown_tool_and_method() {
        let echo = EchoToolset::simple();
        let resp = single(
            &echo,
            json!({"jsonrpc": "2.0", "id": 4, "method": "tools/call",
                   "params": {"name": "streaming_echo"}}),
        )
        .await;
        let err = resp.error.unwrap();
        assert_eq!(err.code, METHOD_NOT_FOUND);
        assert_eq!(err.message, "Unknown tool: streaming_echo");

        let resp = single(&echo, json!({"jsonrpc": "2.0", "id": 5, "method": "resources/list"})).await;
        let err = resp.error.unwrap();
        assert_eq!(err.code, METHOD_NOT_FOUND);
        assert_eq!(err.message, "Method not found: resources/list");
    }

    #[tokio::test]
    async fn missing_method_is_invalid_request() {
        let resp = single(&EchoToolset::simple(), json!({"jsonrpc": "2.0", "id": 6})).await;
        assert_eq!(resp.error.unwrap().code, INVALID_REQUEST);
        assert_eq!(resp.id, json!(6));
    }

    #[tokio::test]
    async fn notifications_get_no_reply() {
        let reply = dispatch(
            &EchoToolset::simple(),
            json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
        )
        .await;
        assert!(matches!(reply, Reply::None));
    }

    #[tokio::test]
    async fn notification_method_with_id_is_answered() {
        let resp = single(
            &EchoToolset::simple(),
            json!({"jsonrpc": "2.0", "id": 42, "method": "notifications/initialized"}),
        )
        .await;
        assert_eq!(resp.id, json!(42));
        let err = resp.error.unwrap();
        assert_eq!(err.code, METHOD_NOT_FOUND);
        assert_eq!(err.message, "Method not found: notifications/initialized");
    }

    #[tokio::test]
    async fn streaming_echo_emits_count_responses() {
        let toolset = EchoToolset::streaming(Duration::ZERO);
        let reply = dispatch(
            &toolset,
            json!({"jsonrpc": "2.0", "id": 7, "method": "tools/call",
                   "params": {"name": "streaming_echo", "arguments": {"message": "hi", "count": 2}}}),
        )
        .await;
        let responses: Vec<JsonRpcResponse> = reply.into_stream().collect().await;
        assert_eq!(responses.len(), 2);
        assert_eq!(
            responses[1].result.as_ref().unwrap()["content"][0]["text"],
            "Streaming Echo 2/2: hi"
        );
        assert!(responses.iter().all(|r| r.id == json!(7)));
    }

    #[tokio::test]
    async fn streaming_echo_collects_into_one_result() {
        let toolset = EchoToolset::streaming(Duration::ZERO);
        let resp = single(
            &toolset,
            json!({"jsonrpc": "2.0", "id": 8, "method": "tools/call",
                   "params": {"name": "streaming_echo", "arguments": {"message": "hi"}}}),
        )
        .await;
        let content = resp.result.unwrap()["content"].as_array().unwrap().len();
        assert_eq!(content, 3);
    }

    #[tokio::test]
    async fn batch_preserves_order_and_rejects_empty() {
        let echo = EchoToolset::simple();
        let replies = dispatch_body(
            &echo,
            json!([
                {"jsonrpc": "2.0", "id": 1, "method": "ping"},
                {"jsonrpc": "2.0", "method": "notifications/initialized"},
                {"jsonrpc": "2.0", "id": 2, "method": "initialize"}
            ]),
        )
        .await;
        assert_eq!(replies.len(), 3);
        assert!(matches!(replies[1], Reply::None));

        let empty = dispatch_body(&echo, json!([])).await;
        let resp = match empty.into_iter().next().unwrap() {
            Reply::Response(r) => r,
            _ => panic!("expected a response"),
        };
        assert_eq!(resp.error.unwrap().code, INVALID_REQUEST);
    }
}
