//! Hand-rolled JSON-RPC 2.0 responder implementing the tool-calling subset of
//! MCP (`initialize`, `tools/list`, `tools/call`).
//!
//! Each HTTP endpoint pairs a transport (plain JSON or SSE) with a
//! [`Toolset`]; the protocol handling lives once in [`dispatch`].

pub mod dispatch;
pub mod toolset;
pub mod types;

pub use dispatch::{dispatch, dispatch_body, Reply};
pub use toolset::{CallError, EchoToolset, ResidentToolset, ToolOutput, Toolset};
pub use types::{JsonRpcResponse, RpcError};
