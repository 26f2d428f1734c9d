//! Resident observation log served as JSON-RPC / MCP tools, with a small
//! Google OAuth and Gmail proxy alongside.
//!
//! carelog keeps a SQLite journal of free-text notes about named residents.
//! Agents reach it through several transports that share one tool dispatcher:
//!
//! | Endpoint | Reply | Tools |
//! |----------|-------|-------|
//! | `/api/mcp/simple` | JSON | `echo` |
//! | `/api/mcp/stream` | SSE | `echo`, `streaming_echo` |
//! | `/api/mcp/http` | JSON | `log_observation`, `query_observations` |
//! | `/api/mcp/stream-residents` | SSE | `log_observation`, `query_observations` |
//! | `/api/mcp/mcp`, stdio | rmcp | `log_observation`, `query_observations` |
//!
//! # Modules
//!
//! - [`config`]: TOML file plus environment overrides
//! - [`db`]: SQLite schema, migrations and health checks
//! - [`residents`]: observation storage, windowed queries and the duplicate guard
//! - [`tools`]: tool parameter types and the rmcp tool handler
//! - [`rpc`]: JSON-RPC dispatch shared by the hand-rolled endpoints
//! - [`http`]: the axum router
//! - [`session`]: OAuth tokens carried in an obfuscated cookie
//! - [`google`]: OAuth code exchange and Gmail reads

pub mod config;
pub mod db;
pub mod google;
pub mod http;
pub mod residents;
pub mod rpc;
pub mod server;
pub mod session;
pub mod tools;
