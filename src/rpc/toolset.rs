//! Tool collections served by the JSON-RPC endpoints.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, BoxStream, StreamExt};
use serde_json::Value;

use super::types::{ToolDefinition, ToolsCallResult};
use crate::config::ToolsConfig;
use crate::db::{with_db, Db};
use crate::tools::echo::{self, EchoParams, StreamingEchoParams};
use crate::tools::log_observation::{self, LogObservationParams};
use crate::tools::query_observations::{self, QueryObservationsParams};
use crate::tools::validate::{parse_args, Issue};

/// What a tool call produced.
pub enum ToolOutput {
    Single(ToolsCallResult),
    /// Several results delivered over time; the SSE transports forward each
    /// one as its own event.
    Stream(BoxStream<'static, ToolsCallResult>),
}

#[derive(Debug, thiserror::Error)]
pub enum CallError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid params")]
    InvalidParams(Vec<Issue>),

    #[error(transparent)]
    Failed(#[from] anyhow::Error),
}

impl From<Vec<Issue>> for CallError {
    fn from(issues: Vec<Issue>) -> Self {
        Self::InvalidParams(issues)
    }
}

/// A named set of tools behind one JSON-RPC endpoint.
pub trait Toolset: Clone + Send + Sync + 'static {
    /// `serverInfo.name` reported by `initialize`.
    fn server_name(&self) -> &'static str;

    fn tools(&self) -> Vec<ToolDefinition>;

    fn call(
        &self,
        name: &str,
        args: Value,
    ) -> impl Future<Output = Result<ToolOutput, CallError>> + Send;
}

/// `echo`, plus `streaming_echo` when `streaming` is set.
#[derive(Clone)]
pub struct EchoToolset {
    streaming: bool,
    delay: Duration,
}

impl EchoToolset {
    pub fn simple() -> Self {
        Self {
            streaming: false,
            delay: Duration::ZERO,
        }
    }

    pub fn streaming(delay: Duration) -> Self {
        Self {
            streaming: true,
            delay,
        }
    }
}

impl Toolset for EchoToolset {
    fn server_name(&self) -> &'static str {
        if self.streaming {
            "streaming-mcp"
        } else {
            "simple-mcp"
        }
    }

    fn tools(&self) -> Vec<ToolDefinition> {
        let mut tools = vec![ToolDefinition::new::<EchoParams>(
            "echo",
            "A simple echo tool for testing",
        )];
        if self.streaming {
            tools.push(ToolDefinition::new::<StreamingEchoParams>(
                "streaming_echo",
                "A streaming echo tool that sends multiple messages",
            ));
        }
        tools
    }

    async fn call(&self, name: &str, args: Value) -> Result<ToolOutput, CallError> {
        match name {
            "echo" => {
                let params: EchoParams = parse_args(args)?;
                Ok(ToolOutput::Single(ToolsCallResult::text(echo::echo_text(&params))))
            }
            "streaming_echo" if self.streaming => {
                let params: Arc<StreamingEchoParams> = Arc::new(parse_args(args)?);
                let delay = self.delay;
                let results = stream::iter(1..=params.count())
                    .then(move |i| {
                        let params = Arc::clone(&params);
                        async move {
                            tokio::time::sleep(delay).await;
                            ToolsCallResult::text(echo::streaming_echo_text(&params, i))
                        }
                    })
                    .boxed();
                Ok(ToolOutput::Stream(results))
            }
            other => Err(CallError::UnknownTool(other.to_string())),
        }
    }
}

/// `log_observation` and `query_observations` over the shared database.
#[derive(Clone)]
pub struct ResidentToolset {
    name: &'static str,
    db: Db,
    settings: Arc<ToolsConfig>,
}

impl ResidentToolset {
    pub fn new(name: &'static str, db: Db, settings: Arc<ToolsConfig>) -> Self {
        Self { name, db, settings }
    }
}

impl Toolset for ResidentToolset {
    fn server_name(&self) -> &'static str {
        self.name
    }

    fn tools(&self) -> Vec<ToolDefinition> {
        vec![
            ToolDefinition::new::<LogObservationParams>(
                "log_observation",
                "Insert a resident observation (returns observation id). Pass {\"confirm\": true} to actually save.",
            ),
            ToolDefinition::new::<QueryObservationsParams>(
                "query_observations",
                "Fetch recent observations for a resident. Use this before summarizing last N days.",
            ),
        ]
    }

    async fn call(&self, name: &str, args: Value) -> Result<ToolOutput, CallError> {
        match name {
            "log_observation" => {
                let params: LogObservationParams = parse_args(args)?;
                tracing::info!(resident = %params.resident_name, confirm = params.confirm, "log_observation");

                let window = self.settings.duplicate_window_minutes;
                let text = with_db(&self.db, move |conn| {
                    let outcome = log_observation::run(conn, &params, window)?;
                    Ok(outcome.text(&params, window))
                })
                .await?;
                Ok(ToolOutput::Single(ToolsCallResult::text(text)))
            }
            "query_observations" => {
                let params: QueryObservationsParams = parse_args(args)?;
                tracing::info!(resident = %params.resident_name, since_days = ?params.since_days, "query_observations");

                let default_days = self.settings.default_since_days;
                let text = with_db(&self.db, move |conn| {
                    query_observations::run(conn, &params, default_days)
                })
                .await?;
                Ok(ToolOutput::Single(ToolsCallResult::text(text)))
            }
            other => Err(CallError::UnknownTool(other.to_string())),
        }
    }
}
