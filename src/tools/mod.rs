pub mod echo;
pub mod log_observation;
pub mod query_observations;
pub mod validate;

use log_observation::LogObservationParams;
use query_observations::QueryObservationsParams;
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::{tool, tool_handler, tool_router, ServerHandler};
use std::sync::Arc;
use validate::Validate;

use crate::config::ToolsConfig;
use crate::db::{with_db, Db};

/// The carelog MCP tool handler for rmcp transports (stdio and streamable
/// HTTP). Holds the shared connection and tool settings.
#[derive(Clone)]
pub struct CarelogTools {
    tool_router: ToolRouter<Self>,
    db: Db,
    settings: Arc<ToolsConfig>,
}

#[tool_router]
impl CarelogTools {
    pub fn new(db: Db, settings: Arc<ToolsConfig>) -> Self {
        Self {
            tool_router: Self::tool_router(),
            db,
            settings,
        }
    }

    /// Insert a resident observation.
    #[tool(description = "Insert a resident observation (returns observation id). Pass {\"confirm\": true} to actually save.")]
    async fn log_observation(
        &self,
        Parameters(params): Parameters<LogObservationParams>,
    ) -> Result<String, String> {
        let issues = params.validate();
        if !issues.is_empty() {
            return Err(validate::describe(&issues));
        }

        tracing::info!(
            resident = %params.resident_name,
            confirm = params.confirm,
            "log_observation called"
        );

        let window = self.settings.duplicate_window_minutes;
        let (outcome, params) = with_db(&self.db, move |conn| {
            let outcome = log_observation::run(conn, &params, window)?;
            Ok((outcome, params))
        })
        .await
        .map_err(|e| format!("log_observation failed: {e}"))?;

        Ok(outcome.text(&params, window))
    }

    /// Fetch recent observations for a resident.
    #[tool(description = "Fetch recent observations for a resident. Use this before summarizing last N days.")]
    async fn query_observations(
        &self,
        Parameters(params): Parameters<QueryObservationsParams>,
    ) -> Result<String, String> {
        let issues = params.validate();
        if !issues.is_empty() {
            return Err(validate::describe(&issues));
        }

        tracing::info!(
            resident = %params.resident_name,
            since_days = ?params.since_days,
            "query_observations called"
        );

        let default_days = self.settings.default_since_days;
        with_db(&self.db, move |conn| {
            query_observations::run(conn, &params, default_days)
        })
        .await
        .map_err(|e| format!("query_observations failed: {e}"))
    }
}

#[tool_handler]
impl ServerHandler for CarelogTools {
    fn get_info(&self) -> rmcp::model::ServerInfo {
        rmcp::model::ServerInfo {
            instructions: Some(
                "carelog records resident observations. Use log_observation to save a note \
                 (confirm first) and query_observations to read recent notes."
                    .into(),
            ),
            capabilities: rmcp::model::ServerCapabilities::builder()
                .enable_tools()
                .build(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn tools() -> CarelogTools {
        let conn = crate::db::open_memory_database().unwrap();
        CarelogTools::new(Arc::new(Mutex::new(conn)), Arc::new(ToolsConfig::default()))
    }

    fn log_params(confirm: bool) -> LogObservationParams {
        LogObservationParams {
            resident_name: "Margaret".into(),
            note: "Ate all of lunch".into(),
            confirm,
        }
    }

    #[tokio::test]
    async fn log_observation_confirm_gate_then_save_then_duplicate() {
        let tools = tools();

        let pending = tools.log_observation(Parameters(log_params(false))).await.unwrap();
        assert_eq!(
            pending,
            "About to save: \"Ate all of lunch\" for Margaret. Call again with {\"confirm\": true} to proceed."
        );

        let saved = tools.log_observation(Parameters(log_params(true))).await.unwrap();
        assert!(saved.starts_with("Saved. observation_id="));

        let dup = tools.log_observation(Parameters(log_params(true))).await.unwrap();
        assert_eq!(dup, "Skipped: recent duplicate note detected (last 10 minutes).");

        let rows = tools
            .query_observations(Parameters(QueryObservationsParams {
                resident_name: "Margaret".into(),
                since_days: None,
            }))
            .await
            .unwrap();
        assert!(rows.contains("\"note\": \"Ate all of lunch\""));
    }

    #[tokio::test]
    async fn empty_resident_name_is_rejected() {
        let tools = tools();

        let err = tools
            .log_observation(Parameters(LogObservationParams {
                resident_name: String::new(),
                note: "x".into(),
                confirm: true,
            }))
            .await
            .unwrap_err();
        assert_eq!(err, "resident_name: must contain at least 1 character");

        let err = tools
            .query_observations(Parameters(QueryObservationsParams {
                resident_name: String::new(),
                since_days: None,
            }))
            .await
            .unwrap_err();
        assert_eq!(err, "resident_name: must contain at least 1 character");
    }

    #[tokio::test]
    async fn query_without_notes_says_so() {
        let text = tools()
            .query_observations(Parameters(QueryObservationsParams {
                resident_name: "Harold".into(),
                since_days: Some(3),
            }))
            .await
            .unwrap();
        assert_eq!(text, "No notes for Harold in last 3 days.");
    }
}
