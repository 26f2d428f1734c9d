//! `log_observation`: confirm-gated, duplicate-guarded note insert.

use anyhow::Result;
use rusqlite::Connection;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::validate::{non_empty, Issue, Validate};
use crate::residents::{dedup, store};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct LogObservationParams {
    #[schemars(description = "Name of the resident", length(min = 1))]
    pub resident_name: String,

    #[schemars(description = "Observation note to log", length(min = 1))]
    pub note: String,

    #[serde(default)]
    #[schemars(description = "Set to true to actually save the observation")]
    pub confirm: bool,
}

impl Validate for LogObservationParams {
    fn validate(&self) -> Vec<Issue> {
        let mut issues = Vec::new();
        non_empty("resident_name", &self.resident_name, &mut issues);
        non_empty("note", &self.note, &mut issues);
        issues
    }
}

/// Outcome of a `log_observation` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogOutcome {
    NeedsConfirmation,
    Duplicate,
    Saved(i64),
}

impl LogOutcome {
    pub fn text(&self, params: &LogObservationParams, window_minutes: u32) -> String {
        match self {
            Self::NeedsConfirmation => format!(
                "About to save: \"{}\" for {}. Call again with {{\"confirm\": true}} to proceed.",
                params.note, params.resident_name
            ),
            Self::Duplicate => format!(
                "Skipped: recent duplicate note detected (last {window_minutes} minutes)."
            ),
            Self::Saved(id) => format!("Saved. observation_id={id}"),
        }
    }
}

/// Run the tool. `window_minutes == 0` disables the duplicate guard.
///
/// A failing duplicate check is logged and the insert goes ahead.
pub fn run(
    conn: &mut Connection,
    params: &LogObservationParams,
    window_minutes: u32,
) -> Result<LogOutcome> {
    if !params.confirm {
        tracing::info!(resident = %params.resident_name, "log_observation awaiting confirmation");
        return Ok(LogOutcome::NeedsConfirmation);
    }

    if window_minutes > 0 {
        match dedup::is_recent_duplicate(conn, &params.resident_name, &params.note, window_minutes) {
            Ok(true) => {
                tracing::info!(resident = %params.resident_name, "skipped duplicate observation");
                return Ok(LogOutcome::Duplicate);
            }
            Ok(false) => {}
            Err(e) => tracing::warn!(error = %e, "duplicate check failed, continuing"),
        }
    }

    let id = store::log_observation(conn, &params.resident_name, &params.note)?;
    Ok(LogOutcome::Saved(id))
}
