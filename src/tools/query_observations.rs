//! `query_observations`: recent notes for one resident.

use anyhow::Result;
use rusqlite::Connection;
use schemars::JsonSchema;
use serde::{de, Deserialize, Deserializer, Serialize};

use super::validate::{non_empty, Issue, Validate};
use crate::residents::query;

pub const MAX_SINCE_DAYS: i64 = 365;

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct QueryObservationsParams {
    #[schemars(description = "Name of the resident to query", length(min = 1))]
    pub resident_name: String,

    #[schemars(
        description = "Number of days to look back (1-365, default 7)",
        range(min = 1, max = 365)
    )]
    #[serde(default, deserialize_with = "integral")]
    #[schemars(with = "Option<i64>")]
    pub since_days: Option<i64>,
}

/// Accept whole-valued floats such as `7.0`, which JSON clients often send
/// for integers.
fn integral<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(number) = Option::<serde_json::Number>::deserialize(deserializer)? else {
        return Ok(None);
    };
    if let Some(n) = number.as_i64() {
        return Ok(Some(n));
    }
    match number.as_f64() {
        Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 => {
            Ok(Some(f as i64))
        }
        _ => Err(de::Error::custom(format!("expected an integer, got {number}"))),
    }
}

impl Validate for QueryObservationsParams {
    fn validate(&self) -> Vec<Issue> {
        let mut issues = Vec::new();
        non_empty("resident_name", &self.resident_name, &mut issues);
        if let Some(days) = self.since_days {
            if !(1..=MAX_SINCE_DAYS).contains(&days) {
                issues.push(Issue::new(
                    "since_days",
                    format!("must be between 1 and {MAX_SINCE_DAYS}"),
                ));
            }
        }
        issues
    }
}

/// Run the tool and render its text reply: a "no notes" sentence, or the rows
/// as a pretty-printed JSON array.
pub fn run(
    conn: &Connection,
    params: &QueryObservationsParams,
    default_since_days: u32,
) -> Result<String> {
    let since_days = params
        .since_days
        .and_then(|d| u32::try_from(d).ok())
        .unwrap_or(default_since_days);

    let rows = query::query_observations(conn, &params.resident_name, since_days)?;
    if rows.is_empty() {
        return Ok(format!(
            "No notes for {} in last {} days.",
            params.resident_name, since_days
        ));
    }
    Ok(serde_json::to_string_pretty(&rows)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::residents::store::log_observation;

    #[test]
    fn empty_result_sentence() {
        let conn = db::open_memory_database().unwrap();
        let params = QueryObservationsParams {
            resident_name: "Harold".into(),
            since_days: None,
        };
        assert_eq!(
            run(&conn, &params, 7).unwrap(),
            "No notes for Harold in last 7 days."
        );
    }

    #[test]
    fn rows_render_as_json_array() {
        let mut conn = db::open_memory_database().unwrap();
        log_observation(&mut conn, "Harold", "Played chess").unwrap();

        let params = QueryObservationsParams {
            resident_name: "Harold".into(),
            since_days: Some(3),
        };
        let text = run(&conn, &params, 7).unwrap();
        let rows: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(rows[0]["note"], "Played chess");
        assert_eq!(rows[0]["resident_name"], "Harold");
        assert!(text.contains("\n  "), "expected pretty-printed output");
    }

    #[test]
    fn since_days_accepts_whole_floats_only() {
        let parsed: QueryObservationsParams =
            serde_json::from_value(serde_json::json!({"resident_name": "Harold", "since_days": 7.0}))
                .unwrap();
        assert_eq!(parsed.since_days, Some(7));

        let parsed: QueryObservationsParams =
            serde_json::from_value(serde_json::json!({"resident_name": "Harold"})).unwrap();
        assert_eq!(parsed.since_days, None);

        let fractional = serde_json::from_value::<QueryObservationsParams>(
            serde_json::json!({"resident_name": "Harold", "since_days": 2.5}),
        );
        assert!(fractional.is_err());
    }

    #[test]
    fn since_days_out_of_range_fails_validation() {
        for days in [0, -1, 366] {
            let params = QueryObservationsParams {
                resident_name: "Harold".into(),
                since_days: Some(days),
            };
            assert_eq!(params.validate().len(), 1, "days={days}");
        }
    }
}
