//! Time-windowed reads over the `v_observations` view.

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use rusqlite::{params, Connection};

use super::timestamp;
use super::types::ObservationView;

/// Observations for `resident_name` from the last `since_days` days, newest first.
pub fn query_observations(
    conn: &Connection,
    resident_name: &str,
    since_days: u32,
) -> Result<Vec<ObservationView>> {
    query_observations_at(conn, resident_name, since_days, Utc::now())
}

/// [`query_observations`] relative to an explicit `now`.
pub fn query_observations_at(
    conn: &Connection,
    resident_name: &str,
    since_days: u32,
    now: DateTime<Utc>,
) -> Result<Vec<ObservationView>> {
    let cutoff = timestamp(now - Duration::days(i64::from(since_days)));

    let mut stmt = conn.prepare(
        "SELECT id, resident_id, resident_name, note, created_at FROM v_observations \
         WHERE resident_name = ?1 AND created_at >= ?2 \
         ORDER BY created_at DESC, id DESC",
    )?;

    let rows = stmt
        .query_map(params![resident_name, cutoff], |row| {
            Ok(ObservationView {
                id: row.get(0)?,
                resident_id: row.get(1)?,
                resident_name: row.get(2)?,
                note: row.get(3)?,
                created_at: row.get(4)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!(resident = %resident_name, since_days, rows = rows.len(), "queried observations");
    Ok(rows)
}
