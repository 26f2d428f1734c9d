//! Write path: resident upsert and observation insert.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use super::timestamp;

/// Return the id of the resident called `name`, creating the row if needed.
pub fn ensure_resident(conn: &Connection, name: &str) -> Result<i64> {
    ensure_resident_at(conn, name, Utc::now())
}

fn ensure_resident_at(conn: &Connection, name: &str, at: DateTime<Utc>) -> Result<i64> {
    let inserted = conn.execute(
        "INSERT OR IGNORE INTO residents (name, created_at) VALUES (?1, ?2)",
        params![name, timestamp(at)],
    )?;
    if inserted > 0 {
        tracing::debug!(resident = %name, "created resident");
    }

    let id = conn
        .query_row(
            "SELECT id FROM residents WHERE name = ?1",
            params![name],
            |row| row.get(0),
        )
        .with_context(|| format!("resident lookup failed for {name}"))?;
    Ok(id)
}

/// Insert an observation for `resident_name`, creating the resident on first
/// use. Returns the new observation id.
pub fn log_observation(conn: &mut Connection, resident_name: &str, note: &str) -> Result<i64> {
    log_observation_at(conn, resident_name, note, Utc::now())
}

/// [`log_observation`] with an explicit timestamp.
pub fn log_observation_at(
    conn: &mut Connection,
    resident_name: &str,
    note: &str,
    at: DateTime<Utc>,
) -> Result<i64> {
    let tx = conn.transaction()?;

    let resident_id = ensure_resident_at(&tx, resident_name, at)?;
    tx.execute(
        "INSERT INTO observations (resident_id, note, created_at) VALUES (?1, ?2, ?3)",
        params![resident_id, note, timestamp(at)],
    )
    .context("failed to insert observation")?;
    let id = tx.last_insert_rowid();

    tx.commit()?;

    tracing::info!(resident = %resident_name, observation_id = id, "observation logged");
    Ok(id)
}
