//! Naive duplicate-note guard: same resident, byte-identical note, inside a
//! time window.

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use super::timestamp;

/// True when `note` was already logged for `resident_name` within the last `minutes`.
pub fn is_recent_duplicate(
    conn: &Connection,
    resident_name: &str,
    note: &str,
    minutes: u32,
) -> Result<bool> {
    is_recent_duplicate_at(conn, resident_name, note, minutes, Utc::now())
}

/// [`is_recent_duplicate`] relative to an explicit `now`.
pub fn is_recent_duplicate_at(
    conn: &Connection,
    resident_name: &str,
    note: &str,
    minutes: u32,
    now: DateTime<Utc>,
) -> Result<bool> {
    let cutoff = timestamp(now - Duration::minutes(i64::from(minutes)));

    let hit: Option<i64> = conn
        .query_row(
            "SELECT id FROM v_observations \
             WHERE resident_name = ?1 AND note = ?2 AND created_at >= ?3 LIMIT 1",
            params![resident_name, note, cutoff],
            |row| row.get(0),
        )
        .optional()?;

    Ok(hit.is_some())
}
