//! Versioned schema upgrades.
//!
//! `schema_meta.schema_version` records the last applied step. Steps only move
//! forward, one transaction per step.

use rusqlite::{params, Connection, OptionalExtension};

/// Version a freshly initialised database starts at.
const BASE_VERSION: u32 = 1;

/// `(target version, DDL)` in ascending order.
const STEPS: &[(u32, &str)] = &[(
    2,
    "CREATE INDEX IF NOT EXISTS idx_observations_resident_created \
     ON observations(resident_id, created_at);",
)];

pub const CURRENT_SCHEMA_VERSION: u32 = 2;

/// Version recorded in `schema_meta`. A missing or unreadable value counts
/// as the base version.
pub fn get_schema_version(conn: &Connection) -> rusqlite::Result<u32> {
    let raw: Option<String> = conn
        .query_row(
            "SELECT value FROM schema_meta WHERE key = 'schema_version'",
            [],
            |row| row.get(0),
        )
        .optional()?;
    Ok(raw
        .and_then(|v| v.parse().ok())
        .unwrap_or(BASE_VERSION))
}

/// Apply every step newer than the recorded version.
pub fn run_migrations(conn: &mut Connection) -> rusqlite::Result<()> {
    let current = get_schema_version(conn)?;

    for &(target, ddl) in STEPS.iter().filter(|(target, _)| *target > current) {
        tracing::info!(from = target - 1, to = target, "applying schema migration");
        let tx = conn.transaction()?;
        tx.execute_batch(ddl)?;
        tx.execute(
            "INSERT INTO schema_meta (key, value) VALUES ('schema_version', ?1) \
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![target.to_string()],
        )?;
        tx.commit()?;
    }

    Ok(())
}
