//! Base (version 1) schema: residents, their observations and the joined
//! `v_observations` read model.

use rusqlite::Connection;

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS residents (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS observations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    resident_id INTEGER NOT NULL REFERENCES residents(id) ON DELETE CASCADE,
    note TEXT NOT NULL CHECK(length(note) > 0),
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_observations_resident ON observations(resident_id);
CREATE INDEX IF NOT EXISTS idx_observations_created ON observations(created_at);

-- Flattened read model used by the query tools
CREATE VIEW IF NOT EXISTS v_observations AS
SELECT
    o.id AS id,
    o.resident_id AS resident_id,
    r.name AS resident_name,
    o.note AS note,
    o.created_at AS created_at
FROM observations o
JOIN residents r ON r.id = o.resident_id;

CREATE TABLE IF NOT EXISTS schema_meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;

/// Create the base schema. Safe to call on an existing database.
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;
    conn.execute(
        "INSERT OR IGNORE INTO schema_meta (key, value) VALUES ('schema_version', '1')",
        [],
    )?;

    Ok(())
}
