//! Nested listing of every resident with their observations.

use anyhow::Result;
use rusqlite::{params, Connection};

use super::types::{ObservationRow, ResidentRow, ResidentWithObservations};

/// All residents ordered by name, each with observations newest first.
///
/// `limit_per_resident` caps the nested list when it is `Some(n)` with `n > 0`.
pub fn list_residents_with_observations(
    conn: &Connection,
    limit_per_resident: Option<usize>,
) -> Result<Vec<ResidentWithObservations>> {
    // SQLite treats a negative LIMIT as "no limit"
    let limit: i64 = match limit_per_resident {
        Some(n) if n > 0 => i64::try_from(n).unwrap_or(i64::MAX),
        _ => -1,
    };

    let mut residents_stmt = conn.prepare("SELECT id, name FROM residents ORDER BY name ASC")?;
    let residents = residents_stmt
        .query_map([], |row| {
            Ok(ResidentRow {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let mut obs_stmt = conn.prepare(
        "SELECT id, note, created_at FROM observations \
         WHERE resident_id = ?1 ORDER BY created_at DESC, id DESC LIMIT ?2",
    )?;

    let mut out = Vec::with_capacity(residents.len());
    for resident in residents {
        let observations = obs_stmt
            .query_map(params![resident.id, limit], |row| {
                Ok(ObservationRow {
                    id: row.get(0)?,
                    note: row.get(1)?,
                    created_at: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        out.push(ResidentWithObservations {
            resident,
            observations,
        });
    }

    Ok(out)
}
