use anyhow::Result;

use carelog::config::CarelogConfig;
use carelog::residents::overview;

/// Print every resident with their observations, newest first.
pub fn residents(config: &CarelogConfig, limit: Option<usize>) -> Result<()> {
    let conn = carelog::db::open_database(config.resolved_db_path())?;
    let residents = overview::list_residents_with_observations(&conn, limit)?;

    if residents.is_empty() {
        println!("No residents yet.");
        return Ok(());
    }

    for resident in &residents {
        println!("{} (#{})", resident.resident.name, resident.resident.id);
        if resident.observations.is_empty() {
            println!("  (no observations)");
        }
        for obs in &resident.observations {
            println!("  [{}] {}  {}", obs.id, obs.created_at, obs.note);
        }
        println!();
    }

    Ok(())
}
