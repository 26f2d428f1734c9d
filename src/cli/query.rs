use anyhow::Result;

use carelog::config::CarelogConfig;
use carelog::residents::query;

/// Print a resident's observations from the last `since_days` days.
pub fn query(config: &CarelogConfig, resident_name: &str, since_days: Option<u32>) -> Result<()> {
    let since_days = since_days.unwrap_or(config.tools.default_since_days);
    anyhow::ensure!(
        (1..=365).contains(&since_days),
        "--since-days must be between 1 and 365"
    );

    let conn = carelog::db::open_database(config.resolved_db_path())?;
    let rows = query::query_observations(&conn, resident_name, since_days)?;

    if rows.is_empty() {
        println!("No notes for {resident_name} in last {since_days} days.");
        return Ok(());
    }

    println!("{} note(s) for {resident_name} in last {since_days} days\n", rows.len());
    for row in &rows {
        println!("  [{}] {}", row.id, row.created_at);
        println!("      {}", row.note);
    }

    Ok(())
}
