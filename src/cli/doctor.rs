//! CLI `doctor` command: database diagnostics and a summary of the HTTP setup.

use anyhow::{Context, Result};

use carelog::config::CarelogConfig;
use carelog::db;

/// Run database diagnostics and print a health report.
pub fn doctor(config: &CarelogConfig) -> Result<()> {
    let db_path = config.resolved_db_path();

    if !db_path.exists() {
        println!("Database: not found at {}", db_path.display());
        println!("Run `carelog serve` or `carelog log` to initialize.");
        return Ok(());
    }

    let file_size = std::fs::metadata(&db_path).map(|m| m.len()).unwrap_or(0);

    let conn = db::open_database(&db_path).context("failed to open database (may be corrupt)")?;
    let report = db::check_database_health(&conn).context("failed to run health check")?;

    println!("carelog Health Report");
    println!("=====================");
    println!();
    println!("Database:          {}", db_path.display());
    println!("File size:         {}", format_bytes(file_size));
    println!("Schema version:    {}", report.schema_version);
    println!();
    println!("Row counts:");
    println!("  Residents:       {}", report.resident_count);
    println!("  Observations:    {}", report.observation_count);
    println!();
    if report.integrity_ok {
        println!("Integrity check:   PASSED");
    } else {
        println!("Integrity check:   FAILED ({})", report.integrity_details);
    }
    println!();
    println!("HTTP bind:         {}", config.bind_addr());
    println!("Google OAuth:      {}", configured(!config.google.client_id.is_empty()));
    println!("Session secret:    {}", configured(!config.session.secret.is_empty()));

    if !report.integrity_ok {
        println!();
        println!("Recovery: restore the database file from a backup, or move it aside");
        println!("and let `carelog serve` create a fresh one.");
    }

    Ok(())
}

fn configured(ok: bool) -> &'static str {
    if ok {
        "configured"
    } else {
        "NOT SET"
    }
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
