use anyhow::Result;

use carelog::config::CarelogConfig;
use carelog::tools::log_observation::{self, LogObservationParams};
use carelog::tools::validate::{describe, Validate};

/// Save an observation from the terminal. Running the command is the
/// confirmation, but the duplicate guard still applies.
pub fn log(config: &CarelogConfig, resident_name: &str, note: &str) -> Result<()> {
    let params = LogObservationParams {
        resident_name: resident_name.to_string(),
        note: note.to_string(),
        confirm: true,
    };
    let issues = params.validate();
    anyhow::ensure!(issues.is_empty(), "{}", describe(&issues));

    let mut conn = carelog::db::open_database(config.resolved_db_path())?;
    let window = config.tools.duplicate_window_minutes;
    let outcome = log_observation::run(&mut conn, &params, window)?;

    println!("{}", outcome.text(&params, window));
    Ok(())
}
