//! Resident and observation data access.
//!
//! Every write and time-window read goes through this module. Timestamps are
//! stored as RFC 3339 UTC strings with millisecond precision so that text
//! comparison in SQL matches chronological order.

pub mod dedup;
pub mod overview;
pub mod query;
pub mod store;
pub mod types;

use chrono::{DateTime, SecondsFormat, Utc};

/// Canonical storage format for `created_at` columns.
pub fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}
