//! Row types returned by the resident queries.

use serde::{Deserialize, Serialize};

/// A row of the `residents` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResidentRow {
    pub id: i64,
    pub name: String,
}

/// An observation as nested under its resident.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservationRow {
    pub id: i64,
    pub note: String,
    /// RFC 3339 UTC timestamp.
    pub created_at: String,
}

/// A row of the `v_observations` view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservationView {
    pub id: i64,
    pub resident_id: i64,
    pub resident_name: String,
    pub note: String,
    pub created_at: String,
}

/// A resident with its observations, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResidentWithObservations {
    #[serde(flatten)]
    pub resident: ResidentRow,
    pub observations: Vec<ObservationRow>,
}
