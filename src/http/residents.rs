use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use super::{ApiError, AppState};
use crate::db::with_db;
use crate::residents::overview::list_residents_with_observations;
use crate::residents::types::ResidentWithObservations;

#[derive(Debug, Deserialize)]
pub struct OverviewQuery {
    limit: Option<usize>,
}

/// `GET /api/residents`: every resident with nested observations.
pub async fn overview(
    State(state): State<AppState>,
    Query(query): Query<OverviewQuery>,
) -> Result<Json<Vec<ResidentWithObservations>>, ApiError> {
    let rows = with_db(&state.db, move |conn| {
        list_residents_with_observations(conn, query.limit)
    })
    .await?;
    Ok(Json(rows))
}
