use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use safar_booking::DeparturePl;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/departures/{id}/pl", get(get_departure_pl))
}

/// GET /v1/departures/{id}/pl — derived P&L for dashboards and exports
async fn get_departure_pl(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeparturePl>, AppError> {
    state
        .departures
        .get(id)
        .await
        .map_err(AppError::store)?
        .ok_or_else(|| AppError::NotFound(format!("Departure not found: {}", id)))?;

    let report = state.finance.compute_departure_pl(id).await?;
    Ok(Json(report))
}
