use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use safar_domain::{Departure, VendorCost, VendorCostStatus};
use safar_ledger::QuotaSnapshot;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterDepartureRequest {
    /// Id assigned by the external departure schedule
    pub id: Uuid,
    pub name: String,
    pub quota: u32,
    pub departs_on: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct DepartureResponse {
    pub departure: Departure,
    pub seats: QuotaSnapshot,
}

#[derive(Debug, Deserialize)]
pub struct VendorCostRequest {
    pub label: String,
    pub amount: i64,
    pub status: VendorCostStatus,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/departures", post(register_departure))
        .route("/v1/departures/{id}", get(get_departure))
        .route("/v1/departures/{id}/costs", post(add_vendor_cost))
}

/// Mirror an externally created departure and seed its quota counter
async fn register_departure(
    State(state): State<AppState>,
    Json(req): Json<RegisterDepartureRequest>,
) -> Result<Json<DepartureResponse>, AppError> {
    let departure = Departure::new(req.id, req.name, req.quota, req.departs_on);
    state
        .departures
        .insert(&departure)
        .await
        .map_err(AppError::store)?;
    state.quota.register_departure(req.id, req.quota);

    info!(departure_id = %req.id, quota = req.quota, "departure registered");

    let seats = state.quota.snapshot(req.id)?;
    Ok(Json(DepartureResponse { departure, seats }))
}

async fn get_departure(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DepartureResponse>, AppError> {
    let departure = state
        .departures
        .get(id)
        .await
        .map_err(AppError::store)?
        .ok_or_else(|| AppError::NotFound(format!("Departure not found: {}", id)))?;
    let seats = state.quota.snapshot(id)?;

    Ok(Json(DepartureResponse { departure, seats }))
}

/// Entry point for the external cost-entry workflow
async fn add_vendor_cost(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<VendorCostRequest>,
) -> Result<Json<VendorCost>, AppError> {
    if req.amount < 0 {
        return Err(AppError::Validation {
            code: "INVALID_COST",
            message: format!("Vendor cost amount must be non-negative, got {}", req.amount),
        });
    }

    state
        .departures
        .get(id)
        .await
        .map_err(AppError::store)?
        .ok_or_else(|| AppError::NotFound(format!("Departure not found: {}", id)))?;

    let cost = VendorCost::new(id, req.label, req.amount, req.status);
    state.costs.add(&cost).await.map_err(AppError::store)?;

    info!(departure_id = %id, amount = cost.amount, "vendor cost recorded");
    Ok(Json(cost))
}
