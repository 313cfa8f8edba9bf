use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use safar_domain::{Booking, Payment, PaxCounts, PriceTable};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub departure_id: Uuid,
    pub customer_id: Uuid,
    pub pax: PaxCounts,
    pub price_table: PriceTable,
}

#[derive(Debug, Serialize)]
pub struct BookingResponse {
    pub booking: Booking,
    /// Ordered room lines for the confirmation display
    pub allocation_summary: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct RecordPaymentRequest {
    pub amount: i64,
    /// Sign-adjusted correction entry instead of an ordinary payment
    #[serde(default)]
    pub correction: bool,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/bookings", post(create_booking))
        .route("/v1/bookings/{id}", get(get_booking))
        .route("/v1/bookings/{id}/cancel", post(cancel_booking))
        .route("/v1/bookings/{id}/complete", post(complete_booking))
        .route(
            "/v1/bookings/{id}/payments",
            post(record_payment).get(list_payments),
        )
}

async fn create_booking(
    State(state): State<AppState>,
    Json(req): Json<CreateBookingRequest>,
) -> Result<Json<BookingResponse>, AppError> {
    let booking = state
        .manager
        .create_booking(req.departure_id, req.customer_id, req.pax, &req.price_table)
        .await?;
    let allocation_summary = state.manager.allocation_summary(booking.id).await?;

    Ok(Json(BookingResponse {
        booking,
        allocation_summary,
    }))
}

async fn get_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingResponse>, AppError> {
    let booking = state.manager.get_booking(id).await?;
    let allocation_summary = state.manager.allocation_summary(id).await?;

    Ok(Json(BookingResponse {
        booking,
        allocation_summary,
    }))
}

async fn cancel_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Booking>, AppError> {
    let booking = state.manager.cancel_booking(id).await?;
    Ok(Json(booking))
}

/// Externally driven: the departure has occurred
async fn complete_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Booking>, AppError> {
    let booking = state.manager.complete_booking(id).await?;
    Ok(Json(booking))
}

async fn record_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<RecordPaymentRequest>,
) -> Result<Json<Booking>, AppError> {
    let booking = if req.correction {
        state.manager.record_correction(id, req.amount).await?
    } else {
        state.manager.record_payment(id, req.amount).await?
    };
    Ok(Json(booking))
}

async fn list_payments(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Payment>>, AppError> {
    // 404 for unknown bookings rather than an empty ledger
    state.manager.get_booking(id).await?;
    Ok(Json(state.payments.entries(id)))
}
