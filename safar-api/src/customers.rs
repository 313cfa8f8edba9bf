use axum::{extract::State, routing::post, Json, Router};
use safar_domain::Customer;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MirrorCustomerRequest {
    /// Id assigned by the external customer directory
    pub id: Uuid,
    pub display_name: String,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/customers", post(mirror_customer))
}

/// Mirror a customer directory entry so bookings can reference it
async fn mirror_customer(
    State(state): State<AppState>,
    Json(req): Json<MirrorCustomerRequest>,
) -> Result<Json<Customer>, AppError> {
    let customer = Customer {
        id: req.id,
        display_name: req.display_name,
    };
    state.customers.upsert(customer.clone());

    info!(customer_id = %req.id, "customer directory entry mirrored");
    Ok(Json(customer))
}
