use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Entry kind in the payment ledger
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentKind {
    Payment,
    Correction,
}

/// Append-only payment ledger entry.
///
/// Entries are never edited; a mistaken amount is corrected by appending a
/// sign-adjusted `Correction` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub amount: i64,
    pub kind: PaymentKind,
    pub recorded_at: DateTime<Utc>,
}

impl Payment {
    pub fn new(booking_id: Uuid, amount: i64, kind: PaymentKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            booking_id,
            amount,
            kind,
            recorded_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VendorCostStatus {
    Pending,
    Paid,
}

/// Departure-scoped cost entry written by the external cost-entry workflow.
/// Read-only input to the financial aggregator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VendorCost {
    pub id: Uuid,
    pub departure_id: Uuid,
    pub label: String,
    pub amount: i64,
    pub status: VendorCostStatus,
    pub recorded_at: DateTime<Utc>,
}

impl VendorCost {
    pub fn new(departure_id: Uuid, label: String, amount: i64, status: VendorCostStatus) -> Self {
        Self {
            id: Uuid::new_v4(),
            departure_id,
            label,
            amount,
            status,
            recorded_at: Utc::now(),
        }
    }
}

/// External customer directory entry; referenced by id, never mutated here
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: Uuid,
    pub display_name: String,
}
