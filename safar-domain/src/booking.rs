use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::room::PaxCounts;

/// Booking status in the lifecycle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Draft,
    PendingPayment,
    Confirmed,
    Completed,
    Cancelled,
}

impl BookingStatus {
    /// Terminal states accept no further lifecycle transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, BookingStatus::Completed | BookingStatus::Cancelled)
    }
}

/// A customer's reservation against one departure.
///
/// `Draft` exists only while a request is being validated; a booking is
/// constructed (and persisted) once its seats are reserved, so it starts in
/// `PendingPayment`. `total_price` is computed once at creation and never
/// changes; `paid_amount` is a cache of the payment ledger's running sum.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub departure_id: Uuid,
    pub customer_id: Uuid,
    pub pax: PaxCounts,
    pub total_price: i64,
    pub paid_amount: i64,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    pub fn new(
        id: Uuid,
        departure_id: Uuid,
        customer_id: Uuid,
        pax: PaxCounts,
        total_price: i64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            departure_id,
            customer_id,
            pax,
            total_price,
            paid_amount: 0,
            status: BookingStatus::PendingPayment,
            created_at: now,
            updated_at: now,
        }
    }

    /// Seats this booking holds against the departure quota
    pub fn seats(&self) -> u32 {
        self.pax.total()
    }

    pub fn update_status(&mut self, new_status: BookingStatus) {
        self.status = new_status;
        self.updated_at = Utc::now();
    }

    pub fn apply_payment(&mut self, paid_amount: i64) {
        self.paid_amount = paid_amount;
        self.updated_at = Utc::now();
    }
}
