use std::sync::Arc;

use safar_core::{BookingRepository, VendorCostRepository};
use safar_domain::BookingStatus;
use serde::Serialize;
use uuid::Uuid;

use crate::manager::{store_err, BookingError};

/// Profit & loss figures for one departure, derived at read time
#[derive(Debug, Clone, Serialize)]
pub struct DeparturePl {
    pub departure_id: Uuid,
    pub revenue: i64,
    pub collected: i64,
    pub outstanding: i64,
    pub cost: i64,
    pub profit: i64,
    pub margin: f64,
    pub booking_count: usize,
    pub cancelled_count: usize,
}

/// Derives per-departure revenue, collections and profit from the booking
/// and vendor-cost ledgers on demand.
///
/// Holds no state of its own and never writes back: a figure computed here
/// cannot drift from the ledgers it was read from, which is the point —
/// cancelling a booking or editing a cost can never leave a stale cached
/// profit behind.
pub struct FinancialAggregator {
    bookings: Arc<dyn BookingRepository>,
    costs: Arc<dyn VendorCostRepository>,
}

impl FinancialAggregator {
    pub fn new(bookings: Arc<dyn BookingRepository>, costs: Arc<dyn VendorCostRepository>) -> Self {
        Self { bookings, costs }
    }

    pub async fn compute_departure_pl(
        &self,
        departure_id: Uuid,
    ) -> Result<DeparturePl, BookingError> {
        let bookings = self
            .bookings
            .list_for_departure(departure_id)
            .await
            .map_err(store_err)?;

        let mut revenue: i64 = 0;
        let mut collected: i64 = 0;
        let mut cancelled_count = 0usize;
        for booking in &bookings {
            if booking.status == BookingStatus::Cancelled {
                cancelled_count += 1;
                continue;
            }
            revenue += booking.total_price;
            collected += booking.paid_amount;
        }

        let costs = self
            .costs
            .list_for_departure(departure_id)
            .await
            .map_err(store_err)?;
        let cost: i64 = costs.iter().map(|entry| entry.amount).sum();

        let profit = revenue - cost;
        let margin = if revenue == 0 {
            0.0
        } else {
            profit as f64 / revenue as f64
        };

        Ok(DeparturePl {
            departure_id,
            revenue,
            collected,
            outstanding: revenue - collected,
            cost,
            profit,
            margin,
            booking_count: bookings.len() - cancelled_count,
            cancelled_count,
        })
    }
}
