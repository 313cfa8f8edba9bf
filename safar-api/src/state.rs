use std::sync::Arc;

use safar_booking::{FinancialAggregator, ReservationManager};
use safar_core::{DepartureRepository, VendorCostRepository};
use safar_ledger::{PaymentLedger, QuotaLedger};
use safar_store::memory::{
    InMemoryBookingRepository, InMemoryCustomerDirectory, InMemoryDepartureRepository,
    InMemoryVendorCostRepository,
};

#[derive(Clone)]
pub struct AppState {
    pub manager: Arc<ReservationManager>,
    pub finance: Arc<FinancialAggregator>,
    pub quota: Arc<QuotaLedger>,
    pub payments: Arc<PaymentLedger>,
    pub departures: Arc<dyn DepartureRepository>,
    pub costs: Arc<dyn VendorCostRepository>,
    pub customers: Arc<InMemoryCustomerDirectory>,
}

impl AppState {
    /// Wire the engine over in-memory stores
    pub fn in_memory(max_reserve_retries: u32) -> Self {
        let quota = Arc::new(QuotaLedger::with_max_retries(max_reserve_retries));
        let payments = Arc::new(PaymentLedger::new());
        let bookings = Arc::new(InMemoryBookingRepository::new());
        let departures = Arc::new(InMemoryDepartureRepository::new());
        let costs = Arc::new(InMemoryVendorCostRepository::new());
        let customers = Arc::new(InMemoryCustomerDirectory::new());

        let manager = Arc::new(ReservationManager::new(
            Arc::clone(&quota),
            Arc::clone(&payments),
            bookings.clone(),
            departures.clone(),
            customers.clone(),
        ));
        let finance = Arc::new(FinancialAggregator::new(bookings.clone(), costs.clone()));

        Self {
            manager,
            finance,
            quota,
            payments,
            departures,
            costs,
            customers,
        }
    }
}
