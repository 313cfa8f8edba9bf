use std::sync::Arc;

use safar_core::{BookingRepository, CustomerDirectory, DepartureRepository};
use safar_domain::{Booking, BookingStatus, DepartureStatus, PaxCounts, PriceTable};
use safar_ledger::{PaymentError, PaymentLedger, QuotaError, QuotaLedger};
use safar_rooming::{plan_rooms, price_total, RoomingError};
use tracing::{error, info};
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("Booking not found: {0}")]
    NotFound(Uuid),

    #[error("Departure not found: {0}")]
    UnknownDeparture(Uuid),

    #[error("Customer not found: {0}")]
    UnknownCustomer(Uuid),

    #[error("Departure {0} is closed for sale")]
    DepartureClosed(Uuid),

    #[error("Booking {0} is cancelled and cannot accept payments")]
    BookingCancelled(Uuid),

    #[error("Invalid state transition from {from:?} to {to:?}")]
    InvalidTransition {
        from: BookingStatus,
        to: BookingStatus,
    },

    #[error(transparent)]
    Rooming(#[from] RoomingError),

    #[error(transparent)]
    Quota(#[from] QuotaError),

    #[error(transparent)]
    Payment(#[from] PaymentError),

    #[error("Storage error: {0}")]
    Store(String),
}

pub(crate) fn store_err(err: Box<dyn std::error::Error + Send + Sync>) -> BookingError {
    BookingError::Store(err.to_string())
}

/// Orchestrates the quota ledger, the room calculators and the payment
/// ledger into all-or-nothing booking operations.
///
/// Lifecycle per booking: `Draft → PendingPayment → Confirmed → Completed`,
/// with `Cancelled` reachable from any non-terminal state. `Draft` exists
/// only during validation here; nothing is persisted before the seats are
/// reserved.
pub struct ReservationManager {
    quota: Arc<QuotaLedger>,
    payments: Arc<PaymentLedger>,
    bookings: Arc<dyn BookingRepository>,
    departures: Arc<dyn DepartureRepository>,
    customers: Arc<dyn CustomerDirectory>,
}

impl ReservationManager {
    pub fn new(
        quota: Arc<QuotaLedger>,
        payments: Arc<PaymentLedger>,
        bookings: Arc<dyn BookingRepository>,
        departures: Arc<dyn DepartureRepository>,
        customers: Arc<dyn CustomerDirectory>,
    ) -> Self {
        Self {
            quota,
            payments,
            bookings,
            departures,
            customers,
        }
    }

    /// Create a booking: validate, price, reserve seats, persist — in that
    /// order, so a rejected request leaves no trace and a persisted booking
    /// always holds exactly the seats its pax counts add up to.
    pub async fn create_booking(
        &self,
        departure_id: Uuid,
        customer_id: Uuid,
        pax: PaxCounts,
        price_table: &PriceTable,
    ) -> Result<Booking, BookingError> {
        // 1. Validate allocation shape before touching any ledger
        let plan = plan_rooms(&pax)?;

        // 2. Price the request
        let total_price = price_total(&pax, price_table)?;

        // 3. Resolve external references
        let departure = self
            .departures
            .get(departure_id)
            .await
            .map_err(store_err)?
            .ok_or(BookingError::UnknownDeparture(departure_id))?;
        if departure.status == DepartureStatus::Closed {
            return Err(BookingError::DepartureClosed(departure_id));
        }
        self.customers
            .get(customer_id)
            .await
            .map_err(store_err)?
            .ok_or(BookingError::UnknownCustomer(customer_id))?;

        // 4. Atomically take the seats
        let booking_id = Uuid::new_v4();
        self.quota
            .try_reserve(departure_id, booking_id, plan.total_pax())?;

        // 5. Persist; roll the reservation back if the store fails so no
        //    seats are left orphaned
        let booking = Booking::new(booking_id, departure_id, customer_id, pax, total_price);
        if let Err(err) = self.bookings.insert(&booking).await {
            error!(%booking_id, %err, "booking persist failed, releasing reserved seats");
            if let Err(release_err) = self.quota.release(booking_id) {
                error!(%booking_id, %release_err, "rollback release failed");
            }
            return Err(BookingError::Store(err.to_string()));
        }

        info!(
            %booking_id,
            %departure_id,
            seats = plan.total_pax(),
            total_price,
            "booking created"
        );
        Ok(booking)
    }

    /// Cancel a booking and return its seats to the departure. No-op when
    /// the booking is already `Cancelled` or `Completed`; the quota ledger's
    /// per-booking record guarantees seats come back exactly once even if
    /// duplicate cancellation requests race.
    pub async fn cancel_booking(&self, booking_id: Uuid) -> Result<Booking, BookingError> {
        let mut booking = self.get_booking(booking_id).await?;

        if booking.status.is_terminal() {
            return Ok(booking);
        }

        self.bookings
            .update_status(booking_id, BookingStatus::Cancelled)
            .await
            .map_err(store_err)?;
        booking.update_status(BookingStatus::Cancelled);

        let released = self.quota.release(booking_id)?;
        info!(%booking_id, released, "booking cancelled");

        Ok(booking)
    }

    /// Record a payment against a booking. The first payment to land moves
    /// a pending booking to `Confirmed`.
    pub async fn record_payment(
        &self,
        booking_id: Uuid,
        amount: i64,
    ) -> Result<Booking, BookingError> {
        let mut booking = self.get_booking(booking_id).await?;
        if booking.status == BookingStatus::Cancelled {
            return Err(BookingError::BookingCancelled(booking_id));
        }

        let posted = self
            .payments
            .record_payment(booking_id, amount, booking.total_price)?;
        self.apply_posted(&mut booking, posted.paid_amount, posted.first_payment)
            .await?;

        Ok(booking)
    }

    /// Append a sign-adjusted correction entry for a booking.
    pub async fn record_correction(
        &self,
        booking_id: Uuid,
        amount: i64,
    ) -> Result<Booking, BookingError> {
        let mut booking = self.get_booking(booking_id).await?;
        if booking.status == BookingStatus::Cancelled {
            return Err(BookingError::BookingCancelled(booking_id));
        }

        let posted = self
            .payments
            .record_correction(booking_id, amount, booking.total_price)?;
        self.apply_posted(&mut booking, posted.paid_amount, posted.first_payment)
            .await?;

        Ok(booking)
    }

    async fn apply_posted(
        &self,
        booking: &mut Booking,
        paid_amount: i64,
        first_payment: bool,
    ) -> Result<(), BookingError> {
        self.bookings
            .apply_payment(booking.id, paid_amount)
            .await
            .map_err(store_err)?;
        booking.apply_payment(paid_amount);

        if first_payment && booking.status == BookingStatus::PendingPayment {
            self.bookings
                .update_status(booking.id, BookingStatus::Confirmed)
                .await
                .map_err(store_err)?;
            booking.update_status(BookingStatus::Confirmed);
            info!(booking_id = %booking.id, "booking confirmed by first payment");
        }

        Ok(())
    }

    /// Accept the externally driven `Confirmed → Completed` transition
    /// (the departure has occurred).
    pub async fn complete_booking(&self, booking_id: Uuid) -> Result<Booking, BookingError> {
        let mut booking = self.get_booking(booking_id).await?;

        if booking.status != BookingStatus::Confirmed {
            return Err(BookingError::InvalidTransition {
                from: booking.status,
                to: BookingStatus::Completed,
            });
        }

        self.bookings
            .update_status(booking_id, BookingStatus::Completed)
            .await
            .map_err(store_err)?;
        booking.update_status(BookingStatus::Completed);

        Ok(booking)
    }

    pub async fn get_booking(&self, booking_id: Uuid) -> Result<Booking, BookingError> {
        self.bookings
            .get(booking_id)
            .await
            .map_err(store_err)?
            .ok_or(BookingError::NotFound(booking_id))
    }

    /// Ordered display lines for the booking confirmation screen,
    /// recomputed from the booking's pax snapshot
    pub async fn allocation_summary(&self, booking_id: Uuid) -> Result<Vec<String>, BookingError> {
        let booking = self.get_booking(booking_id).await?;
        let plan = plan_rooms(&booking.pax)?;
        Ok(plan.summary_lines())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use safar_domain::{Customer, Departure, RoomType};
    use safar_store::memory::{
        InMemoryBookingRepository, InMemoryCustomerDirectory, InMemoryDepartureRepository,
    };

    struct Fixture {
        manager: ReservationManager,
        quota: Arc<QuotaLedger>,
        bookings: Arc<InMemoryBookingRepository>,
        departure_id: Uuid,
        customer_id: Uuid,
    }

    async fn fixture(quota_seats: u32) -> Fixture {
        let quota = Arc::new(QuotaLedger::new());
        let payments = Arc::new(PaymentLedger::new());
        let bookings = Arc::new(InMemoryBookingRepository::new());
        let departures = Arc::new(InMemoryDepartureRepository::new());
        let customers = Arc::new(InMemoryCustomerDirectory::new());

        let departure_id = Uuid::new_v4();
        let departure = Departure::new(
            departure_id,
            "Jakarta group - March".to_string(),
            quota_seats,
            chrono::Utc::now(),
        );
        departures.insert(&departure).await.unwrap();
        quota.register_departure(departure_id, quota_seats);

        let customer_id = Uuid::new_v4();
        customers.upsert(Customer {
            id: customer_id,
            display_name: "Siti Rahma".to_string(),
        });

        let manager = ReservationManager::new(
            Arc::clone(&quota),
            payments,
            bookings.clone(),
            departures,
            customers,
        );

        Fixture {
            manager,
            quota,
            bookings,
            departure_id,
            customer_id,
        }
    }

    fn price_table() -> PriceTable {
        PriceTable::new()
            .with_price(RoomType::Quad, 25_000_000)
            .with_price(RoomType::Triple, 27_500_000)
            .with_price(RoomType::Double, 30_000_000)
            .with_price(RoomType::Single, 37_500_000)
    }

    #[tokio::test]
    async fn test_create_booking_reserves_and_persists() {
        let fx = fixture(40).await;

        let booking = fx
            .manager
            .create_booking(
                fx.departure_id,
                fx.customer_id,
                PaxCounts::new(4, 0, 0, 0),
                &price_table(),
            )
            .await
            .unwrap();

        assert_eq!(booking.status, BookingStatus::PendingPayment);
        assert_eq!(booking.total_price, 100_000_000);
        // Seats reserved equal the booking's pax sum
        assert_eq!(booking.seats(), 4);
        assert_eq!(fx.quota.snapshot(fx.departure_id).unwrap().reserved, 4);

        let stored = fx.bookings.get(booking.id).await.unwrap().unwrap();
        assert_eq!(stored.status, BookingStatus::PendingPayment);
    }

    #[tokio::test]
    async fn test_empty_request_rejected_before_ledger() {
        let fx = fixture(40).await;

        let err = fx
            .manager
            .create_booking(
                fx.departure_id,
                fx.customer_id,
                PaxCounts::default(),
                &price_table(),
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            BookingError::Rooming(RoomingError::InvalidAllocation(_))
        ));
        assert_eq!(fx.quota.snapshot(fx.departure_id).unwrap().reserved, 0);
    }

    #[tokio::test]
    async fn test_missing_price_rejected_before_ledger() {
        let fx = fixture(40).await;

        let err = fx
            .manager
            .create_booking(
                fx.departure_id,
                fx.customer_id,
                PaxCounts::new(0, 3, 0, 0),
                &PriceTable::new(),
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            BookingError::Rooming(RoomingError::PriceMismatch(RoomType::Triple))
        ));
        assert_eq!(fx.quota.snapshot(fx.departure_id).unwrap().reserved, 0);
    }

    #[tokio::test]
    async fn test_sold_out_persists_nothing() {
        let fx = fixture(5).await;

        let err = fx
            .manager
            .create_booking(
                fx.departure_id,
                fx.customer_id,
                PaxCounts::new(4, 0, 2, 0),
                &price_table(),
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            BookingError::Quota(QuotaError::InsufficientCapacity {
                requested: 6,
                available: 5
            })
        ));
        let rows = fx
            .bookings
            .list_for_departure(fx.departure_id)
            .await
            .unwrap();
        assert!(rows.is_empty());
        assert_eq!(fx.quota.snapshot(fx.departure_id).unwrap().reserved, 0);
    }

    struct FailingBookingRepository;

    #[async_trait]
    impl BookingRepository for FailingBookingRepository {
        async fn insert(
            &self,
            _booking: &Booking,
        ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
            Err("simulated storage outage".into())
        }

        async fn get(
            &self,
            _id: Uuid,
        ) -> Result<Option<Booking>, Box<dyn std::error::Error + Send + Sync>> {
            Ok(None)
        }

        async fn update_status(
            &self,
            _id: Uuid,
            _status: BookingStatus,
        ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
            Ok(())
        }

        async fn apply_payment(
            &self,
            _id: Uuid,
            _paid_amount: i64,
        ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
            Ok(())
        }

        async fn list_for_departure(
            &self,
            _departure_id: Uuid,
        ) -> Result<Vec<Booking>, Box<dyn std::error::Error + Send + Sync>> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_persist_failure_rolls_back_reservation() {
        let quota = Arc::new(QuotaLedger::new());
        let payments = Arc::new(PaymentLedger::new());
        let departures = Arc::new(InMemoryDepartureRepository::new());
        let customers = Arc::new(InMemoryCustomerDirectory::new());

        let departure_id = Uuid::new_v4();
        departures
            .insert(&Departure::new(
                departure_id,
                "rollback case".to_string(),
                30,
                chrono::Utc::now(),
            ))
            .await
            .unwrap();
        quota.register_departure(departure_id, 30);

        let customer_id = Uuid::new_v4();
        customers.upsert(Customer {
            id: customer_id,
            display_name: "Budi".to_string(),
        });

        let manager = ReservationManager::new(
            Arc::clone(&quota),
            payments,
            Arc::new(FailingBookingRepository),
            departures,
            customers,
        );

        let err = manager
            .create_booking(
                departure_id,
                customer_id,
                PaxCounts::new(4, 0, 0, 0),
                &price_table(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, BookingError::Store(_)));
        // No reserved-but-orphaned seats
        assert_eq!(quota.snapshot(departure_id).unwrap().reserved, 0);
    }

    #[tokio::test]
    async fn test_cancel_releases_exactly_once() {
        let fx = fixture(40).await;

        let booking = fx
            .manager
            .create_booking(
                fx.departure_id,
                fx.customer_id,
                PaxCounts::new(0, 3, 0, 0),
                &price_table(),
            )
            .await
            .unwrap();
        assert_eq!(fx.quota.snapshot(fx.departure_id).unwrap().reserved, 3);

        let cancelled = fx.manager.cancel_booking(booking.id).await.unwrap();
        assert_eq!(cancelled.status, BookingStatus::Cancelled);
        assert_eq!(fx.quota.snapshot(fx.departure_id).unwrap().reserved, 0);

        // Second cancellation is a no-op
        let again = fx.manager.cancel_booking(booking.id).await.unwrap();
        assert_eq!(again.status, BookingStatus::Cancelled);
        assert_eq!(fx.quota.snapshot(fx.departure_id).unwrap().reserved, 0);
    }

    #[tokio::test]
    async fn test_first_payment_confirms() {
        let fx = fixture(40).await;

        let booking = fx
            .manager
            .create_booking(
                fx.departure_id,
                fx.customer_id,
                PaxCounts::new(0, 0, 2, 0),
                &price_table(),
            )
            .await
            .unwrap();
        assert_eq!(booking.total_price, 60_000_000);

        let paid = fx
            .manager
            .record_payment(booking.id, 5_000_000)
            .await
            .unwrap();
        assert_eq!(paid.status, BookingStatus::Confirmed);
        assert_eq!(paid.paid_amount, 5_000_000);

        // A second payment keeps the status
        let paid = fx
            .manager
            .record_payment(booking.id, 55_000_000)
            .await
            .unwrap();
        assert_eq!(paid.status, BookingStatus::Confirmed);
        assert_eq!(paid.paid_amount, 60_000_000);

        let err = fx
            .manager
            .record_payment(booking.id, 1)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            BookingError::Payment(PaymentError::ExceedsTotal { .. })
        ));
    }

    #[tokio::test]
    async fn test_payment_on_cancelled_rejected() {
        let fx = fixture(40).await;

        let booking = fx
            .manager
            .create_booking(
                fx.departure_id,
                fx.customer_id,
                PaxCounts::new(0, 0, 0, 1),
                &price_table(),
            )
            .await
            .unwrap();
        fx.manager.cancel_booking(booking.id).await.unwrap();

        let err = fx
            .manager
            .record_payment(booking.id, 1_000_000)
            .await
            .unwrap_err();
        assert!(matches!(err, BookingError::BookingCancelled(_)));
    }

    #[tokio::test]
    async fn test_complete_requires_confirmed() {
        let fx = fixture(40).await;

        let booking = fx
            .manager
            .create_booking(
                fx.departure_id,
                fx.customer_id,
                PaxCounts::new(0, 0, 0, 1),
                &price_table(),
            )
            .await
            .unwrap();

        let err = fx.manager.complete_booking(booking.id).await.unwrap_err();
        assert!(matches!(err, BookingError::InvalidTransition { .. }));

        fx.manager
            .record_payment(booking.id, 1_000_000)
            .await
            .unwrap();
        let completed = fx.manager.complete_booking(booking.id).await.unwrap();
        assert_eq!(completed.status, BookingStatus::Completed);

        // Completed bookings keep their seats; cancel is a no-op
        fx.manager.cancel_booking(booking.id).await.unwrap();
        assert_eq!(fx.quota.snapshot(fx.departure_id).unwrap().reserved, 1);
    }

    #[tokio::test]
    async fn test_closed_departure_rejected() {
        let fx = fixture(40).await;

        let closed_id = Uuid::new_v4();
        let mut closed = Departure::new(
            closed_id,
            "closed departure".to_string(),
            40,
            chrono::Utc::now(),
        );
        closed.status = DepartureStatus::Closed;
        // Reuse the fixture's departure repo through the manager path
        let departures = Arc::new(InMemoryDepartureRepository::new());
        departures.insert(&closed).await.unwrap();
        let quota = Arc::new(QuotaLedger::new());
        quota.register_departure(closed_id, 40);
        let customers = Arc::new(InMemoryCustomerDirectory::new());
        customers.upsert(Customer {
            id: fx.customer_id,
            display_name: "Siti Rahma".to_string(),
        });
        let manager = ReservationManager::new(
            quota,
            Arc::new(PaymentLedger::new()),
            Arc::new(InMemoryBookingRepository::new()),
            departures,
            customers,
        );

        let err = manager
            .create_booking(
                closed_id,
                fx.customer_id,
                PaxCounts::new(1, 0, 0, 0),
                &price_table(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, BookingError::DepartureClosed(_)));
    }

    #[tokio::test]
    async fn test_allocation_summary_lines() {
        let fx = fixture(40).await;

        let booking = fx
            .manager
            .create_booking(
                fx.departure_id,
                fx.customer_id,
                PaxCounts::new(4, 3, 3, 1),
                &price_table(),
            )
            .await
            .unwrap();

        let summary = fx.manager.allocation_summary(booking.id).await.unwrap();
        assert_eq!(
            summary,
            vec![
                "Quad: 4 pax, 1 room".to_string(),
                "Triple: 3 pax, 1 room".to_string(),
                "Double: 3 pax, 2 rooms, 1 guest to be paired by staff".to_string(),
                "Single: 1 pax, 1 room".to_string(),
            ]
        );
    }
}
