use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use serde::Serialize;
use tracing::{debug, error, warn};
use uuid::Uuid;

/// Default bound on optimistic retry attempts before a reserve call gives up
pub const DEFAULT_MAX_RETRIES: u32 = 16;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum QuotaError {
    #[error("Unknown departure: {0}")]
    UnknownDeparture(Uuid),

    #[error("No reservation recorded for booking {0}")]
    UnknownReservation(Uuid),

    #[error("Booking {0} already holds a reservation")]
    DuplicateReservation(Uuid),

    #[error("Insufficient capacity: requested {requested}, available {available}")]
    InsufficientCapacity { requested: u32, available: u32 },

    #[error("Reservation contended, gave up after {attempts} attempts")]
    ConcurrentModification { attempts: u32 },

    #[error("Reserved seats for departure {departure_id} observed at {reserved}, outside [0, {quota}]")]
    InvariantViolation {
        departure_id: Uuid,
        reserved: u32,
        quota: u32,
    },
}

/// Read-only view of one departure's capacity
#[derive(Debug, Clone, Copy, Serialize)]
pub struct QuotaSnapshot {
    pub quota: u32,
    pub reserved: u32,
    pub available: u32,
}

/// A successful reservation, keyed by booking so release is exactly-once
#[derive(Debug, Clone, Copy)]
pub struct Reservation {
    pub booking_id: Uuid,
    pub departure_id: Uuid,
    pub seats: u32,
}

struct SeatCounter {
    quota: u32,
    reserved: AtomicU32,
}

struct ReservationRecord {
    departure_id: Uuid,
    seats: u32,
    released: bool,
}

/// Authoritative owner of every departure's `(quota, reserved)` pair.
///
/// The reserved counter is an atomic per departure: `try_reserve` performs
/// check-then-increment as one compare-exchange, so no interleaving of
/// concurrent callers can push a departure past its quota. Different
/// departures share nothing but the map they live in.
pub struct QuotaLedger {
    counters: RwLock<HashMap<Uuid, Arc<SeatCounter>>>,
    reservations: Mutex<HashMap<Uuid, ReservationRecord>>,
    max_retries: u32,
}

impl QuotaLedger {
    pub fn new() -> Self {
        Self::with_max_retries(DEFAULT_MAX_RETRIES)
    }

    pub fn with_max_retries(max_retries: u32) -> Self {
        Self {
            counters: RwLock::new(HashMap::new()),
            reservations: Mutex::new(HashMap::new()),
            max_retries: max_retries.max(1),
        }
    }

    /// Seed the counter for an externally created departure. Idempotent:
    /// re-registering keeps the live counter.
    pub fn register_departure(&self, departure_id: Uuid, quota: u32) {
        let mut counters = self.counters.write().expect("quota counter map poisoned");
        counters.entry(departure_id).or_insert_with(|| {
            debug!(%departure_id, quota, "departure registered with quota ledger");
            Arc::new(SeatCounter {
                quota,
                reserved: AtomicU32::new(0),
            })
        });
    }

    fn counter(&self, departure_id: Uuid) -> Result<Arc<SeatCounter>, QuotaError> {
        self.counters
            .read()
            .expect("quota counter map poisoned")
            .get(&departure_id)
            .cloned()
            .ok_or(QuotaError::UnknownDeparture(departure_id))
    }

    /// Atomically reserve `seats` for `booking_id`, or report why not.
    ///
    /// `InsufficientCapacity` is a normal business outcome. `ConcurrentModification`
    /// means the compare-exchange lost the race `max_retries` times; it is
    /// transient and the whole booking attempt can be retried from scratch.
    pub fn try_reserve(
        &self,
        departure_id: Uuid,
        booking_id: Uuid,
        seats: u32,
    ) -> Result<Reservation, QuotaError> {
        let counter = self.counter(departure_id)?;

        let mut attempts = 0u32;
        let mut current = counter.reserved.load(Ordering::Acquire);
        loop {
            if current > counter.quota {
                error!(
                    %departure_id,
                    reserved = current,
                    quota = counter.quota,
                    "reserved seats exceed quota; refusing to reserve"
                );
                return Err(QuotaError::InvariantViolation {
                    departure_id,
                    reserved: current,
                    quota: counter.quota,
                });
            }

            let available = counter.quota - current;
            if seats > available {
                return Err(QuotaError::InsufficientCapacity {
                    requested: seats,
                    available,
                });
            }

            match counter.reserved.compare_exchange_weak(
                current,
                current + seats,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => break,
                Err(observed) => {
                    attempts += 1;
                    if attempts >= self.max_retries {
                        warn!(%departure_id, attempts, "reserve gave up under contention");
                        return Err(QuotaError::ConcurrentModification { attempts });
                    }
                    current = observed;
                }
            }
        }

        let mut reservations = self.reservations.lock().expect("reservation map poisoned");
        match reservations.entry(booking_id) {
            Entry::Occupied(_) => {
                // Undo the increment; the booking already holds seats and
                // must not be counted twice.
                counter.reserved.fetch_sub(seats, Ordering::AcqRel);
                Err(QuotaError::DuplicateReservation(booking_id))
            }
            Entry::Vacant(slot) => {
                slot.insert(ReservationRecord {
                    departure_id,
                    seats,
                    released: false,
                });
                debug!(%departure_id, %booking_id, seats, "seats reserved");
                Ok(Reservation {
                    booking_id,
                    departure_id,
                    seats,
                })
            }
        }
    }

    /// Release the seats held by `booking_id`. Exactly-once: a second call
    /// for the same booking is a no-op and returns 0.
    pub fn release(&self, booking_id: Uuid) -> Result<u32, QuotaError> {
        let mut reservations = self.reservations.lock().expect("reservation map poisoned");
        let record = reservations
            .get_mut(&booking_id)
            .ok_or(QuotaError::UnknownReservation(booking_id))?;

        if record.released {
            debug!(%booking_id, "release skipped, seats already returned");
            return Ok(0);
        }

        let counter = self.counter(record.departure_id)?;
        let mut current = counter.reserved.load(Ordering::Acquire);
        loop {
            if record.seats > current {
                error!(
                    departure_id = %record.departure_id,
                    reserved = current,
                    releasing = record.seats,
                    "release would drive reserved seats below zero"
                );
                return Err(QuotaError::InvariantViolation {
                    departure_id: record.departure_id,
                    reserved: current,
                    quota: counter.quota,
                });
            }

            match counter.reserved.compare_exchange_weak(
                current,
                current - record.seats,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => break,
                Err(observed) => current = observed,
            }
        }

        record.released = true;
        debug!(%booking_id, seats = record.seats, "seats released");
        Ok(record.seats)
    }

    pub fn snapshot(&self, departure_id: Uuid) -> Result<QuotaSnapshot, QuotaError> {
        let counter = self.counter(departure_id)?;
        let reserved = counter.reserved.load(Ordering::Acquire);

        if reserved > counter.quota {
            error!(
                %departure_id,
                reserved,
                quota = counter.quota,
                "reserved seats exceed quota"
            );
            return Err(QuotaError::InvariantViolation {
                departure_id,
                reserved,
                quota: counter.quota,
            });
        }

        Ok(QuotaSnapshot {
            quota: counter.quota,
            reserved,
            available: counter.quota - reserved,
        })
    }
}

impl Default for QuotaLedger {
    fn default() -> Self {
        Self::new()
    }
}
